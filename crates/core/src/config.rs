use std::env;

use serde::{Deserialize, Serialize};

/// Default list key holding the rule collection.
pub const DEFAULT_KEY: &str = "casbin_rules";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_i64(profile: &str, key: &str, default: i64) -> i64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Redis ─────────────────────────────────────────────────────

/// Connection settings for the Redis instance holding the rule collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub db: i64,
    /// List key the rules live under.
    pub key: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            host: "127.0.0.1".to_string(),
            port: 6379,
            username: None,
            password: None,
            db: 0,
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl RedisConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `WARDEN_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("WARDEN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            host: profiled_env_or(p, "REDIS_HOST", "127.0.0.1"),
            port: profiled_env_u16(p, "REDIS_PORT", 6379),
            username: profiled_env_opt(p, "REDIS_USERNAME"),
            password: profiled_env_opt(p, "REDIS_PASSWORD"),
            db: profiled_env_i64(p, "REDIS_DB", 0),
            key: profiled_env_or(p, "WARDEN_KEY", DEFAULT_KEY),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() {
            "default"
        } else {
            &self.profile
        }
    }

    /// `redis://[user[:***]@]host:port/db`, for logs and error messages.
    ///
    /// The password is masked. Connections are opened from the structured
    /// fields, never from this string.
    pub fn connection_url(&self) -> String {
        let auth = match (&self.username, &self.password) {
            (Some(user), Some(_)) => format!("{}:***@", user),
            (Some(user), None) => format!("{}@", user),
            (None, Some(_)) => ":***@".to_string(),
            (None, None) => String::new(),
        };
        format!("redis://{}{}:{}/{}", auth, self.host, self.port, self.db)
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  redis:       host={}, port={}, db={}, auth={}",
            self.host,
            self.port,
            self.db,
            if self.password.is_some() { "yes" } else { "no" }
        );
        tracing::info!("  collection:  key={}", self.key);
    }

    /// Return a redacted view safe for display (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "redis": {
                "host": self.host,
                "port": self.port,
                "db": self.db,
                "username": self.username,
                "password_set": self.password.is_some(),
            },
            "key": self.key,
        })
    }
}
