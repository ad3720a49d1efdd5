//! Redis list backend.
//!
//! Rules live in one Redis list. Plain operations map onto native list
//! commands (RPUSH, LRANGE, LREM, DEL). Filtered removal runs as a single
//! Lua script so the mark and compact steps execute atomically on the server.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, Script};
use tracing::{debug, info};

use warden_core::{RedisConfig, RuleFilter, SENTINEL};

use crate::backend::ListBackend;
use crate::error::Result;

/// Mark-then-compact over the whole list, evaluated server-side.
///
/// KEYS[1] = list key; ARGV[1] = sentinel; ARGV[2] = ptype;
/// ARGV[3] = first field index; ARGV[4..] = window values ("" = any).
/// Only entries that decode as rules are candidates: a JSON object with a
/// string ptype whose `v0`..`v5` are each absent, null or a string.
/// Everything else is left alone, as the in-process filter does.
const REMOVE_MATCHING_LUA: &str = r#"
local key = KEYS[1]
local sentinel = ARGV[1]
local ptype = ARGV[2]
local field_index = tonumber(ARGV[3])

local function is_rule(rule)
  if type(rule) ~= 'table' or type(rule['ptype']) ~= 'string' then
    return false
  end
  for n = 0, 5 do
    local v = rule['v' .. n]
    if v ~= nil and v ~= cjson.null and type(v) ~= 'string' then
      return false
    end
  end
  return true
end

local items = redis.call('LRANGE', key, 0, -1)
local marked = 0
for i, raw in ipairs(items) do
  local ok, rule = pcall(cjson.decode, raw)
  if ok and is_rule(rule) and rule['ptype'] == ptype then
    local matched = true
    for j = 4, #ARGV do
      local want = ARGV[j]
      if want ~= '' and rule['v' .. (field_index + j - 4)] ~= want then
        matched = false
        break
      end
    end
    if matched then
      redis.call('LSET', key, i - 1, sentinel)
      marked = marked + 1
    end
  end
end
if marked > 0 then
  redis.call('LREM', key, 0, sentinel)
end
return marked
"#;

pub struct RedisBackend {
    conn: MultiplexedConnection,
    remove_matching: Script,
}

impl RedisBackend {
    /// Open a multiplexed connection to the configured server.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(connection_info(config))?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!(
            "Storage: redis backend at {}:{} (db: {})",
            config.host, config.port, config.db
        );
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            remove_matching: Script::new(REMOVE_MATCHING_LUA),
        }
    }
}

/// Structured connection settings. Credentials are passed through as-is,
/// so passwords containing URL delimiters need no escaping.
fn connection_info(config: &RedisConfig) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
        redis: RedisConnectionInfo {
            db: config.db,
            username: config.username.clone(),
            password: config.password.clone(),
            ..Default::default()
        },
    }
}

#[async_trait]
impl ListBackend for RedisBackend {
    async fn push(&self, key: &str, values: &[String]) -> Result<usize> {
        let mut conn = self.conn.clone();
        if values.is_empty() {
            // RPUSH without values is a protocol error.
            let len: usize = conn.llen(key).await?;
            return Ok(len);
        }
        let len: usize = conn.rpush(key, values).await?;
        Ok(len)
    }

    async fn range(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let lines: Vec<String> = conn.lrange(key, 0, -1).await?;
        Ok(lines)
    }

    async fn len(&self, key: &str) -> Result<usize> {
        let mut conn = self.conn.clone();
        let len: usize = conn.llen(key).await?;
        Ok(len)
    }

    async fn remove(&self, key: &str, count: usize, value: &str) -> Result<usize> {
        let mut conn = self.conn.clone();
        let removed: usize = conn.lrem(key, count as isize, value).await?;
        Ok(removed)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn replace(&self, key: &str, values: &[String]) -> Result<()> {
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        pipe.atomic().del(key).ignore();
        if !values.is_empty() {
            pipe.rpush(key, values).ignore();
        }
        let _: () = pipe.query_async(&mut conn).await?;
        debug!(key = %key, entries = values.len(), "replaced list");
        Ok(())
    }

    async fn remove_matching(&self, key: &str, filter: &RuleFilter) -> Result<usize> {
        let mut conn = self.conn.clone();
        let removed: usize = self
            .remove_matching
            .key(key)
            .arg(SENTINEL)
            .arg(filter.ptype())
            .arg(filter.field_index())
            .arg(filter.values())
            .invoke_async(&mut conn)
            .await?;
        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
