pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod rule;

pub use config::RedisConfig;
pub use error::*;
pub use filter::{RuleFilter, SENTINEL};
pub use model::PolicyModel;
pub use rule::{Rule, MAX_FIELDS};
