//! Redis cache backends for the RegionGate service.
//!
//! Implements the `regiongate-storage` cache traits over a deadpool-redis
//! pool: two Redis sets for the allowed/denied membership cache and one
//! string key for the prompt text. All failures map to `CacheError`, which
//! the coordinator absorbs: a flaky Redis degrades performance, never
//! correctness.

pub mod config;
pub mod membership;
pub mod pool;
pub mod prompt;

pub use config::RedisConfig;
pub use membership::{ALLOWED_SET_KEY, DENIED_SET_KEY, RedisMembershipCache};
pub use pool::create_pool;
pub use prompt::{PROMPT_KEY, RedisPromptCache};
