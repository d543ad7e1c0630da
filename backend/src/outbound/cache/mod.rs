//! Cache adapters for the observation query service.
//!
//! [`RedisObservationCache`] is the production adapter. When no Redis URL is
//! configured the server wires the domain's `DisabledObservationCache`
//! instead, so queries always go to the stores.

mod redis_observation_cache;

pub use redis_observation_cache::{RedisCacheBuildError, RedisObservationCache};
