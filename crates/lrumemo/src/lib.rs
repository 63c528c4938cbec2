//! # lrumemo
//!
//! Memoization for plain functions, backed by an LRU cache.
//!
//! ## Architecture
//! - **Key derivation**: [`CacheKey`] turns call arguments into a structural key
//! - **HashMap**: AHash for fast lookups (O(1))
//! - **LRU List**: Doubly-linked list for promotion and eviction (O(1))
//! - **Wrapper**: [`Memoized`] routes every call through the cache and counts
//!   hits and misses
//!
//! ```
//! use lrumemo::{lru_cache, CallArgs, ArgValue};
//!
//! let area = lru_cache(16)?.decorate_infallible(|args: CallArgs| {
//!     match (args.get_named("w"), args.get_named("h")) {
//!         (Some(ArgValue::Int(w)), Some(ArgValue::Int(h))) => w * h,
//!         _ => 0,
//!     }
//! });
//!
//! assert_eq!(area.call(CallArgs::new().named("w", 3).named("h", 4))?, 12);
//! // Named argument order does not matter
//! assert_eq!(area.call(CallArgs::new().named("h", 4).named("w", 3))?, 12);
//! assert_eq!(area.stats().hits(), 1);
//! # Ok::<(), lrumemo::Error>(())
//! ```

#![warn(missing_docs)]

mod error;
mod key;
mod lru;
mod memo;
mod stats;

pub use error::{ConfigError, Error, KeyDerivationError, Result};
pub use key::{ArgValue, ArgsKey, CacheKey, CallArgs, KeyPart};
pub use lru::{Keys, LruCache};
pub use memo::{lru_cache, LruDecorator, Memoized};
pub use stats::{CacheStats, StatsSnapshot};
