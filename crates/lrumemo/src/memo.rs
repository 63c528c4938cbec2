//! Memoizing wrapper: LRU cache in front of a function

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroUsize;

use tracing::{debug, trace};

use crate::error::{ConfigError, KeyDerivationError};
use crate::key::CacheKey;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Create a decorator that memoizes functions in an LRU cache of `max_items`
///
/// # Arguments
/// * `max_items` - Maximum number of results kept per decorated function
///
/// # Returns
/// * `Result<LruDecorator, ConfigError>` - Fails when `max_items` is 0
///
/// ```
/// let square = lrumemo::lru_cache(2)?.decorate_infallible(|n: u64| n * n);
///
/// assert_eq!(square.call(4)?, 16);
/// assert_eq!(square.call(4)?, 16);
/// assert_eq!(square.stats().misses(), 1);
/// assert_eq!(square.stats().hits(), 1);
/// # Ok::<(), lrumemo::Error>(())
/// ```
pub fn lru_cache(max_items: usize) -> Result<LruDecorator, ConfigError> {
    LruDecorator::new(max_items)
}

/// Validated cache configuration, applied to one function at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruDecorator {
    capacity: NonZeroUsize,
}

impl LruDecorator {
    /// Create a decorator for caches holding at most `max_items` results
    pub fn new(max_items: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(max_items).ok_or(ConfigError::ZeroCapacity)?;
        Ok(Self { capacity })
    }

    /// Capacity given to every decorated function
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Wrap a fallible function
    ///
    /// The wrapper returns the function's own error type. Key derivation
    /// failures are converted into it through `From<KeyDerivationError>`.
    pub fn decorate<A, R, E, F>(self, func: F) -> Memoized<A, R, F>
    where
        A: CacheKey,
        R: Clone,
        F: Fn(A) -> Result<R, E>,
        E: From<KeyDerivationError>,
    {
        debug!(capacity = self.capacity.get(), "decorating function with LRU cache");
        Memoized {
            func,
            cache: RefCell::new(LruCache::new(self.capacity)),
            stats: CacheStats::new(),
            _args: PhantomData,
        }
    }

    /// Wrap a function that cannot fail
    ///
    /// The only error left is a key derivation failure.
    pub fn decorate_infallible<A, R, F>(
        self,
        func: F,
    ) -> Memoized<A, R, impl Fn(A) -> Result<R, KeyDerivationError>>
    where
        A: CacheKey,
        R: Clone,
        F: Fn(A) -> R,
    {
        self.decorate(move |args: A| Ok::<R, KeyDerivationError>(func(args)))
    }
}

/// Function wrapped with an LRU cache and hit/miss statistics
///
/// The cache and counters belong to this wrapper alone. The wrapper is not
/// `Sync`; it is meant for one thread.
pub struct Memoized<A: CacheKey, R, F> {
    func: F,
    cache: RefCell<LruCache<A::Key, R>>,
    stats: CacheStats,
    _args: PhantomData<fn(A)>,
}

impl<A, R, F> Memoized<A, R, F>
where
    A: CacheKey,
    R: Clone,
{
    /// Call the wrapped function through the cache
    ///
    /// A hit returns the stored result without invoking the function. A miss
    /// invokes it and stores the result only if it succeeded; an error is
    /// returned as is and nothing is cached. A key derivation failure is
    /// returned before the cache or the counters are touched.
    pub fn call<E>(&self, args: A) -> Result<R, E>
    where
        F: Fn(A) -> Result<R, E>,
        E: From<KeyDerivationError>,
    {
        let key = args.cache_key()?;

        if let Some(value) = self.lookup(&key) {
            self.stats.record_hit();
            trace!(hits = self.stats.hits(), "cache hit");
            return Ok(value);
        }

        self.stats.record_miss();
        trace!(misses = self.stats.misses(), "cache miss");

        // No cache borrow is held here, so the function may call back into
        // this wrapper.
        let value = match (self.func)(args) {
            Ok(value) => value,
            Err(err) => {
                debug!("wrapped function failed, result not cached");
                return Err(err);
            }
        };

        self.store(key, value.clone());
        Ok(value)
    }

    /// Check whether a result for `args` is cached, without touching recency
    pub fn is_cached(&self, args: &A) -> Result<bool, KeyDerivationError> {
        let key = args.cache_key()?;
        Ok(self.cache.borrow().contains(&key))
    }

    /// Cached result for `args`, without touching recency or statistics
    pub fn peek(&self, args: &A) -> Result<Option<R>, KeyDerivationError> {
        let key = args.cache_key()?;
        Ok(self.cache.borrow().peek(&key).cloned())
    }

    fn lookup(&self, key: &A::Key) -> Option<R> {
        self.cache.borrow_mut().get(key).cloned()
    }

    fn store(&self, key: A::Key, value: R) {
        let evicted = self.cache.borrow_mut().put(key, value);
        self.stats.record_insert();
        if evicted.is_some() {
            self.stats.record_eviction();
            debug!(
                evictions = self.stats.evictions(),
                "evicted least recently used entry"
            );
        }
    }
}

impl<A: CacheKey, R, F> Memoized<A, R, F> {
    /// Hit/miss statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// Maximum number of cached results
    pub fn capacity(&self) -> usize {
        self.cache.borrow().capacity().get()
    }

    /// Cached keys from most to least recently used
    pub fn cached_keys(&self) -> Vec<A::Key> {
        self.cache.borrow().keys().cloned().collect()
    }

    /// Drop every cached result; statistics are kept
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        debug!("cache cleared");
    }

    /// Unwrap the original function
    pub fn into_inner(self) -> F {
        self.func
    }
}

impl<A: CacheKey, R, F> fmt::Debug for Memoized<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}
