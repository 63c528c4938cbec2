use std::collections::VecDeque;
use std::num::NonZeroUsize;

use lrumemo::{lru_cache, LruCache};
use proptest::prelude::*;

/// Reference model: keys ordered from least to most recently used
struct Model {
    order: VecDeque<u8>,
    capacity: usize,
}

impl Model {
    fn touch(&mut self, key: u8) -> bool {
        match self.order.iter().position(|&k| k == key) {
            Some(pos) => {
                self.order.remove(pos);
                self.order.push_back(key);
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, key: u8) -> Option<u8> {
        if self.touch(key) {
            return None;
        }
        let evicted = if self.order.len() == self.capacity {
            self.order.pop_front()
        } else {
            None
        };
        self.order.push_back(key);
        evicted
    }
}

proptest! {
    #[test]
    fn test_len_never_exceeds_capacity(
        capacity in 1usize..16,
        keys in prop::collection::vec(any::<u16>(), 1..200)
    ) {
        let mut cache = LruCache::new(NonZeroUsize::new(capacity).unwrap());

        for key in keys {
            cache.put(key, ());
            prop_assert!(cache.len() <= capacity);
        }
    }

    #[test]
    fn test_matches_reference_model(
        capacity in 1usize..8,
        ops in prop::collection::vec((any::<bool>(), 0u8..16), 1..200)
    ) {
        let mut cache = LruCache::new(NonZeroUsize::new(capacity).unwrap());
        let mut model = Model { order: VecDeque::new(), capacity };

        for (is_get, key) in ops {
            if is_get {
                let found = cache.get(&key).is_some();
                prop_assert_eq!(found, model.touch(key));
            } else {
                let evicted = cache.put(key, key).map(|(k, _)| k);
                prop_assert_eq!(evicted, model.insert(key));
            }

            let newest_first: Vec<u8> = model.order.iter().rev().copied().collect();
            prop_assert_eq!(cache.keys().copied().collect::<Vec<_>>(), newest_first);
        }
    }

    #[test]
    fn test_every_call_is_a_hit_or_a_miss(
        capacity in 1usize..8,
        calls in prop::collection::vec(0u32..20, 1..100)
    ) {
        let memo = lru_cache(capacity).unwrap().decorate_infallible(|n: u32| n + 1);

        for (i, n) in calls.iter().enumerate() {
            prop_assert_eq!(memo.call(*n).unwrap(), n + 1);
            let stats = memo.stats();
            prop_assert_eq!(stats.hits() + stats.misses(), i as u64 + 1);
            prop_assert_eq!(stats.inserts(), stats.misses());
            prop_assert!(memo.len() <= capacity);
        }
    }

    #[test]
    fn test_hits_never_evict(
        capacity in 1usize..8,
        repeats in 1usize..50
    ) {
        let memo = lru_cache(capacity).unwrap().decorate_infallible(|n: usize| n);
        for n in 0..capacity {
            memo.call(n).unwrap();
        }
        let before = memo.cached_keys().len();

        for i in 0..repeats {
            memo.call(i % capacity).unwrap();
        }

        prop_assert_eq!(memo.len(), before);
        prop_assert_eq!(memo.stats().evictions(), 0);
        prop_assert_eq!(memo.stats().hits(), repeats as u64);
    }
}
