//! Memoized decode plans, keyed by erasure pattern.
//!
//! The map lock is only held long enough to find or insert a pattern's
//! slot. Each slot has its own mutex, held while its plan is computed, so:
//!
//! - different patterns build in parallel without contending;
//! - concurrent requests for the same pattern wait for the first builder
//!   and then share its result instead of repeating the `O(k³)` inversion.
//!
//! A filled slot is never rewritten and nothing is evicted: the number of
//! distinct failure patterns seen by one code is expected to stay small.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use strata_gf::GfError;
use tracing::{debug, trace};

use crate::pattern::ErasurePattern;
use crate::plan::DecodePlan;

/// Lazily-filled plan for one pattern.
type Slot = Mutex<Option<Arc<DecodePlan>>>;

/// Thread-safe, grow-only cache of [`DecodePlan`]s.
#[derive(Default)]
pub struct DecodeCache {
    slots: RwLock<HashMap<ErasurePattern, Arc<Slot>>>,
}

impl DecodeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the plan for `pattern`, running `build` if it has not been
    /// computed yet.
    ///
    /// At most one `build` runs per pattern at a time. If it fails, the slot
    /// stays empty and the next caller retries.
    pub fn get_or_build<F>(
        &self,
        pattern: &ErasurePattern,
        build: F,
    ) -> Result<Arc<DecodePlan>, GfError>
    where
        F: FnOnce() -> Result<DecodePlan, GfError>,
    {
        let slot = self.slot(pattern);
        // A poisoned slot still holds either nothing or a finished plan.
        let mut plan = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(plan) = plan.as_ref() {
            trace!(?pattern, "decode cache hit");
            return Ok(Arc::clone(plan));
        }

        debug!(?pattern, "decode cache miss");
        let built = Arc::new(build()?);
        *plan = Some(Arc::clone(&built));
        Ok(built)
    }

    /// The finished plan for `pattern`, if any.
    pub fn get(&self, pattern: &ErasurePattern) -> Option<Arc<DecodePlan>> {
        let slot = {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.get(pattern)?)
        };
        let plan = slot.lock().unwrap_or_else(PoisonError::into_inner);
        plan.clone()
    }

    /// Number of patterns with a finished plan.
    ///
    /// Slots left empty by a failed build are not counted. Waits for builds
    /// that are in progress.
    pub fn len(&self) -> usize {
        let slots: Vec<Arc<Slot>> = {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            slots.values().cloned().collect()
        };
        slots
            .iter()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, pattern: &ErasurePattern) -> Arc<Slot> {
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(pattern) {
                return Arc::clone(slot);
            }
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(pattern.clone()).or_default())
    }
}

impl std::fmt::Debug for DecodeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeCache")
            .field("patterns", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::generator::generator_matrix;

    fn pattern(erased: &[usize]) -> ErasurePattern {
        ErasurePattern::new(12, 8, erased).unwrap()
    }

    fn build(erased: &ErasurePattern) -> Result<DecodePlan, GfError> {
        DecodePlan::build(&generator_matrix(12, 8)?, erased)
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = DecodeCache::new();
        let p = pattern(&[0, 2]);
        assert!(cache.is_empty());
        assert!(cache.get(&p).is_none());

        let calls = AtomicUsize::new(0);
        let first = cache
            .get_or_build(&p, || {
                calls.fetch_add(1, Ordering::SeqCst);
                build(&p)
            })
            .unwrap();
        let second = cache
            .get_or_build(&p, || {
                calls.fetch_add(1, Ordering::SeqCst);
                build(&p)
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &cache.get(&p).unwrap()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_order_insensitive_key() {
        let cache = DecodeCache::new();
        let a = pattern(&[3, 1]);
        let b = pattern(&[1, 3]);
        let first = cache.get_or_build(&a, || build(&a)).unwrap();
        let second = cache
            .get_or_build(&b, || panic!("pattern should already be cached"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_failed_build_is_retried() {
        let cache = DecodeCache::new();
        let p = pattern(&[5]);

        let err = cache.get_or_build(&p, || Err(GfError::Singular)).unwrap_err();
        assert_eq!(err, GfError::Singular);
        assert!(cache.get(&p).is_none());
        assert!(cache.is_empty());

        let plan = cache.get_or_build(&p, || build(&p)).unwrap();
        assert_eq!(plan.erased(), &[5]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_len_counts_only_built_plans() {
        let cache = DecodeCache::new();
        let built = pattern(&[0]);
        let failed = pattern(&[1, 2]);

        cache.get_or_build(&built, || build(&built)).unwrap();
        cache
            .get_or_build(&failed, || Err(GfError::Singular))
            .unwrap_err();

        assert_eq!(cache.len(), 1);
        assert!(format!("{cache:?}").contains("patterns: 1"));
    }

    #[test]
    fn test_same_pattern_builds_once_under_contention() {
        let cache = DecodeCache::new();
        let p = pattern(&[0, 1, 2, 3]);
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        let plans: Vec<Arc<DecodePlan>> = std::thread::scope(|s| {
            let (cache, p, calls, barrier) = (&cache, &p, &calls, &barrier);
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(move || {
                        barrier.wait();
                        cache
                            .get_or_build(p, || {
                                calls.fetch_add(1, Ordering::SeqCst);
                                // Widen the window for other threads to pile up.
                                std::thread::sleep(Duration::from_millis(20));
                                build(p)
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for plan in &plans[1..] {
            assert!(Arc::ptr_eq(&plans[0], plan));
        }
    }

    #[test]
    fn test_different_patterns_build_in_parallel() {
        // Two builders that each wait for the other can only finish if
        // neither blocks the other's slot.
        let cache = DecodeCache::new();
        let a = pattern(&[0]);
        let b = pattern(&[1]);
        let rendezvous = Barrier::new(2);

        std::thread::scope(|s| {
            let ha = s.spawn(|| {
                cache
                    .get_or_build(&a, || {
                        rendezvous.wait();
                        build(&a)
                    })
                    .unwrap()
            });
            let hb = s.spawn(|| {
                cache
                    .get_or_build(&b, || {
                        rendezvous.wait();
                        build(&b)
                    })
                    .unwrap()
            });
            assert_eq!(ha.join().unwrap().erased(), &[0]);
            assert_eq!(hb.join().unwrap().erased(), &[1]);
        });

        assert_eq!(cache.len(), 2);
    }
}
