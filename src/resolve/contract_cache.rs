use core::any::TypeId;
use core::fmt;

use std::sync::{Mutex, PoisonError};

use crate::introspect::{IntrospectError, TypeIntrospector};
use crate::resolve::{MarkerClassifier, MarkerKind};
use crate::typeid_map::TypeIdMap;

// -----------------------------------------------------------------------------
// ContractCache

/// Memoizes, per type, whether the type declares a contract-mode marker.
///
/// Keyed by type identity. Populated entries are immutable and never
/// recomputed or evicted; introspection failures are returned to the caller
/// and never cached, so a later retry can succeed.
///
/// Lookup and insert happen inside one critical section, so concurrent
/// callers never compute an entry twice and never observe a half-written
/// one.
pub struct ContractCache {
    table: Mutex<TypeIdMap<bool>>,
}

impl ContractCache {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(TypeIdMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TypeIdMap<bool>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the type carries a contract-mode marker, computing and
    /// memoizing the answer on first request.
    ///
    /// Matching uses the given classifier, so kind-name matching of
    /// cross-crate markers is preserved.
    pub fn has_contract_marker(
        &self,
        type_id: TypeId,
        introspector: &dyn TypeIntrospector,
        classifier: MarkerClassifier,
    ) -> Result<bool, IntrospectError> {
        let mut table = self.lock();
        if let Some(flag) = table.get(&type_id) {
            return Ok(*flag);
        }

        let annotations = introspector.type_annotations(type_id)?;
        let flag = annotations
            .iter()
            .any(|annotation| classifier(annotation) == Some(MarkerKind::ContractMode));
        table.insert(type_id, flag);
        Ok(flag)
    }

    /// Returns `true` if an entry for the type has been populated.
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.lock().contains(&type_id)
    }

    /// Returns the number of populated entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no entries have been populated.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for ContractCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContractCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.lock().iter().map(|(k, v)| (*k, *v))).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ContractCache;
    use crate::info::{AnnotationSet, ContractMode, MemberInfo};
    use crate::introspect::{IntrospectError, TypeIntrospector};
    use crate::resolve::default_classifier;
    use core::any::TypeId;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Marked;
    struct Unmarked;

    /// Counts annotation queries; knows `Marked` and `Unmarked` only.
    #[derive(Default)]
    struct CountingIntrospector {
        queries: AtomicUsize,
    }

    impl TypeIntrospector for CountingIntrospector {
        fn enumerate_members(
            &self,
            type_id: TypeId,
        ) -> Result<Vec<MemberInfo>, IntrospectError> {
            Err(IntrospectError::UnknownType(type_id))
        }

        fn type_annotations(
            &self,
            type_id: TypeId,
        ) -> Result<Arc<AnnotationSet>, IntrospectError> {
            self.queries.fetch_add(1, Ordering::Relaxed);
            if type_id == TypeId::of::<Marked>() {
                Ok(Arc::new(AnnotationSet::new().with(ContractMode)))
            } else if type_id == TypeId::of::<Unmarked>() {
                Ok(Arc::new(AnnotationSet::new()))
            } else {
                Err(IntrospectError::UnknownType(type_id))
            }
        }
    }

    #[test]
    fn memoizes_per_type() {
        let cache = ContractCache::new();
        let introspector = CountingIntrospector::default();

        for _ in 0..3 {
            let marked = cache
                .has_contract_marker(TypeId::of::<Marked>(), &introspector, default_classifier)
                .unwrap();
            assert!(marked);
        }
        let unmarked = cache
            .has_contract_marker(TypeId::of::<Unmarked>(), &introspector, default_classifier)
            .unwrap();
        assert!(!unmarked);

        // One query per distinct type, regardless of repeat calls.
        assert_eq!(introspector.queries.load(Ordering::Relaxed), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = ContractCache::new();
        let introspector = CountingIntrospector::default();

        let unknown = TypeId::of::<String>();
        assert!(
            cache
                .has_contract_marker(unknown, &introspector, default_classifier)
                .is_err()
        );
        assert!(
            cache
                .has_contract_marker(unknown, &introspector, default_classifier)
                .is_err()
        );

        // Each retry reached the introspector again.
        assert_eq!(introspector.queries.load(Ordering::Relaxed), 2);
        assert!(cache.is_empty());
    }
}
