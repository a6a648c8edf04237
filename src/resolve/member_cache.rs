use core::any::TypeId;
use core::fmt;

use std::sync::{Arc, Mutex, PoisonError};

use crate::introspect::IntrospectError;
use crate::resolve::MemberDescriptor;
use crate::typeid_map::TypeIdMap;

// -----------------------------------------------------------------------------
// MemberCache

/// Memoizes, per type, the fully resolved member-descriptor list.
///
/// Compute once, serve forever: after a type's entry is populated it is
/// returned as-is on every later request, with no re-inspection of the type,
/// for the process lifetime. Entries are never evicted or invalidated.
///
/// Lookup and insert happen inside one critical section per request, so two
/// threads racing on a fresh type cannot both compute the entry, and readers
/// never observe a partially-constructed list. Resolution failures are
/// returned without populating the entry.
pub struct MemberCache {
    table: Mutex<TypeIdMap<Arc<[MemberDescriptor]>>>,
}

impl MemberCache {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(TypeIdMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TypeIdMap<Arc<[MemberDescriptor]>>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the memoized list for the type, resolving and inserting it on
    /// first request.
    ///
    /// The `resolve` closure runs inside the cache's critical section and
    /// must not re-enter this cache.
    pub(crate) fn get_or_resolve(
        &self,
        type_id: TypeId,
        resolve: impl FnOnce() -> Result<Vec<MemberDescriptor>, IntrospectError>,
    ) -> Result<Arc<[MemberDescriptor]>, IntrospectError> {
        let mut table = self.lock();
        if let Some(members) = table.get(&type_id) {
            return Ok(Arc::clone(members));
        }

        let members: Arc<[MemberDescriptor]> = resolve()?.into();
        table.insert(type_id, Arc::clone(&members));
        Ok(members)
    }

    /// Returns the memoized list for the type, if already populated.
    pub fn get(&self, type_id: TypeId) -> Option<Arc<[MemberDescriptor]>> {
        self.lock().get(&type_id).map(Arc::clone)
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

impl Default for MemberCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemberCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.lock().iter().map(|(k, v)| (*k, v.len())))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::MemberCache;
    use crate::info::MemberInfo;
    use crate::introspect::IntrospectError;
    use crate::resolve::{MemberDescriptor, ResolvedMarkers, default_classifier};
    use core::any::{Any, TypeId};

    struct Sample {
        value: u32,
    }

    fn sample_descriptor() -> MemberDescriptor {
        let info = MemberInfo::field::<Sample, u32>("value", |i| {
            i.downcast_ref::<Sample>().map(|s| &s.value as &dyn Any)
        });
        let markers = ResolvedMarkers::resolve(&info, false, default_classifier);
        MemberDescriptor::new(info, markers)
    }

    #[test]
    fn second_request_serves_the_memo() {
        let cache = MemberCache::new();
        let type_id = TypeId::of::<Sample>();

        let first = cache
            .get_or_resolve(type_id, || Ok(vec![sample_descriptor()]))
            .unwrap();
        let second = cache
            .get_or_resolve(type_id, || panic!("must not recompute"))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_leave_no_entry() {
        let cache = MemberCache::new();
        let type_id = TypeId::of::<Sample>();

        let err = cache.get_or_resolve(type_id, || Err(IntrospectError::UnknownType(type_id)));
        assert!(err.is_err());
        assert!(cache.is_empty());

        // A retry runs the resolution again.
        let ok = cache.get_or_resolve(type_id, || Ok(vec![sample_descriptor()]));
        assert_eq!(ok.unwrap().len(), 1);
    }
}
