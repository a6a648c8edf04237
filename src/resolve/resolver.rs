use core::any::{Any, TypeId};
use core::fmt;

use std::sync::Arc;

use crate::introspect::{IntrospectError, TypeIntrospector};
use crate::resolve::{ContractCache, MemberCache, MemberDescriptor};
use crate::resolve::{MarkerClassifier, ResolvedMarkers, default_classifier};

// -----------------------------------------------------------------------------
// MemberResolver

/// The top-level entry point: resolves and memoizes the serializable members
/// of a type.
///
/// A resolver owns its introspector, its marker classifier, and the two
/// per-type caches (member lists and contract-mode flags). Caches are
/// explicit per-resolver state rather than process globals, so tests can
/// construct fresh, isolated resolvers and assert query counts.
///
/// The resolver is passive: it runs on whichever thread the caller uses,
/// spawns no threads, and is safe to share across threads.
///
/// # Examples
///
/// ```
/// use core::any::Any;
/// use std::sync::Arc;
///
/// use sermeta::MemberResolver;
/// use sermeta::info::{AnnotationSet, MemberInfo, Rename};
/// use sermeta::introspect::{Introspect, MemberTable, MemberTableCell, NativeIntrospector};
///
/// struct Point {
///     x: f32,
///     y: f32,
/// }
///
/// impl Introspect for Point {
///     fn member_table() -> &'static MemberTable {
///         static CELL: MemberTableCell = MemberTableCell::new();
///         CELL.get_or_init(|| {
///             MemberTable::of::<Point>(vec![
///                 MemberInfo::field::<Point, f32>("x", |i| {
///                     i.downcast_ref::<Point>().map(|p| &p.x as &dyn Any)
///                 })
///                 .with_annotations(AnnotationSet::new().with(Rename::new("X"))),
///                 MemberInfo::field::<Point, f32>("y", |i| {
///                     i.downcast_ref::<Point>().map(|p| &p.y as &dyn Any)
///                 }),
///             ])
///         })
///     }
/// }
///
/// let introspector = NativeIntrospector::new();
/// introspector.register::<Point>();
///
/// let resolver = MemberResolver::new(Arc::new(introspector));
/// let members = resolver.members_of::<Point>().unwrap();
///
/// let names: Vec<_> = members.iter().map(|m| m.resolve_name()).collect();
/// assert_eq!(names, ["X", "y"]);
///
/// let point = Point { x: 1.0, y: 2.0 };
/// let x = members[0].get_value(&point).unwrap();
/// assert_eq!(x.downcast_ref::<f32>(), Some(&1.0));
/// ```
pub struct MemberResolver {
    introspector: Arc<dyn TypeIntrospector>,
    classifier: MarkerClassifier,
    members: MemberCache,
    contracts: ContractCache,
}

impl MemberResolver {
    /// Creates a resolver with empty caches and the
    /// [`default_classifier`].
    pub fn new(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self::with_classifier(introspector, default_classifier)
    }

    /// Creates a resolver with empty caches and a custom marker classifier.
    pub fn with_classifier(
        introspector: Arc<dyn TypeIntrospector>,
        classifier: MarkerClassifier,
    ) -> Self {
        Self {
            introspector,
            classifier,
            members: MemberCache::new(),
            contracts: ContractCache::new(),
        }
    }

    /// Returns the resolved members of the type, in enumeration order.
    ///
    /// The first request for a type enumerates its members, resolves their
    /// markers, and memoizes the list; every later request serves the memo
    /// without re-inspecting the type. Introspection failures are propagated
    /// and never cached.
    pub fn members(&self, type_id: TypeId) -> Result<Arc<[MemberDescriptor]>, IntrospectError> {
        self.members
            .get_or_resolve(type_id, || self.resolve_uncached(type_id))
    }

    /// Returns the resolved members of `T`. See [`members`](Self::members).
    #[inline]
    pub fn members_of<T: Any>(&self) -> Result<Arc<[MemberDescriptor]>, IntrospectError> {
        self.members(TypeId::of::<T>())
    }

    /// Returns the members a serializer should emit: readable, not indexed,
    /// not ignore-marked.
    pub fn serializable_members(
        &self,
        type_id: TypeId,
    ) -> Result<Vec<MemberDescriptor>, IntrospectError> {
        let members = self.members(type_id)?;
        Ok(members
            .iter()
            .filter(|member| member.is_serializable())
            .cloned()
            .collect())
    }

    /// Resolves the type's members without consulting or populating the
    /// member cache.
    ///
    /// Used internally on a cache miss; exposed for diagnostic tooling. The
    /// contract cache is still consulted (and populated) for each member's
    /// declaring type.
    pub fn resolve_uncached(
        &self,
        type_id: TypeId,
    ) -> Result<Vec<MemberDescriptor>, IntrospectError> {
        let raw = self.introspector.enumerate_members(type_id)?;

        let mut members = Vec::with_capacity(raw.len());
        for info in raw {
            let declaring_contract = self.contracts.has_contract_marker(
                info.declaring_ty(),
                self.introspector.as_ref(),
                self.classifier,
            )?;
            let markers = ResolvedMarkers::resolve(&info, declaring_contract, self.classifier);
            members.push(MemberDescriptor::new(info, markers));
        }
        Ok(members)
    }

    /// Whether the type carries a contract-mode marker, memoized per type.
    pub fn has_contract_marker(&self, type_id: TypeId) -> Result<bool, IntrospectError> {
        self.contracts
            .has_contract_marker(type_id, self.introspector.as_ref(), self.classifier)
    }

    /// Returns the introspector backing this resolver.
    #[inline]
    pub fn introspector(&self) -> &Arc<dyn TypeIntrospector> {
        &self.introspector
    }

    /// Returns the member cache.
    #[inline]
    pub const fn member_cache(&self) -> &MemberCache {
        &self.members
    }

    /// Returns the contract cache.
    #[inline]
    pub const fn contract_cache(&self) -> &ContractCache {
        &self.contracts
    }
}

impl fmt::Debug for MemberResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberResolver")
            .field("members", &self.members)
            .field("contracts", &self.contracts)
            .finish_non_exhaustive()
    }
}
