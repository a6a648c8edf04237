use core::any::TypeId;
use core::fmt;

use std::sync::{Arc, PoisonError, RwLock};

use foldhash::fast::FixedState;
use hashbrown::{HashMap, HashSet};

use crate::info::{AnnotationSet, MemberInfo};
use crate::introspect::{Introspect, IntrospectError, MemberTable, TypeIntrospector};
use crate::typeid_map::TypeIdMap;

// A fixed hash seed, so the name index behaves identically across runs.
const NAME_INDEX_STATE: FixedState = FixedState::with_seed(0x6D656D6265727331);

type NameMap<V> = HashMap<&'static str, V, FixedState>;
type NameSet = HashSet<&'static str, FixedState>;

// -----------------------------------------------------------------------------
// NativeIntrospector

/// The production [`TypeIntrospector`]: an explicit registry of
/// [`MemberTable`]s keyed by type identity.
///
/// Rust has no ambient runtime reflection, so types opt in by implementing
/// [`Introspect`] and being [registered](NativeIntrospector::register) (or
/// collected statically, see [`auto_register`](NativeIntrospector::auto_register)).
/// Querying a type that has not been registered yet fails with
/// [`IntrospectError::UnknownType`]; the failure is not sticky, and the same
/// query succeeds once the type is registered.
///
/// Registration and queries are safe to call from any thread.
///
/// # Examples
///
/// ```
/// use core::any::{Any, TypeId};
/// use sermeta::info::MemberInfo;
/// use sermeta::introspect::{
///     Introspect, MemberTable, MemberTableCell, NativeIntrospector, TypeIntrospector,
/// };
///
/// struct Credentials {
///     user: String,
/// }
///
/// impl Introspect for Credentials {
///     fn member_table() -> &'static MemberTable {
///         static CELL: MemberTableCell = MemberTableCell::new();
///         CELL.get_or_init(|| {
///             MemberTable::of::<Credentials>(vec![MemberInfo::field::<Credentials, String>(
///                 "user",
///                 |i| i.downcast_ref::<Credentials>().map(|c| &c.user as &dyn Any),
///             )])
///         })
///     }
/// }
///
/// let introspector = NativeIntrospector::new();
/// let ty = TypeId::of::<Credentials>();
///
/// // Unregistered types fail; the failure is not sticky.
/// assert!(introspector.enumerate_members(ty).is_err());
///
/// introspector.register::<Credentials>();
/// let members = introspector.enumerate_members(ty).unwrap();
/// assert_eq!(members[0].name(), "user");
/// ```
pub struct NativeIntrospector {
    inner: RwLock<Inner>,
}

struct Inner {
    tables: TypeIdMap<&'static MemberTable>,
    name_to_id: NameMap<TypeId>,
    ambiguous_names: NameSet,
}

impl NativeIntrospector {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tables: TypeIdMap::new(),
                name_to_id: NameMap::with_hasher(NAME_INDEX_STATE),
                ambiguous_names: NameSet::with_hasher(NAME_INDEX_STATE),
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers the type `T` if it has not been registered already.
    #[inline]
    pub fn register<T: Introspect>(&self) {
        self.insert_table(T::member_table());
    }

    /// Inserts a prebuilt table, keyed by its declaring type.
    ///
    /// Does nothing if the type is already registered. Short names are
    /// indexed on first registration; a name claimed by two distinct types
    /// becomes ambiguous and resolves to neither.
    pub fn insert_table(&self, table: &'static MemberTable) {
        let mut inner = self.write();
        let inserted = inner.tables.try_insert(table.declaring_ty(), || table);
        if !inserted {
            return;
        }

        let name = table.name();
        if !inner.ambiguous_names.contains(name) {
            if inner.name_to_id.contains_key(name) {
                inner.name_to_id.remove(name);
                inner.ambiguous_names.insert(name);
            } else {
                inner.name_to_id.insert(name, table.declaring_ty());
            }
        }
    }

    /// Whether the type with the given [`TypeId`] has been registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.read().tables.contains(&type_id)
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.read().tables.len()
    }

    /// Returns `true` if no types have been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read().tables.is_empty()
    }

    /// Returns the table registered for the given [`TypeId`], if any.
    pub fn table(&self, type_id: TypeId) -> Option<&'static MemberTable> {
        self.read().tables.get(&type_id).copied()
    }

    /// Returns the table registered under the given short type name.
    ///
    /// If the name is ambiguous, or no type with that name has been
    /// registered, returns `None`.
    pub fn table_with_name(&self, name: &str) -> Option<&'static MemberTable> {
        let inner = self.read();
        let type_id = *inner.name_to_id.get(name)?;
        inner.tables.get(&type_id).copied()
    }

    /// Returns `true` if the given short name matches multiple registered
    /// types.
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.read().ambiguous_names.contains(name)
    }

    /// Registers every type submitted with [`submit_introspect!`].
    ///
    /// Repeated calls are cheap and will not insert duplicates. Returns
    /// `true` if static registration is available; when the `auto_register`
    /// feature is disabled this is a no-op returning `false`.
    ///
    /// [`submit_introspect!`]: crate::submit_introspect
    pub fn auto_register(&self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            for registration in inventory::iter::<IntrospectRegistration> {
                self.insert_table((registration.table)());
            }
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl Default for NativeIntrospector {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NativeIntrospector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        f.debug_set()
            .entries(inner.tables.values().map(|table| table.type_path()))
            .finish()
    }
}

impl TypeIntrospector for NativeIntrospector {
    fn enumerate_members(&self, type_id: TypeId) -> Result<Vec<MemberInfo>, IntrospectError> {
        match self.table(type_id) {
            Some(table) => Ok(table.members().to_vec()),
            None => Err(IntrospectError::UnknownType(type_id)),
        }
    }

    fn type_annotations(&self, type_id: TypeId) -> Result<Arc<AnnotationSet>, IntrospectError> {
        match self.table(type_id) {
            Some(table) => Ok(Arc::clone(table.annotations())),
            None => Err(IntrospectError::UnknownType(type_id)),
        }
    }
}

// -----------------------------------------------------------------------------
// Static registration

/// A deferred registration collected by [`NativeIntrospector::auto_register`].
///
/// Submitted through [`submit_introspect!`](crate::submit_introspect).
#[cfg(feature = "auto_register")]
pub struct IntrospectRegistration {
    /// Accessor for the submitted type's member table.
    pub table: fn() -> &'static MemberTable,
}

#[cfg(feature = "auto_register")]
inventory::collect!(IntrospectRegistration);

/// Submits a type implementing [`Introspect`] for static registration.
///
/// All submitted types are picked up by
/// [`NativeIntrospector::auto_register`].
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_introspect {
    ($ty:ty) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::introspect::IntrospectRegistration {
                table: <$ty as $crate::introspect::Introspect>::member_table,
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::NativeIntrospector;
    use crate::info::{AnnotationSet, ContractMode, MemberInfo};
    use crate::introspect::{IntrospectError, MemberTable, TypeIntrospector};
    use core::any::{Any, TypeId};
    use std::sync::OnceLock;

    mod red {
        pub struct Widget {
            pub id: u32,
        }
    }

    mod blue {
        pub struct Widget {
            pub id: u32,
        }
    }

    fn red_table() -> &'static MemberTable {
        static CELL: OnceLock<MemberTable> = OnceLock::new();
        CELL.get_or_init(|| {
            MemberTable::of::<red::Widget>(vec![MemberInfo::field::<red::Widget, u32>(
                "id",
                |i| i.downcast_ref::<red::Widget>().map(|w| &w.id as &dyn Any),
            )])
            .with_annotations(AnnotationSet::new().with(ContractMode))
        })
    }

    fn blue_table() -> &'static MemberTable {
        static CELL: OnceLock<MemberTable> = OnceLock::new();
        CELL.get_or_init(|| {
            MemberTable::of::<blue::Widget>(vec![MemberInfo::field::<blue::Widget, u32>(
                "id",
                |i| i.downcast_ref::<blue::Widget>().map(|w| &w.id as &dyn Any),
            )])
        })
    }

    #[test]
    fn unknown_type_fails_until_registered() {
        let introspector = NativeIntrospector::new();
        let ty = TypeId::of::<red::Widget>();

        assert_eq!(
            introspector.enumerate_members(ty),
            Err(IntrospectError::UnknownType(ty))
        );

        introspector.insert_table(red_table());
        assert_eq!(introspector.enumerate_members(ty).unwrap().len(), 1);
        assert!(introspector.type_annotations(ty).unwrap().contains::<ContractMode>());
    }

    #[test]
    fn duplicate_registration_is_a_no_op() {
        let introspector = NativeIntrospector::new();
        introspector.insert_table(red_table());
        introspector.insert_table(red_table());
        assert_eq!(introspector.len(), 1);
    }

    #[test]
    fn duplicate_short_names_become_ambiguous() {
        let introspector = NativeIntrospector::new();
        introspector.insert_table(red_table());
        assert!(introspector.table_with_name("Widget").is_some());

        introspector.insert_table(blue_table());
        assert!(introspector.is_ambiguous("Widget"));
        assert!(introspector.table_with_name("Widget").is_none());
    }
}
