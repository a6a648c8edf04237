use core::any::{Any, TypeId};

use std::sync::{Arc, OnceLock};

use crate::info::{AnnotationSet, MemberInfo};

// -----------------------------------------------------------------------------
// MemberTable

/// The static member metadata of one introspectable type: its member handles
/// in enumeration order plus the annotations declared on the type itself.
///
/// A `MemberTable` is built once per type (usually inside a
/// [`MemberTableCell`]) and shared for the process lifetime.
#[derive(Debug)]
pub struct MemberTable {
    declaring_ty: TypeId,
    type_path: &'static str,
    members: Box<[MemberInfo]>,
    annotations: Arc<AnnotationSet>,
}

impl MemberTable {
    /// Creates the member table for type `T`.
    ///
    /// The member order is fixed, depending on the input order.
    pub fn of<T: Any>(members: Vec<MemberInfo>) -> Self {
        Self {
            declaring_ty: TypeId::of::<T>(),
            type_path: core::any::type_name::<T>(),
            members: members.into(),
            annotations: Arc::new(AnnotationSet::new()),
        }
    }

    /// Replaces the type-level annotations (overwrite, do not merge).
    pub fn with_annotations(self, annotations: AnnotationSet) -> Self {
        Self {
            annotations: Arc::new(annotations),
            ..self
        }
    }

    /// Returns the `TypeId` of the described type.
    #[inline]
    pub const fn declaring_ty(&self) -> TypeId {
        self.declaring_ty
    }

    /// Returns the full path of the described type.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the short name of the described type.
    #[inline]
    pub fn name(&self) -> &'static str {
        short_type_name(self.type_path)
    }

    /// Returns the member handles in enumeration order.
    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// Returns the annotations declared on the type itself.
    #[inline]
    pub const fn annotations(&self) -> &Arc<AnnotationSet> {
        &self.annotations
    }
}

/// Extracts the unqualified name from a full type path.
///
/// Generic arguments are preserved: `"m::Pair<m::Id>"` becomes `"Pair<m::Id>"`.
pub fn short_type_name(type_path: &'static str) -> &'static str {
    let head = type_path.split('<').next().unwrap_or(type_path);
    match head.rfind("::") {
        Some(index) => &type_path[index + 2..],
        None => type_path,
    }
}

// -----------------------------------------------------------------------------
// Introspect

/// A static accessor to a type's member metadata.
///
/// A type opts into introspection by implementing this trait, typically
/// through a `static` [`MemberTableCell`] so the table is built on first
/// access and reused afterwards.
///
/// # Examples
///
/// ```
/// use core::any::Any;
/// use sermeta::info::MemberInfo;
/// use sermeta::introspect::{Introspect, MemberTable, MemberTableCell};
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
///                 }),
///                 MemberInfo::field::<Point, f32>("y", |i| {
///                     i.downcast_ref::<Point>().map(|p| &p.y as &dyn Any)
///                 }),
///             ])
///         })
///     }
/// }
///
/// let table = Point::member_table();
/// assert_eq!(table.name(), "Point");
/// assert_eq!(table.members().len(), 2);
/// ```
pub trait Introspect: Any {
    /// Returns the member metadata of this type.
    fn member_table() -> &'static MemberTable;
}

// -----------------------------------------------------------------------------
// MemberTableCell

/// A container for a lazily-built [`MemberTable`] with a `'static` lifetime.
///
/// Intended to back [`Introspect::member_table`] implementations; see the
/// example there.
pub struct MemberTableCell(OnceLock<MemberTable>);

impl MemberTableCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored table, building it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> MemberTable) -> &MemberTable {
        self.0.get_or_init(f)
    }
}

impl Default for MemberTableCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests
