use core::any::{Any, TypeId};

use std::sync::Arc;

use crate::info::AnnotationSet;

// -----------------------------------------------------------------------------
// Getter

/// A function reading a member's current value off a live instance.
///
/// Returns `None` when the instance's runtime type does not match the
/// member's declaring type (or when a computed property cannot produce a
/// borrowed value for it).
pub type Getter = fn(&dyn Any) -> Option<&dyn Any>;

// -----------------------------------------------------------------------------
// MemberOrigin

/// What kind of declaration a member comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberOrigin {
    /// A plain data field. Always readable.
    Field,
    /// An accessor-backed property. Readable only if a getter exists.
    Property {
        /// Whether the property declares a getter.
        has_getter: bool,
    },
}

// -----------------------------------------------------------------------------
// MemberInfo

/// The raw handle for one public instance member of a type, as reported by
/// the member enumerator.
///
/// Created once per `(type, member)` pair and immutable after construction.
/// Cloning is cheap: annotations are shared behind an [`Arc`].
///
/// # Examples
///
/// ```
/// use core::any::Any;
/// use sermeta::info::{AnnotationSet, MemberInfo, Rename};
///
/// struct Point {
///     x: f32,
/// }
///
/// let member = MemberInfo::field::<Point, f32>("x", |instance| {
///     instance.downcast_ref::<Point>().map(|p| &p.x as &dyn Any)
/// })
/// .with_annotations(AnnotationSet::new().with(Rename::new("X")));
///
/// assert_eq!(member.name(), "x");
/// assert!(member.is_readable());
/// assert!(!member.is_indexed());
/// assert!(member.annotations().contains::<Rename>());
/// ```
#[derive(Debug, Clone)]
pub struct MemberInfo {
    name: &'static str,
    origin: MemberOrigin,
    indexed: bool,
    value_ty: TypeId,
    declaring_ty: TypeId,
    getter: Option<Getter>,
    // Use `Option` to reduce unnecessary heap requests (when empty content).
    annotations: Option<Arc<AnnotationSet>>,
}

impl MemberInfo {
    /// Creates the handle for a public field `name` of type `V`, declared by
    /// `O`.
    pub fn field<O: Any, V: Any>(name: &'static str, getter: Getter) -> Self {
        Self {
            name,
            origin: MemberOrigin::Field,
            indexed: false,
            value_ty: TypeId::of::<V>(),
            declaring_ty: TypeId::of::<O>(),
            getter: Some(getter),
            annotations: None,
        }
    }

    /// Creates the handle for a public property `name` of type `V`, declared
    /// by `O`.
    ///
    /// Properties without a getter are still enumerated; readability is
    /// recorded, not filtered.
    pub fn property<O: Any, V: Any>(name: &'static str, getter: Option<Getter>) -> Self {
        Self {
            name,
            origin: MemberOrigin::Property {
                has_getter: getter.is_some(),
            },
            indexed: false,
            value_ty: TypeId::of::<V>(),
            declaring_ty: TypeId::of::<O>(),
            getter,
            annotations: None,
        }
    }

    /// Marks this member as an indexed accessor (reading it requires index
    /// arguments). Such members are excluded from the read-value path.
    pub fn with_indexed(self) -> Self {
        Self {
            indexed: true,
            ..self
        }
    }

    /// Replaces stored annotations (overwrite, do not merge).
    pub fn with_annotations(self, annotations: AnnotationSet) -> Self {
        if annotations.is_empty() {
            Self {
                annotations: None,
                ..self
            }
        } else {
            Self {
                annotations: Some(Arc::new(annotations)),
                ..self
            }
        }
    }

    /// Returns the member's declared name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns what kind of declaration this member comes from.
    #[inline]
    pub const fn origin(&self) -> MemberOrigin {
        self.origin
    }

    /// Returns `true` if reading this member requires index arguments.
    #[inline]
    pub const fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Returns `true` if the member's value can be read.
    ///
    /// Fields are always readable; properties only when a getter exists.
    #[inline]
    pub const fn is_readable(&self) -> bool {
        match self.origin {
            MemberOrigin::Field => true,
            MemberOrigin::Property { has_getter } => has_getter,
        }
    }

    /// Returns the `TypeId` of the member's value type.
    #[inline]
    pub const fn value_ty(&self) -> TypeId {
        self.value_ty
    }

    /// Returns the `TypeId` of the member's declaring type.
    #[inline]
    pub const fn declaring_ty(&self) -> TypeId {
        self.declaring_ty
    }

    /// Returns the annotations declared on this member.
    #[inline]
    pub fn annotations(&self) -> &AnnotationSet {
        match &self.annotations {
            Some(annotations) => annotations,
            None => AnnotationSet::EMPTY,
        }
    }

    /// Returns the member's getter, if any.
    #[inline]
    pub(crate) const fn getter(&self) -> Option<Getter> {
        self.getter
    }
}

// Handle equality: two handles are equal when they designate the same member
// of the same type. Getter pointers and annotation storage do not take part.
impl PartialEq for MemberInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.origin == other.origin
            && self.indexed == other.indexed
            && self.value_ty == other.value_ty
            && self.declaring_ty == other.declaring_ty
    }
}

impl Eq for MemberInfo {}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{MemberInfo, MemberOrigin};
    use crate::info::{AnnotationSet, Ignore};
    use core::any::Any;

    struct Sample {
        value: u32,
    }

    fn value_getter(instance: &dyn Any) -> Option<&dyn Any> {
        instance.downcast_ref::<Sample>().map(|s| &s.value as &dyn Any)
    }

    #[test]
    fn fields_are_always_readable() {
        let member = MemberInfo::field::<Sample, u32>("value", value_getter);
        assert!(member.is_readable());
        assert_eq!(member.origin(), MemberOrigin::Field);
    }

    #[test]
    fn property_readability_follows_getter() {
        let with = MemberInfo::property::<Sample, u32>("value", Some(value_getter));
        let without = MemberInfo::property::<Sample, u32>("value", None);

        assert!(with.is_readable());
        assert!(!without.is_readable());
    }

    #[test]
    fn empty_annotations_share_the_static_instance() {
        let member =
            MemberInfo::field::<Sample, u32>("value", value_getter).with_annotations(AnnotationSet::new());
        assert!(member.annotations().is_empty());

        let member = member.with_annotations(AnnotationSet::new().with(Ignore));
        assert_eq!(member.annotations().len(), 1);
    }

    #[test]
    fn handle_equality_ignores_annotations() {
        let plain = MemberInfo::field::<Sample, u32>("value", value_getter);
        let annotated = plain.clone().with_annotations(AnnotationSet::new().with(Ignore));
        assert_eq!(plain, annotated);
    }
}
