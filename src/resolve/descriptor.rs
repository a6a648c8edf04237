use core::any::Any;

use thiserror::Error;

use crate::info::MemberInfo;
use crate::resolve::ResolvedMarkers;

// -----------------------------------------------------------------------------
// Error

/// Failure of the read-value path.
///
/// Propagated immediately; never retried automatically.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("member `{member}` is not readable (property without a getter)")]
    NotReadable { member: &'static str },

    #[error("member `{member}` requires index arguments and cannot be read directly")]
    IndexedMember { member: &'static str },

    #[error("instance passed to member `{member}` does not match its declaring type")]
    IncompatibleInstance { member: &'static str },
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One fully resolved serializable member of a type: the raw handle combined
/// with its [`ResolvedMarkers`].
///
/// Descriptors are created once per `(type, member)` pair, are immutable
/// after construction, and live inside the member cache for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    info: MemberInfo,
    markers: ResolvedMarkers,
}

impl MemberDescriptor {
    #[inline]
    pub(crate) fn new(info: MemberInfo, markers: ResolvedMarkers) -> Self {
        Self { info, markers }
    }

    /// Returns the underlying member handle.
    #[inline]
    pub const fn info(&self) -> &MemberInfo {
        &self.info
    }

    /// Returns the markers resolved for this member.
    #[inline]
    pub const fn markers(&self) -> &ResolvedMarkers {
        &self.markers
    }

    /// Returns the member's declared name.
    #[inline]
    pub const fn declared_name(&self) -> &'static str {
        self.info.name()
    }

    /// Returns `true` if the member's value can be read.
    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.info.is_readable()
    }

    /// Returns `true` if reading the member requires index arguments.
    #[inline]
    pub const fn is_indexed_accessor(&self) -> bool {
        self.info.is_indexed()
    }

    /// Returns `true` if an ignore marker excludes the member from
    /// serialization.
    #[inline]
    pub const fn is_ignored(&self) -> bool {
        self.markers.is_ignored()
    }

    /// Returns `true` if a serializer should emit this member: readable, not
    /// an indexed accessor, not ignore-marked.
    #[inline]
    pub const fn is_serializable(&self) -> bool {
        self.is_readable() && !self.is_indexed_accessor() && !self.is_ignored()
    }

    /// Computes the member's effective wire name.
    ///
    /// Strict precedence, recomputed on each call:
    ///
    /// 1. a non-empty explicit-name override;
    /// 2. under contract mode, a non-empty member-contract override;
    /// 3. the member's own declared name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use core::any::Any;
    /// # use std::sync::Arc;
    /// use sermeta::MemberResolver;
    /// use sermeta::info::{AnnotationSet, MemberInfo, Rename};
    /// use sermeta::introspect::{Introspect, MemberTable, MemberTableCell, NativeIntrospector};
    ///
    /// struct Point {
    ///     x: f32,
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
    /// assert_eq!(members[0].resolve_name(), "X");
    /// ```
    pub fn resolve_name(&self) -> &str {
        if let Some(name) = self.markers.explicit_name()
            && !name.is_empty()
        {
            return name;
        }
        if self.markers.declaring_contract()
            && let Some(name) = self.markers.contract_name()
            && !name.is_empty()
        {
            return name;
        }
        self.info.name()
    }

    /// Reads the member's current value off a live instance.
    ///
    /// Fails if the member is an indexed accessor, has no getter, or if the
    /// instance's runtime type does not match the declaring type.
    ///
    /// # Errors
    ///
    /// See [`AccessError`].
    pub fn get_value<'a>(&self, instance: &'a dyn Any) -> Result<&'a dyn Any, AccessError> {
        if self.info.is_indexed() {
            return Err(AccessError::IndexedMember {
                member: self.info.name(),
            });
        }
        let Some(getter) = self.info.getter() else {
            return Err(AccessError::NotReadable {
                member: self.info.name(),
            });
        };
        getter(instance).ok_or(AccessError::IncompatibleInstance {
            member: self.info.name(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{AccessError, MemberDescriptor};
    use crate::info::{AnnotationSet, ContractName, MemberInfo, Rename};
    use crate::resolve::{ResolvedMarkers, default_classifier};
    use core::any::Any;

    struct Sample {
        value: u32,
    }

    fn value_getter(instance: &dyn Any) -> Option<&dyn Any> {
        instance.downcast_ref::<Sample>().map(|s| &s.value as &dyn Any)
    }

    fn descriptor(member: MemberInfo, declaring_contract: bool) -> MemberDescriptor {
        let markers = ResolvedMarkers::resolve(&member, declaring_contract, default_classifier);
        MemberDescriptor::new(member, markers)
    }

    #[test]
    fn explicit_name_beats_contract_name() {
        let member = MemberInfo::field::<Sample, u32>("value", value_getter).with_annotations(
            AnnotationSet::new()
                .with(Rename::new("explicit"))
                .with(ContractName::new("contract")),
        );
        assert_eq!(descriptor(member, true).resolve_name(), "explicit");
    }

    #[test]
    fn contract_name_requires_contract_mode() {
        let member = MemberInfo::field::<Sample, u32>("value", value_getter)
            .with_annotations(AnnotationSet::new().with(ContractName::new("contract")));

        assert_eq!(descriptor(member.clone(), true).resolve_name(), "contract");
        assert_eq!(descriptor(member, false).resolve_name(), "value");
    }

    #[test]
    fn empty_overrides_fall_through() {
        let member = MemberInfo::field::<Sample, u32>("value", value_getter).with_annotations(
            AnnotationSet::new()
                .with(Rename::new(""))
                .with(ContractName::new("")),
        );
        assert_eq!(descriptor(member, true).resolve_name(), "value");
    }

    #[test]
    fn get_value_reads_fields() {
        let member = MemberInfo::field::<Sample, u32>("value", value_getter);
        let descriptor = descriptor(member, false);

        let sample = Sample { value: 7 };
        let value = descriptor.get_value(&sample).unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&7));
    }

    #[test]
    fn get_value_rejects_foreign_instances() {
        let member = MemberInfo::field::<Sample, u32>("value", value_getter);
        let descriptor = descriptor(member, false);

        assert_eq!(
            descriptor.get_value(&"not a sample").unwrap_err(),
            AccessError::IncompatibleInstance { member: "value" }
        );
    }

    #[test]
    fn get_value_rejects_indexed_and_getterless_members() {
        let indexed = descriptor(
            MemberInfo::property::<Sample, u32>("items", Some(value_getter)).with_indexed(),
            false,
        );
        let getterless = descriptor(MemberInfo::property::<Sample, u32>("value", None), false);

        let sample = Sample { value: 7 };
        assert_eq!(
            indexed.get_value(&sample).unwrap_err(),
            AccessError::IndexedMember { member: "items" }
        );
        assert!(indexed.is_indexed_accessor());
        assert_eq!(
            getterless.get_value(&sample).unwrap_err(),
            AccessError::NotReadable { member: "value" }
        );
    }
}
