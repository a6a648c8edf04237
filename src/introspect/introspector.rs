use core::any::TypeId;

use std::sync::Arc;

use thiserror::Error;

use crate::info::{AnnotationSet, MemberInfo};

// -----------------------------------------------------------------------------
// Error

/// Failure of the underlying type-system query.
///
/// This error is never cached by the resolution layer; a later retry may
/// succeed once the type has been registered.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IntrospectError {
    #[error("type {0:?} is not registered for introspection")]
    UnknownType(TypeId),
}

// -----------------------------------------------------------------------------
// TypeIntrospector

/// Capability interface over a type-introspection facility.
///
/// The resolution layer is written against this trait only, so production
/// code can back it with the [`NativeIntrospector`] registry while tests use
/// hand-built fixture tables or query-counting stubs.
///
/// Both operations are pure functions of the type's structure and perform no
/// side effects; for a given type, the reported member order must be stable
/// within one process run.
///
/// [`NativeIntrospector`]: crate::introspect::NativeIntrospector
pub trait TypeIntrospector: Send + Sync {
    /// Enumerates every public instance member of the type.
    ///
    /// Properties are reported whether or not they have a getter;
    /// readability is recorded on the handle, not filtered here.
    fn enumerate_members(&self, type_id: TypeId) -> Result<Vec<MemberInfo>, IntrospectError>;

    /// Returns the annotations declared on the type itself.
    fn type_annotations(&self, type_id: TypeId) -> Result<Arc<AnnotationSet>, IntrospectError>;
}

impl<T: TypeIntrospector + ?Sized> TypeIntrospector for Arc<T> {
    fn enumerate_members(&self, type_id: TypeId) -> Result<Vec<MemberInfo>, IntrospectError> {
        (**self).enumerate_members(type_id)
    }

    fn type_annotations(&self, type_id: TypeId) -> Result<Arc<AnnotationSet>, IntrospectError> {
        (**self).type_annotations(type_id)
    }
}
