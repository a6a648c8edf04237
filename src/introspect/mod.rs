//! The type-introspection boundary.
//!
//! ## Menu
//!
//! - [`TypeIntrospector`]: capability interface the resolution layer is
//!   written against.
//! - [`IntrospectError`]: failure of the underlying type-system query.
//! - [`Introspect`]: a trait types implement to describe their members.
//! - [`MemberTable`] / [`MemberTableCell`]: the static metadata behind an
//!   [`Introspect`] impl.
//! - [`NativeIntrospector`]: the production registry-backed introspector.
//!
//! ## auto_register
//!
//! See [`NativeIntrospector::auto_register`].
//!
//! We use the `inventory` crate to implement static registration; not all
//! platforms support it (although major platforms do). When unsupported or
//! disabled, the method is a no-op returning `false`.

// -----------------------------------------------------------------------------
// Modules

mod introspector;
mod native;
mod table;

// -----------------------------------------------------------------------------
// Exports

pub use introspector::{IntrospectError, TypeIntrospector};
#[cfg(feature = "auto_register")]
pub use native::IntrospectRegistration;
pub use native::NativeIntrospector;
pub use table::{Introspect, MemberTable, MemberTableCell, short_type_name};
