//! Value types describing members and their annotations.
//!
//! ## Menu
//!
//! - [`Annotation`]: a serialization-relevant marker attached to a type or member.
//! - [`AnnotationSet`]: the ordered annotation collection of one declaration.
//! - Well-known markers: [`Ignore`], [`Rename`], [`ContractMode`], [`ContractName`].
//! - [`MemberInfo`]: the raw handle for one public instance member.
//! - [`MemberOrigin`], [`Getter`]: the member's declaration kind and read path.

// -----------------------------------------------------------------------------
// Modules

mod annotations;
mod markers;
mod member_info;

// -----------------------------------------------------------------------------
// Exports

pub use annotations::{Annotation, AnnotationSet};
pub use markers::{ContractMode, ContractName, Ignore, Rename};
pub use member_info::{Getter, MemberInfo, MemberOrigin};
