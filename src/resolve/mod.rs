//! Marker resolution, name resolution, and the per-type caches.
//!
//! ## Menu
//!
//! - [`MemberResolver`]: the top-level entry point external callers use.
//! - [`MemberDescriptor`]: one fully resolved serializable member.
//! - [`ResolvedMarkers`]: the recognized markers found on one member.
//! - [`MarkerKind`] / [`MarkerClassifier`] / [`default_classifier`]: the
//!   closed marker vocabulary and its pluggable matching rules.
//! - [`MemberCache`] / [`ContractCache`]: the per-type memoization tables.
//! - [`AccessError`]: failure of the read-value path.

// -----------------------------------------------------------------------------
// Modules

mod contract_cache;
mod descriptor;
mod markers;
mod member_cache;
mod resolver;

// -----------------------------------------------------------------------------
// Exports

pub use contract_cache::ContractCache;
pub use descriptor::{AccessError, MemberDescriptor};
pub use markers::{MarkerClassifier, MarkerKind, ResolvedMarkers, default_classifier};
pub use member_cache::MemberCache;
pub use resolver::MemberResolver;
