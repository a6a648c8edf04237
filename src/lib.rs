//! Member-metadata resolution cache for serialization contracts.
//!
//! Given a structured-data type, this crate discovers its readable members,
//! extracts the serialization-relevant markers declared on them, and computes
//! each member's effective wire name under a fixed precedence of marker
//! sources. Results are memoized per type, so introspection cost is paid once
//! per type for the lifetime of the process.
//!
//! ## Menu
//!
//! - [`info`]: member handles, annotations, and the well-known markers.
//! - [`introspect`]: the [`TypeIntrospector`] boundary and the
//!   registry-backed [`NativeIntrospector`].
//! - [`resolve`]: marker/name resolution and the per-type caches behind
//!   [`MemberResolver`].
//! - [`typeid_map`]: the `TypeId`-keyed map the caches are built on.
//!
//! ## Name resolution
//!
//! The effective wire name of a member follows a strict precedence chain:
//!
//! 1. a non-empty [`Rename`](info::Rename) payload;
//! 2. a non-empty [`ContractName`](info::ContractName) payload, honored only
//!    when the declaring type carries a [`ContractMode`](info::ContractMode)
//!    marker;
//! 3. the member's own declared name.
//!
//! Contract markers are matched by kind-name string rather than type
//! identity, so equivalent markers declared in other crates interoperate; see
//! [`resolve::default_classifier`].
//!
//! ## Caching model
//!
//! A [`MemberResolver`] owns two `TypeId`-keyed tables: resolved member
//! lists and contract-mode flags. Entries are computed on first request
//! inside one critical section per table, then served unchanged forever —
//! type metadata is assumed immutable for the process lifetime. Failed
//! introspection ([`IntrospectError`]) is never cached, so a retry after
//! registering the type succeeds.

// -----------------------------------------------------------------------------
// Modules

pub mod info;
pub mod introspect;
pub mod resolve;
pub mod typeid_map;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use introspect::{IntrospectError, NativeIntrospector, TypeIntrospector};
pub use resolve::{AccessError, MemberDescriptor, MemberResolver};

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
