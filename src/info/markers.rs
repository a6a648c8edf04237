use std::borrow::Cow;

use crate::info::Annotation;

// -----------------------------------------------------------------------------
// Ignore

/// Marker annotation excluding a member from serialization.
///
/// Matched by type identity during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ignore;

impl Annotation for Ignore {
    fn kind_name(&self) -> &'static str {
        "Ignore"
    }
}

// -----------------------------------------------------------------------------
// Rename

/// Marker annotation overriding a member's wire name unconditionally.
///
/// Matched by type identity during resolution. The payload is captured even
/// when empty; an empty payload is rejected later, at name-resolution time,
/// where it falls through to the next precedence step.
///
/// # Examples
///
/// ```
/// use sermeta::info::{Annotation, Rename};
///
/// let marker = Rename::new("X");
/// assert_eq!(marker.name(), "X");
/// assert_eq!(marker.payload(), Some("X"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename(Cow<'static, str>);

impl Rename {
    /// Creates a new `Rename` marker with the given override name.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the override name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Annotation for Rename {
    fn kind_name(&self) -> &'static str {
        "Rename"
    }

    fn payload(&self) -> Option<&str> {
        Some(&self.0)
    }
}

// -----------------------------------------------------------------------------
// ContractMode

/// Type-level marker opting the declaring type into explicit-member-contract
/// mode.
///
/// Matched by [`kind name`](Annotation::kind_name), not by type identity, so
/// an equivalent marker declared in another crate is recognized as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractMode;

impl ContractMode {
    /// The well-known kind name of the contract-mode marker.
    pub const KIND: &'static str = "ContractMode";
}

impl Annotation for ContractMode {
    fn kind_name(&self) -> &'static str {
        Self::KIND
    }
}

// -----------------------------------------------------------------------------
// ContractName

/// Member-level marker overriding a member's wire name, honored only when the
/// declaring type carries a [`ContractMode`] marker.
///
/// Matched by [`kind name`](Annotation::kind_name), not by type identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractName(Cow<'static, str>);

impl ContractName {
    /// The well-known kind name of the member-contract marker.
    pub const KIND: &'static str = "ContractName";

    /// Creates a new `ContractName` marker with the given override name.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the override name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Annotation for ContractName {
    fn kind_name(&self) -> &'static str {
        Self::KIND
    }

    fn payload(&self) -> Option<&str> {
        Some(&self.0)
    }
}
