use crate::info::{Annotation, ContractMode, ContractName, Ignore, MemberInfo, Rename};

// -----------------------------------------------------------------------------
// MarkerKind

/// The closed set of marker kinds recognized during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Excludes the member from serialization.
    Ignore,
    /// Overrides the member's wire name unconditionally.
    ExplicitName,
    /// Overrides the member's wire name under contract mode.
    MemberContract,
    /// Opts the declaring type into explicit-member-contract mode.
    ContractMode,
}

/// Classifies an annotation as one of the recognized marker kinds.
///
/// Pluggable so callers with their own marker vocabulary can map it onto the
/// resolution algorithm; see [`default_classifier`] for the stock rules.
pub type MarkerClassifier = fn(&dyn Annotation) -> Option<MarkerKind>;

/// The stock classifier.
///
/// [`Ignore`] and [`Rename`] are matched by type identity. The contract
/// markers are matched by their literal kind-name strings
/// ([`ContractMode::KIND`], [`ContractName::KIND`]) rather than identity, so
/// structurally-equivalent markers declared in other crates participate in
/// contract resolution as well. Callers rely on that cross-crate interop;
/// do not tighten it to identity matching.
///
/// # Examples
///
/// ```
/// use sermeta::info::{Ignore, Rename};
/// use sermeta::resolve::{MarkerKind, default_classifier};
///
/// assert_eq!(default_classifier(&Ignore), Some(MarkerKind::Ignore));
/// assert_eq!(default_classifier(&Rename::new("x")), Some(MarkerKind::ExplicitName));
/// ```
pub fn default_classifier(annotation: &dyn Annotation) -> Option<MarkerKind> {
    if annotation.is::<Ignore>() {
        return Some(MarkerKind::Ignore);
    }
    if annotation.is::<Rename>() {
        return Some(MarkerKind::ExplicitName);
    }
    match annotation.kind_name() {
        ContractName::KIND => Some(MarkerKind::MemberContract),
        ContractMode::KIND => Some(MarkerKind::ContractMode),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// ResolvedMarkers

/// The markers found on one member during resolution, plus the declaring
/// type's contract-mode state.
///
/// Immutable once built; owned by its
/// [`MemberDescriptor`](crate::resolve::MemberDescriptor).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMarkers {
    ignore: bool,
    explicit_name: Option<String>,
    contract_name: Option<String>,
    declaring_contract: bool,
}

impl ResolvedMarkers {
    /// Scans the member's annotations once and captures the recognized
    /// markers.
    ///
    /// When the same recognized kind appears more than once on a member, the
    /// last occurrence in declaration order wins, deterministically. String
    /// payloads are captured even when empty; emptiness is checked at
    /// name-resolution time, not here.
    pub(crate) fn resolve(
        member: &MemberInfo,
        declaring_contract: bool,
        classifier: MarkerClassifier,
    ) -> Self {
        let mut markers = Self {
            declaring_contract,
            ..Self::default()
        };

        for annotation in member.annotations().iter() {
            match classifier(annotation) {
                Some(MarkerKind::Ignore) => markers.ignore = true,
                Some(MarkerKind::ExplicitName) => {
                    markers.explicit_name = Some(annotation.payload().unwrap_or("").to_owned());
                }
                Some(MarkerKind::MemberContract) => {
                    markers.contract_name = Some(annotation.payload().unwrap_or("").to_owned());
                }
                // Contract mode is a type-level marker; on a member it is inert.
                Some(MarkerKind::ContractMode) | None => {}
            }
        }

        markers
    }

    /// Returns `true` if an ignore marker is present.
    #[inline]
    pub const fn is_ignored(&self) -> bool {
        self.ignore
    }

    /// Returns the explicit-name override, if present (possibly empty).
    #[inline]
    pub fn explicit_name(&self) -> Option<&str> {
        self.explicit_name.as_deref()
    }

    /// Returns the member-contract override, if present (possibly empty).
    #[inline]
    pub fn contract_name(&self) -> Option<&str> {
        self.contract_name.as_deref()
    }

    /// Returns `true` if the declaring type carries a contract-mode marker.
    #[inline]
    pub const fn declaring_contract(&self) -> bool {
        self.declaring_contract
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{MarkerKind, ResolvedMarkers, default_classifier};
    use crate::info::{Annotation, AnnotationSet, ContractName, Ignore, MemberInfo, Rename};
    use core::any::Any;

    struct Sample {
        value: u32,
    }

    fn member(annotations: AnnotationSet) -> MemberInfo {
        MemberInfo::field::<Sample, u32>("value", |i| {
            i.downcast_ref::<Sample>().map(|s| &s.value as &dyn Any)
        })
        .with_annotations(annotations)
    }

    // A marker from a "foreign" crate: same kind name as ContractName,
    // different type identity.
    #[derive(Debug)]
    struct ForeignContractName(&'static str);

    impl Annotation for ForeignContractName {
        fn kind_name(&self) -> &'static str {
            "ContractName"
        }

        fn payload(&self) -> Option<&str> {
            Some(self.0)
        }
    }

    // Same short name as Rename, but identity-matched kinds must not pick
    // it up.
    #[derive(Debug)]
    struct ForeignRename;

    impl Annotation for ForeignRename {
        fn kind_name(&self) -> &'static str {
            "Rename"
        }
    }

    #[test]
    fn contract_markers_match_by_kind_name() {
        assert_eq!(
            default_classifier(&ForeignContractName("amount")),
            Some(MarkerKind::MemberContract)
        );

        let markers = ResolvedMarkers::resolve(
            &member(AnnotationSet::new().with(ForeignContractName("amount"))),
            true,
            default_classifier,
        );
        assert_eq!(markers.contract_name(), Some("amount"));
    }

    #[test]
    fn identity_markers_ignore_name_collisions() {
        assert_eq!(default_classifier(&ForeignRename), None);
    }

    #[test]
    fn duplicate_markers_are_last_wins() {
        let markers = ResolvedMarkers::resolve(
            &member(
                AnnotationSet::new()
                    .with(Rename::new("first"))
                    .with(Rename::new("second")),
            ),
            false,
            default_classifier,
        );
        assert_eq!(markers.explicit_name(), Some("second"));
    }

    #[test]
    fn empty_payloads_are_captured() {
        let markers = ResolvedMarkers::resolve(
            &member(AnnotationSet::new().with(Rename::new("")).with(Ignore)),
            false,
            default_classifier,
        );
        assert!(markers.is_ignored());
        assert_eq!(markers.explicit_name(), Some(""));
    }

    #[test]
    fn unrecognized_annotations_are_skipped() {
        let markers = ResolvedMarkers::resolve(
            &member(AnnotationSet::new().with(ContractName::new("n"))),
            false,
            |_| None,
        );
        assert_eq!(markers, ResolvedMarkers::default());
    }
}
