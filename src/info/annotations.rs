use core::any::{Any, TypeId};
use core::fmt;

// -----------------------------------------------------------------------------
// Annotation

/// A serialization-relevant annotation attached to a type or a member.
///
/// Annotations carry two things the resolution layer can look at:
///
/// - their concrete type, for identity-based matching (see
///   [`<dyn Annotation>::is`](trait.Annotation.html#method.is)), and
/// - a [`kind_name`](Annotation::kind_name), a short textual name used for
///   name-based matching so that structurally-equivalent marker types
///   declared in different crates are treated uniformly.
///
/// Markers that carry a string (a wire-name override, for example) expose it
/// through [`payload`](Annotation::payload).
///
/// # Examples
///
/// ```
/// use sermeta::info::{Annotation, Rename};
///
/// let marker = Rename::new("wire_name");
/// assert_eq!(marker.kind_name(), "Rename");
/// assert_eq!(marker.payload(), Some("wire_name"));
/// ```
pub trait Annotation: Any + Send + Sync + fmt::Debug {
    /// The short name of this annotation kind.
    ///
    /// By convention this is the marker type's unqualified name, shared by
    /// all structurally-equivalent declarations of the marker.
    fn kind_name(&self) -> &'static str;

    /// The string payload carried by this annotation, if any.
    fn payload(&self) -> Option<&str> {
        None
    }
}

impl dyn Annotation {
    /// Check if the underlying annotation is of type `T`.
    #[inline]
    pub fn is<T: Annotation>(&self) -> bool {
        // Upcast first so `type_id` dispatches to the concrete type.
        let any: &dyn Any = self;
        any.type_id() == TypeId::of::<T>()
    }

    /// Downcasts the annotation to a concrete marker type.
    #[inline]
    pub fn downcast_ref<T: Annotation>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}

// -----------------------------------------------------------------------------
// AnnotationSet

/// The ordered collection of annotations declared on a type or member.
///
/// Entries are kept in declaration order. When the same marker kind appears
/// more than once, resolution scans the set once and the **last** occurrence
/// wins; lookups through [`get`](AnnotationSet::get) follow the same rule.
///
/// # Examples
///
/// ```
/// use sermeta::info::{AnnotationSet, Ignore, Rename};
///
/// let set = AnnotationSet::new()
///     .with(Ignore)
///     .with(Rename::new("id"));
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains::<Ignore>());
/// assert_eq!(set.get::<Rename>().unwrap().name(), "id");
/// ```
#[derive(Default)]
pub struct AnnotationSet {
    entries: Vec<Box<dyn Annotation>>,
}

impl AnnotationSet {
    /// A static reference to an empty [`AnnotationSet`].
    ///
    /// Member handles store their annotations as `Option<Arc<..>>` to avoid
    /// heap allocations when there are none. To avoid returning `None`, we
    /// provide this const empty instance.
    pub(crate) const EMPTY: &'static Self = &Self::new();

    /// Creates an empty [`AnnotationSet`].
    ///
    /// Equivalent to [`Default`], but this is a const function.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an annotation, preserving declaration order.
    #[inline]
    pub fn with(mut self, annotation: impl Annotation) -> Self {
        self.push(annotation);
        self
    }

    /// Appends an annotation, preserving declaration order.
    #[inline]
    pub fn push(&mut self, annotation: impl Annotation) {
        self.entries.push(Box::new(annotation));
    }

    /// Returns an iterator over the annotations in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Annotation> {
        self.entries.iter().map(|entry| &**entry)
    }

    /// Returns the last annotation of type `T`, if present.
    pub fn get<T: Annotation>(&self) -> Option<&T> {
        self.entries.iter().rev().find_map(|entry| entry.downcast_ref::<T>())
    }

    /// Returns `true` if an annotation of type `T` is present.
    #[inline]
    pub fn contains<T: Annotation>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Returns the number of stored annotations.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no annotations are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for AnnotationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::AnnotationSet;
    use crate::info::{ContractName, Ignore, Rename};

    #[test]
    fn declaration_order_is_preserved() {
        let set = AnnotationSet::new()
            .with(Rename::new("a"))
            .with(Ignore)
            .with(ContractName::new("b"));

        let kinds: Vec<_> = set.iter().map(|a| a.kind_name()).collect();
        assert_eq!(kinds, ["Rename", "Ignore", "ContractName"]);
    }

    #[test]
    fn duplicate_lookup_is_last_wins() {
        let set = AnnotationSet::new()
            .with(Rename::new("first"))
            .with(Rename::new("second"));

        assert_eq!(set.get::<Rename>().unwrap().name(), "second");
    }

    #[test]
    fn downcast_by_identity() {
        let set = AnnotationSet::new().with(Ignore);
        let annotation = set.iter().next().unwrap();

        assert!(annotation.is::<Ignore>());
        assert!(!annotation.is::<Rename>());
        assert!(annotation.downcast_ref::<Ignore>().is_some());
    }
}
