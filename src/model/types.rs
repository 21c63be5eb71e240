/// One atom's entry in the per-frame listing of a forces log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomKind {
    pub kind: u32,
    pub element: String,
}

impl AtomKind {
    pub fn new(kind: u32, element: impl Into<String>) -> Self {
        Self {
            kind,
            element: element.into(),
        }
    }
}

/// Atom-type information recovered from a forces log.
///
/// `kind_to_element` keeps the order in which kinds were first seen; that
/// order defines `type_map.raw`. `ordering` lists every atom of one frame in
/// file order and defines `type.raw`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomTypes {
    kind_to_element: Vec<(u32, String)>,
    ordering: Vec<AtomKind>,
}

impl AtomTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a kind/element association. A kind seen again keeps its
    /// original position but takes the newer element.
    pub fn record_kind(&mut self, kind: u32, element: &str) {
        match self.kind_to_element.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, existing)) => {
                if existing != element {
                    *existing = element.to_string();
                }
            }
            None => self.kind_to_element.push((kind, element.to_string())),
        }
    }

    pub fn set_ordering(&mut self, ordering: Vec<AtomKind>) {
        self.ordering = ordering;
    }

    pub fn kind_to_element(&self) -> &[(u32, String)] {
        &self.kind_to_element
    }

    pub fn ordering(&self) -> &[AtomKind] {
        &self.ordering
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.ordering.len()
    }

    /// Element symbols in first-seen kind order.
    pub fn type_map(&self) -> Vec<&str> {
        self.kind_to_element
            .iter()
            .map(|(_, e)| e.as_str())
            .collect()
    }

    /// Per-atom element symbols in file order.
    pub fn element_ordering(&self) -> Vec<&str> {
        self.ordering.iter().map(|a| a.element.as_str()).collect()
    }

    /// Per-atom zero-based type indices (`kind - 1`) in file order.
    pub fn type_indices(&self) -> Vec<u32> {
        self.ordering
            .iter()
            .map(|a| a.kind.saturating_sub(1))
            .collect()
    }

    /// Kinds whose position in the type map differs from `kind - 1`.
    ///
    /// When non-empty, `type.raw` indices do not point at the matching
    /// `type_map.raw` line.
    pub fn misnumbered_kinds(&self) -> Vec<u32> {
        self.kind_to_element
            .iter()
            .enumerate()
            .filter(|(pos, (kind, _))| *kind as usize != pos + 1)
            .map(|(_, (kind, _))| *kind)
            .collect()
    }
}
