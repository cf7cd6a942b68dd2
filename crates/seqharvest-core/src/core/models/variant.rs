use std::fmt;

/// The identity of one design variant: the residues found in each variable region of
/// the master sequence, in region order.
///
/// Keys are produced by [`VariableRegions::extract`](crate::core::sequence::regions::VariableRegions::extract)
/// and compare region-by-region, so two models with the same residues at every design
/// position collapse onto the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantKey(Vec<String>);

impl VariantKey {
    pub fn new(regions: Vec<String>) -> Self {
        Self(regions)
    }

    pub fn regions(&self) -> &[String] {
        &self.0
    }

    pub fn region_count(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for VariantKey {
    fn from(regions: Vec<String>) -> Self {
        Self(regions)
    }
}

impl FromIterator<String> for VariantKey {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}
