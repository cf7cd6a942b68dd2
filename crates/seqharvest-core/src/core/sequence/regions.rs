use super::annotation::strip_annotations;
use crate::core::models::variant::VariantKey;
use phf::{Set, phf_set};

/// Ambiguity codes that mark a design position in a master sequence.
///
/// Fixed residues (`a`, `c`, `g`, `u`) are part of the problem definition and never
/// vary, so only these eleven letters open a variable region. Matching is case-sensitive.
static DESIGN_CODES: Set<char> = phf_set! {
    'n', 'b', 'd', 'h', 'v', 'w', 's', 'k', 'm', 'y', 'r',
};

pub fn is_design_code(residue: char) -> bool {
    DESIGN_CODES.contains(&residue)
}

/// The variable regions of a master sequence: maximal runs of consecutive design
/// positions, in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRegions {
    master: String,
    master_len: usize,
    groups: Vec<Vec<usize>>,
}

impl VariableRegions {
    pub fn from_master(master: &str) -> Self {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut master_len = 0;

        for (i, residue) in master.chars().enumerate() {
            master_len += 1;
            if !is_design_code(residue) {
                continue;
            }
            let extends_last = groups
                .last()
                .and_then(|group| group.last())
                .is_some_and(|&last| i == last + 1);
            if extends_last {
                if let Some(group) = groups.last_mut() {
                    group.push(i);
                }
            } else {
                groups.push(vec![i]);
            }
        }

        Self {
            master: master.to_string(),
            master_len,
            groups,
        }
    }

    pub fn master(&self) -> &str {
        &self.master
    }

    /// Length of the master sequence in residues.
    pub fn master_len(&self) -> usize {
        self.master_len
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Strips `annotated` and reads off the residues at every variable region.
    ///
    /// Returns `None` when the stripped sequence does not have exactly the master's length.
    pub fn extract(&self, annotated: &str) -> Option<VariantKey> {
        self.extract_stripped(&strip_annotations(annotated))
    }

    /// Same as [`extract`](Self::extract) for a sequence that is already stripped.
    pub fn extract_stripped(&self, stripped: &str) -> Option<VariantKey> {
        let residues: Vec<char> = stripped.chars().collect();
        if residues.len() != self.master_len {
            return None;
        }
        Some(
            self.groups
                .iter()
                .map(|group| group.iter().map(|&i| residues[i]).collect::<String>())
                .collect(),
        )
    }
}
