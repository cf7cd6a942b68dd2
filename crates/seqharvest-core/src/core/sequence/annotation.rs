use regex::Regex;
use std::sync::LazyLock;

/// Named tags removed from annotated sequences, applied in this order.
///
/// `[HIS_D]` must come before the generic bracket pattern below.
const NAMED_TAGS: [&str; 8] = [
    ":NtermProteinFull",
    ":CtermProteinFull",
    ":Virtual_Protein_SideChain",
    ":Virtual_Phosphate",
    ":rna_cutpoint_lower",
    ":rna_cutpoint_upper",
    ":UpperRNA",
    "[HIS_D]",
];

static THREE_CHAR_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[...\]").expect("bracket pattern is a valid regex"));

/// Reduces an annotated sequence to its bare residue letters.
///
/// Named terminus, virtual-atom, cutpoint and strand tags are removed first, then any
/// bracketed token of exactly three characters (e.g. `[RGU]`). Bracketed content of any
/// other length is left in place; the caller's length check rejects such sequences.
///
/// The ordered removal is repeated until nothing changes, so the result never contains
/// a tag that only became visible after an inner tag was removed.
pub fn strip_annotations(annotated: &str) -> String {
    let mut current = strip_once(annotated);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(annotated: &str) -> String {
    let mut stripped = annotated.to_string();
    for tag in NAMED_TAGS {
        if stripped.contains(tag) {
            stripped = stripped.replace(tag, "");
        }
    }
    THREE_CHAR_BRACKET.replace_all(&stripped, "").into_owned()
}
