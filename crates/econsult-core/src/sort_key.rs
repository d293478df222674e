//! Sort key normalisation for consultation provision labels.
//!
//! Provision labels come from free-text columns, e.g.
//! `"Section 4.2 - Data Collection"`, `"s.10"` or `"Article 3.5.1"`. Plain
//! string ordering puts `"Section 10.1"` before `"Section 2.3"`, so labels are
//! converted into lexicographically-sortable keys that recover document order.
//!
//! # Label conventions
//!
//! - Optional leading designator: `Section`, `Sec.`, `s.`, `Article`, `Art.`,
//!   `Clause`, `Part`, `Paragraph` (case-insensitive)
//! - Dotted number: `4`, `4.2`, `3.5.1`
//! - Optional heading after the number, ignored for ordering

/// Number of dotted levels kept in a key.
const LEVELS: usize = 3;

/// Key for labels that carry no section number; sorts after every numbered one.
pub const UNNUMBERED: &str = "999.999.999";

const DESIGNATORS: &[&str] = &[
    "section",
    "sec.",
    "s.",
    "article",
    "art.",
    "clause",
    "part",
    "paragraph",
];

/// Normalise a provision label into a lexicographically-sortable string.
///
/// Input: `"Section 4.2 - Data Collection"`, `"s.10"`, `"3.5.1"`
/// Output: `"004.002.000"`, `"010.000.000"`, `"003.005.001"`
///
/// # Algorithm
///
/// 1. Trim and drop a leading designator word
/// 2. Take the leading run of ASCII digits and dots
/// 3. Split on `.`, zero-pad each level to 3 digits, keep at most 3 levels
/// 4. Pad to exactly 3 levels with `"000"`
///
/// Labels with no leading number map to [`UNNUMBERED`].
pub fn normalize_provision(label: &str) -> String {
    let rest = strip_designator(label.trim());

    let number_end = rest
        .bytes()
        .position(|b| !(b.is_ascii_digit() || b == b'.'))
        .unwrap_or(rest.len());
    let number = &rest[..number_end];

    let mut levels: Vec<u32> = number
        .split('.')
        .filter(|part| !part.is_empty())
        .take(LEVELS)
        .map(|part| part.parse().unwrap_or(0))
        .collect();

    if levels.is_empty() {
        return UNNUMBERED.to_string();
    }

    while levels.len() < LEVELS {
        levels.push(0);
    }

    format!("{:03}.{:03}.{:03}", levels[0], levels[1], levels[2])
}

fn strip_designator(s: &str) -> &str {
    let lower = s.to_ascii_lowercase();
    for designator in DESIGNATORS {
        if lower.starts_with(designator) {
            return s[designator.len()..].trim_start();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: assert a list of inputs produces sort keys in strictly ascending order.
    fn assert_sorted_order(inputs: &[&str]) {
        let keys: Vec<String> = inputs.iter().map(|s| normalize_provision(s)).collect();
        for i in 1..keys.len() {
            assert!(
                keys[i - 1] < keys[i],
                "Expected {:?} ({}) < {:?} ({})",
                inputs[i - 1],
                keys[i - 1],
                inputs[i],
                keys[i],
            );
        }
    }

    #[test]
    fn numeric_order_not_string_order() {
        assert_sorted_order(&["Section 2.3", "Section 9.3", "Section 10.1", "Section 10.12"]);
    }

    #[test]
    fn sub_levels() {
        assert_sorted_order(&["3", "3.1", "3.1.1", "3.2", "4"]);
    }

    #[test]
    fn consultation_labels() {
        assert_sorted_order(&[
            "Section 1.2 - Definitions",
            "Section 2.3 - Enforcement Powers",
            "Section 3.5 - Consent Mechanisms",
            "Section 4.1 - Data Minimization",
            "Section 4.2 - Data Collection",
            "Section 9.3 - Special Categories",
        ]);
    }

    #[test]
    fn exact_values() {
        assert_eq!(normalize_provision("Section 4.2 - Data Collection"), "004.002.000");
        assert_eq!(normalize_provision("s.10"), "010.000.000");
        assert_eq!(normalize_provision("Article 3.5.1"), "003.005.001");
        assert_eq!(normalize_provision("3.5.1.7"), "003.005.001");
        assert_eq!(normalize_provision("Clause 7"), "007.000.000");
    }

    #[test]
    fn designators_are_case_insensitive() {
        assert_eq!(normalize_provision("SECTION 4.2"), normalize_provision("section 4.2"));
        assert_eq!(normalize_provision("art. 12"), "012.000.000");
    }

    #[test]
    fn unnumbered_sorts_last() {
        assert_eq!(normalize_provision(""), UNNUMBERED);
        assert_eq!(normalize_provision("General comments"), UNNUMBERED);
        assert_sorted_order(&["Section 99.1", "General comments"]);
    }

    #[test]
    fn whitespace_trimmed() {
        assert_eq!(normalize_provision("  Section 4.2  "), normalize_provision("Section 4.2"));
    }
}
