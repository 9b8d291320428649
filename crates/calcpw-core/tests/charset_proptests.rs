#![allow(clippy::unwrap_used)]

//! Property-based tests for charset parsing and canonicalization.

use calcpw_core::charset::Charset;
use proptest::prelude::*;

/// Printable ASCII excluding space and `-`, so rendered group strings are
/// unambiguous.
fn plain_char() -> impl Strategy<Value = u8> {
    (0x21u8..=0x7E).prop_filter("no range operator", |b| *b != b'-')
}

/// A list of non-empty groups of plain characters.
fn group_list() -> impl Strategy<Value = Vec<Vec<u8>>> {
    proptest::collection::vec(proptest::collection::vec(plain_char(), 1..8), 1..5)
}

/// Render groups as a charset configuration string.
fn render(groups: &[Vec<u8>]) -> String {
    groups
        .iter()
        .map(|g| String::from_utf8(g.clone()).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

proptest! {
    /// Parsing arbitrary input never panics; it either produces a charset
    /// or reports a malformed one.
    #[test]
    fn parse_never_panics(input in ".{0,64}") {
        let _ = Charset::parse(&input);
    }

    /// Every parsed group is non-empty and strictly increasing, and the
    /// groups themselves are in canonical (lexicographic) order.
    #[test]
    fn parsed_charset_is_canonical(groups in group_list()) {
        let charset = Charset::parse(&render(&groups)).unwrap();

        for group in charset.groups() {
            prop_assert!(!group.is_empty());
            prop_assert!(group.chars().windows(2).all(|w| w[0] < w[1]));
        }
        prop_assert!(charset
            .groups()
            .windows(2)
            .all(|w| w[0].chars() <= w[1].chars()));
    }

    /// Group order in the configuration string is irrelevant.
    #[test]
    fn group_order_is_irrelevant(groups in group_list()) {
        let forward = Charset::parse(&render(&groups)).unwrap();

        let mut reversed_groups = groups;
        reversed_groups.reverse();
        let reversed = Charset::parse(&render(&reversed_groups)).unwrap();

        prop_assert_eq!(forward, reversed);
    }

    /// Range direction is irrelevant: `a-b` and `b-a` describe the same
    /// group.
    #[test]
    fn range_direction_is_irrelevant(a in plain_char(), b in plain_char()) {
        let forward = Charset::parse(&format!("{}-{}", a as char, b as char)).unwrap();
        let backward = Charset::parse(&format!("{}-{}", b as char, a as char)).unwrap();
        prop_assert_eq!(forward, backward);
    }

    /// Flattening yields a sorted, deduplicated union of all groups.
    #[test]
    fn flatten_is_sorted_union(groups in group_list()) {
        let charset = Charset::parse(&render(&groups)).unwrap();
        let flat = charset.flatten();

        prop_assert!(flat.windows(2).all(|w| w[0] < w[1]));
        let union: std::collections::BTreeSet<u8> =
            groups.iter().flatten().copied().collect();
        prop_assert_eq!(flat, union.into_iter().collect::<Vec<u8>>());
    }
}
