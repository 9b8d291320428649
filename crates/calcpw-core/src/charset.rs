//! Character set parsing and canonicalization.
//!
//! A character set string is a whitespace-delimited list of character
//! groups. Inside a group, `-` between two characters expands to the
//! inclusive range between them (ascending or descending by code unit).
//! The parsed structure is canonicalized — characters sorted and
//! deduplicated within groups, groups sorted by an elementwise
//! comparator — so that any two strings describing the same groups parse
//! to an identical [`Charset`]. Canonical form is what makes the derived
//! password reproducible across independent implementations.
//!
//! Parsing is byte-oriented: code units are `u8`, matching the wire-level
//! behavior of the reference algorithm.

use serde::Serialize;

use crate::error::CalcError;

/// Default character set: digits, uppercase letters, lowercase letters.
pub const DEFAULT_CHARSET: &str = "0-9 A-Z a-z";

/// The range operator inside a group.
const MINUS: u8 = 0x2D;

/// Returns `true` for the byte values that separate character groups.
const fn is_separator(byte: u8) -> bool {
    matches!(byte, 0x09 | 0x0A | 0x0D | 0x20)
}

// ---------------------------------------------------------------------------
// CharacterGroup
// ---------------------------------------------------------------------------

/// One canonical character group.
///
/// Invariant: non-empty, strictly increasing byte sequence (sorted and
/// deduplicated at construction).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CharacterGroup {
    chars: Vec<u8>,
}

impl CharacterGroup {
    /// Build a canonical group from raw collected bytes.
    ///
    /// Returns `None` if `chars` is empty — empty groups never survive
    /// parsing.
    fn from_raw(mut chars: Vec<u8>) -> Option<Self> {
        if chars.is_empty() {
            return None;
        }
        chars.sort_unstable();
        chars.dedup();
        Some(Self { chars })
    }

    /// The group's characters, sorted ascending without duplicates.
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Number of distinct characters in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always `false` — groups are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Charset
// ---------------------------------------------------------------------------

/// A canonical, reproducible character set.
///
/// Invariant: at least one group; groups are ordered by the elementwise
/// comparator (first differing code unit decides, a strict prefix sorts
/// first). Since every group is already sorted and deduplicated, that
/// comparator is exactly the lexicographic order on the byte vectors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Charset {
    groups: Vec<CharacterGroup>,
}

impl Charset {
    /// Parse a character set string into its canonical form.
    ///
    /// Whitespace runs (HT, LF, CR, SP) close the current group if it is
    /// non-empty and open a new one. A `-` acts as the range operator only
    /// when a character is pending and no range is already open; otherwise
    /// it is handled like an ordinary character. A pending character or a
    /// trailing `-` at end-of-input is appended literally.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::MalformedCharset`] if no group survives.
    pub fn parse(input: &str) -> Result<Self, CalcError> {
        let mut groups: Vec<Vec<u8>> = vec![Vec::new()];
        let mut pending: Option<u8> = None;
        let mut range = false;

        for byte in input.trim().bytes() {
            if is_separator(byte) {
                // Account for an unfinished range before closing the group.
                if let Some(first) = pending.take() {
                    push_last(&mut groups, first);
                }
                if range {
                    push_last(&mut groups, MINUS);
                    range = false;
                }

                // Separator runs act as one separator: only close the
                // group if it collected anything.
                if !last(&groups).is_empty() {
                    groups.push(Vec::new());
                }
            } else if byte == MINUS && pending.is_some() && !range {
                range = true;
            } else if range {
                // Second endpoint of a range: expand it inclusively in
                // either direction.
                let first = pending.take().unwrap_or(byte);
                if first <= byte {
                    for c in first..=byte {
                        push_last(&mut groups, c);
                    }
                } else {
                    for c in (byte..=first).rev() {
                        push_last(&mut groups, c);
                    }
                }
                range = false;
            } else {
                // Plain character: flush the previous one, keep this one
                // pending in case a range operator follows.
                if let Some(first) = pending.take() {
                    push_last(&mut groups, first);
                }
                pending = Some(byte);
            }
        }

        // Dangling state at end-of-input is taken literally.
        if let Some(first) = pending {
            push_last(&mut groups, first);
        }
        if range {
            push_last(&mut groups, MINUS);
        }
        if last(&groups).is_empty() {
            groups.pop();
        }

        let mut canonical: Vec<CharacterGroup> =
            groups.into_iter().filter_map(CharacterGroup::from_raw).collect();
        if canonical.is_empty() {
            return Err(CalcError::MalformedCharset);
        }

        // Canonical group order: lexicographic on the sorted byte vectors
        // (the derived `Ord` of `CharacterGroup`).
        canonical.sort_unstable();

        Ok(Self { groups: canonical })
    }

    /// The canonical groups, in canonical order.
    #[must_use]
    pub fn groups(&self) -> &[CharacterGroup] {
        &self.groups
    }

    /// Number of character groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Merge all groups into one sorted, deduplicated character sequence.
    ///
    /// Derived on demand; this is the alphabet the encoder indexes into.
    #[must_use]
    pub fn flatten(&self) -> Vec<u8> {
        let mut flat: Vec<u8> = self
            .groups
            .iter()
            .flat_map(|group| group.chars().iter().copied())
            .collect();
        flat.sort_unstable();
        flat.dedup();
        flat
    }
}

impl Default for Charset {
    /// The canonical form of [`DEFAULT_CHARSET`].
    fn default() -> Self {
        // The constant is well formed; parsing it cannot fail.
        Self::parse(DEFAULT_CHARSET).expect("default charset is well formed")
    }
}

/// Append a byte to the group currently being collected.
fn push_last(groups: &mut Vec<Vec<u8>>, byte: u8) {
    if let Some(group) = groups.last_mut() {
        group.push(byte);
    }
}

/// The group currently being collected.
fn last(groups: &[Vec<u8>]) -> &[u8] {
    groups.last().map_or(&[], Vec::as_slice)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
