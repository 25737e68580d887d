//! Reference tables: flat arrays shipped once per message and referenced
//! elsewhere by integer index.
//!
//! Indices are only meaningful inside the message that carries the table.
//! Decoding validates every index up front so that a message is either
//! fully resolvable or rejected, never half bound.

use crate::cursor::Cursor;
use crate::error::{Problem, Result};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Bind one index into `table`.
pub fn lookup<'t, T>(
    table: &'t [T],
    index: i64,
    table_name: &'static str,
    cx: &Cursor<'_>,
) -> Result<&'t T> {
    let at = position(table.len(), index, table_name, cx)?;
    Ok(&table[at])
}

/// `index` as a position in a table of `len` entries.
pub fn position(
    len: usize,
    index: i64,
    table_name: &'static str,
    cx: &Cursor<'_>,
) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&position| position < len)
        .ok_or_else(|| {
            cx.malformed(Problem::IndexOutOfRange {
                table: table_name,
                index,
                len,
            })
        })
}

/// Check that every index is within `[0, len)`.
pub fn check_indices(
    len: usize,
    indices: &[i64],
    table_name: &'static str,
    cx: &Cursor<'_>,
) -> Result<()> {
    for (i, &index) in indices.iter().enumerate() {
        let in_range = usize::try_from(index).is_ok_and(|index| index < len);
        if !in_range {
            return Err(cx.index(i).malformed(Problem::IndexOutOfRange {
                table: table_name,
                index,
                len,
            }));
        }
    }
    Ok(())
}

/// Check that two parallel arrays have the same length.
pub fn check_parallel(
    left: (&'static str, usize),
    right: (&'static str, usize),
    cx: &Cursor<'_>,
) -> Result<()> {
    if left.1 == right.1 {
        Ok(())
    } else {
        Err(cx.malformed(Problem::LengthMismatch {
            left: left.0,
            left_len: left.1,
            right: right.0,
            right_len: right.1,
        }))
    }
}

/// Check the interned string table invariant: no string appears twice.
pub fn check_unique_strings(strings: &[String], cx: &Cursor<'_>) -> Result<()> {
    let mut seen = HashSet::with_capacity(strings.len());
    for (i, s) in strings.iter().enumerate() {
        if !seen.insert(s.as_str()) {
            return Err(cx
                .index(i)
                .malformed(Problem::DuplicateString(s.clone())));
        }
    }
    Ok(())
}

/// Rebuilds a flat table from live values.
///
/// Entries keep first-occurrence order, which is the canonical order used
/// by every encoder in this workspace.
#[derive(Debug, Clone)]
pub struct Interner<T> {
    entries: Vec<T>,
    positions: HashMap<T, usize>,
}

impl<T> Default for Interner<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> Interner<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, appending it on first sight.
    pub fn intern(&mut self, value: &T) -> i64 {
        let next = self.entries.len();
        let position = *self.positions.entry(value.clone()).or_insert_with(|| {
            self.entries.push(value.clone());
            next
        });
        as_wire_index(position)
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }
}

#[allow(clippy::cast_possible_wrap)]
fn as_wire_index(position: usize) -> i64 {
    // Tables are bounded by message size; positions always fit.
    position as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeConfig;
    use proptest::prelude::*;

    #[test]
    fn test_lookup_in_range() {
        let config = DecodeConfig::default();
        let cx = Cursor::root("Test", &config);
        let files = vec!["a".to_string(), "b".to_string()];
        assert_eq!(lookup(&files, 1, "files", &cx).unwrap(), "b");
    }

    #[test]
    fn test_lookup_negative_and_past_end() {
        let config = DecodeConfig::default();
        let cx = Cursor::root("Test", &config);
        let files = vec!["a".to_string()];
        for index in [-1, 1, i64::MAX] {
            let err = lookup(&files, index, "files", &cx).unwrap_err();
            assert_eq!(
                err.problem(),
                Some(&Problem::IndexOutOfRange {
                    table: "files",
                    index,
                    len: 1
                })
            );
        }
    }

    #[test]
    fn test_check_indices_reports_position() {
        let config = DecodeConfig::default();
        let root = Cursor::root("NavigationRegion", &config);
        let cx = root.field("targets");
        let err = check_indices(2, &[0, 1, 2], "targets", &cx).unwrap_err();
        assert_eq!(err.path(), Some("$.targets[2]"));
    }

    #[test]
    fn test_check_parallel() {
        let config = DecodeConfig::default();
        let cx = Cursor::root("ImportedElementSet", &config);
        assert!(check_parallel(("uris", 2), ("names", 2), &cx).is_ok());
        assert!(check_parallel(("uris", 2), ("names", 1), &cx).is_err());
    }

    #[test]
    fn test_duplicate_string_rejected() {
        let config = DecodeConfig::default();
        let cx = Cursor::root("ImportedElementSet", &config);
        let strings = vec!["x".to_string(), "y".to_string(), "x".to_string()];
        let err = check_unique_strings(&strings, &cx).unwrap_err();
        assert_eq!(err.problem(), Some(&Problem::DuplicateString("x".into())));
        assert_eq!(err.path(), Some("$[2]"));
    }

    #[test]
    fn test_interner_first_occurrence_order() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern(&"b"), 0);
        assert_eq!(interner.intern(&"a"), 1);
        assert_eq!(interner.intern(&"b"), 0);
        assert_eq!(interner.into_entries(), vec!["b", "a"]);
    }

    proptest! {
        #[test]
        fn prop_check_indices_matches_bounds(len in 0usize..16, indices in prop::collection::vec(-4i64..20, 0..12)) {
            let config = DecodeConfig::default();
            let cx = Cursor::root("Test", &config);
            let all_valid = indices.iter().all(|&i| i >= 0 && (i as usize) < len);
            prop_assert_eq!(check_indices(len, &indices, "t", &cx).is_ok(), all_valid);
        }

        #[test]
        fn prop_interned_indices_resolve_back(values in prop::collection::vec("[a-c]{1,2}", 0..24)) {
            let config = DecodeConfig::default();
            let cx = Cursor::root("Test", &config);
            let mut interner = Interner::new();
            let indices: Vec<i64> = values.iter().map(|v| interner.intern(v)).collect();
            let table = interner.into_entries();
            for (&index, value) in indices.iter().zip(&values) {
                prop_assert_eq!(lookup(&table, index, "strings", &cx).unwrap(), value);
            }
            prop_assert!(check_unique_strings(&table, &cx).is_ok());
        }
    }
}
