use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// KeyRange – a `start~end` block collapsed into one row
// ---------------------------------------------------------------------------

/// An inclusive block of identifiers declared by a single range-form key.
/// `start <= end` is assumed, not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyRange {
    pub start: u32,
    pub end: u32,
}

impl KeyRange {
    pub fn new(start: u32, end: u32) -> Self {
        KeyRange { start, end }
    }

    /// Parse `start<delim>end`. Returns `None` when the delimiter is absent or
    /// either side is not an unsigned integer.
    pub fn parse(key: &str, delimiter: char) -> Option<Self> {
        let (start, end) = key.split_once(delimiter)?;
        Some(KeyRange::new(start.trim().parse().ok()?, end.trim().parse().ok()?))
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Table – one loaded source file
// ---------------------------------------------------------------------------

/// The loaded representation of one tab-delimited source file.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Source identifier, used only for reporting.
    pub name: String,
    /// First-column keys, one per data row, sorted ascending.
    pub keys: Vec<String>,
    /// Ranges declared by range-form keys. Derived from `keys` at load time.
    pub ranges: BTreeSet<KeyRange>,
    /// Whether the source existed (and was non-empty) at load time.
    pub present: bool,
}

impl Table {
    /// A table for a source that does not exist. Takes part in no analysis.
    pub fn absent(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a present table, sorting `keys` and deriving `ranges`.
    pub fn from_keys(name: impl Into<String>, mut keys: Vec<String>, range_delimiter: char) -> Self {
        keys.sort();
        let ranges = keys
            .iter()
            .filter_map(|k| KeyRange::parse(k, range_delimiter))
            .collect();
        Table {
            name: name.into(),
            keys,
            ranges,
            present: true,
        }
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Raw string membership against the untransformed key list.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.binary_search_by(|k| k.as_str().cmp(key)).is_ok()
    }
}

// ---------------------------------------------------------------------------
// Pairs
// ---------------------------------------------------------------------------

/// How the two tables of a pair are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    /// Plain set difference in both directions.
    Plain,
    /// Proto keys inside the rangeable window are expanded to `key~key+span`,
    /// names range keys are collapsed to their start value.
    Ranged,
}

/// Which side of a pair is being examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ProtoToNames,
    NamesToProto,
}

/// The rangeable window: a single proto key inside `[start, end]` is read as
/// the base of the implied block `key~key+span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeWindow {
    pub start: u32,
    pub end: u32,
    pub span: u32,
}

impl Default for RangeWindow {
    fn default() -> Self {
        RangeWindow {
            start: 110_000,
            end: 165_400,
            span: 99,
        }
    }
}

impl RangeWindow {
    /// Inclusive on both ends.
    pub fn contains(&self, value: u32) -> bool {
        (self.start..=self.end).contains(&value)
    }

    /// Canonical range string for a base key, e.g. `110000~110099`.
    pub fn expand(&self, base: u32, delimiter: char) -> String {
        format!("{base}{delimiter}{}", base.saturating_add(self.span))
    }
}

/// Two loaded tables checked against each other in both directions.
#[derive(Debug, Clone)]
pub struct Pair {
    pub label: String,
    pub kind: PairKind,
    pub proto: Table,
    pub names: Table,
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// A key that repeats within one table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duplicate {
    pub key: String,
    /// 1-based position of the last copy in the sorted key sequence.
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_keys() {
        assert_eq!(KeyRange::parse("110000~110099", '~'), Some(KeyRange::new(110_000, 110_099)));
        assert_eq!(KeyRange::parse("110000", '~'), None);
        assert_eq!(KeyRange::parse("abc~12", '~'), None);
        assert_eq!(KeyRange::new(5, 9).to_string(), "5~9");
    }

    #[test]
    fn from_keys_sorts_and_derives_ranges() {
        let table = Table::from_keys(
            "item_names.txt",
            vec!["27001".into(), "110000~110099".into(), "11".into()],
            '~',
        );
        assert!(table.present);
        assert_eq!(table.keys, vec!["11", "110000~110099", "27001"]);
        assert_eq!(table.ranges.len(), 1);
        assert!(table.ranges.contains(&KeyRange::new(110_000, 110_099)));
        assert!(table.contains("11"));
        assert!(!table.contains("110000"));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = RangeWindow::default();
        assert!(window.contains(110_000));
        assert!(window.contains(165_400));
        assert!(!window.contains(109_999));
        assert!(!window.contains(165_401));
        assert_eq!(window.expand(110_000, '~'), "110000~110099");
    }
}
