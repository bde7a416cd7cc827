use std::collections::BTreeSet;

use super::model::{Direction, PairKind, RangeWindow, Table};

/// How keys of the examined table are rewritten before lookup.
#[derive(Debug, Clone, Copy)]
pub enum Comparison<'a> {
    /// Look each key up as-is (set difference).
    Plain,
    /// Proto → names. Numeric keys inside the window become `key~key+span`,
    /// non-numeric keys are skipped.
    ExpandIntoRanges {
        window: &'a RangeWindow,
        delimiter: char,
    },
    /// Names → proto. `start~end` keys are reduced to `start`.
    CollapseRanges { delimiter: char },
}

impl<'a> Comparison<'a> {
    /// The comparison used for one direction of a pair.
    pub fn for_pair(kind: PairKind, direction: Direction, window: &'a RangeWindow, delimiter: char) -> Self {
        match (kind, direction) {
            (PairKind::Plain, _) => Comparison::Plain,
            (PairKind::Ranged, Direction::ProtoToNames) => Comparison::ExpandIntoRanges { window, delimiter },
            (PairKind::Ranged, Direction::NamesToProto) => Comparison::CollapseRanges { delimiter },
        }
    }

    /// The string to search for, or `None` if the key is never reported.
    fn lookup_key(&self, key: &str) -> Option<String> {
        match *self {
            Comparison::Plain => Some(key.to_string()),
            Comparison::ExpandIntoRanges { window, delimiter } => {
                if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                match key.parse::<u32>() {
                    Ok(value) if window.contains(value) => Some(window.expand(value, delimiter)),
                    _ => Some(key.to_string()),
                }
            }
            Comparison::CollapseRanges { delimiter } => match key.split_once(delimiter) {
                Some((start, _)) => Some(start.to_string()),
                None => Some(key.to_string()),
            },
        }
    }
}

/// Keys of `examine` that are absent from `search`, in the form they were
/// looked up.
///
/// Membership is raw string containment in `search.keys`, not numeric
/// interval overlap: `110050` is not found in a table that only holds
/// `110000~110099`. Returns `None` if either table is absent.
pub fn missing_keys(examine: &Table, search: &Table, comparison: Comparison<'_>) -> Option<Vec<String>> {
    if !examine.present || !search.present {
        return None;
    }

    let missing: BTreeSet<String> = examine
        .keys
        .iter()
        .filter_map(|key| comparison.lookup_key(key))
        .filter(|candidate| !search.contains(candidate))
        .collect();

    Some(missing.into_iter().collect())
}
