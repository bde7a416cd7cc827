use std::collections::BTreeMap;

use super::model::{Duplicate, Table};

/// Find keys that occur more than once in `table`.
///
/// Each duplicated key is reported once, at the 1-based position of its
/// *last* occurrence. Returns `None` for an absent table.
pub fn find_duplicates(table: &Table) -> Option<Vec<Duplicate>> {
    if !table.present {
        return None;
    }

    // key → (occurrences, index of last occurrence)
    let mut seen: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for (i, key) in table.keys.iter().enumerate() {
        let entry = seen.entry(key.as_str()).or_insert((0, i));
        entry.0 += 1;
        entry.1 = i;
    }

    Some(
        seen.into_iter()
            .filter(|(_, (count, _))| *count > 1)
            .map(|(key, (_, last))| Duplicate {
                key: key.to_string(),
                position: last + 1,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn table(keys: &[&str]) -> Table {
        Table::from_keys("t.txt", keys.iter().map(|k| k.to_string()).collect(), '~')
    }

    #[test]
    fn absent_table_is_a_no_op() {
        assert_eq!(find_duplicates(&Table::absent("t.txt")), None);
    }

    #[test]
    fn unique_keys_report_nothing() {
        let found = find_duplicates(&table(&["1", "2", "3"])).expect("present table");
        assert!(found.is_empty());
    }

    #[test]
    fn reports_last_occurrence_once_per_key() {
        let found = find_duplicates(&table(&["5", "5", "5", "7"])).expect("present table");
        assert_eq!(
            found,
            vec![Duplicate {
                key: "5".into(),
                position: 3
            }]
        );
    }

    #[test]
    fn positions_follow_sorted_order() {
        let found = find_duplicates(&table(&["30", "101", "30", "101", "2"])).expect("present table");
        // sorted: 101 101 2 30 30
        assert_eq!(
            found,
            vec![
                Duplicate {
                    key: "101".into(),
                    position: 2
                },
                Duplicate {
                    key: "30".into(),
                    position: 5
                },
            ]
        );
    }
}
