use std::io::Write;

use log::{debug, info};

use crate::config::CheckerConfig;
use crate::data::compare::{missing_keys, Comparison};
use crate::data::duplicates::find_duplicates;
use crate::data::loader::{display_name, load_table};
use crate::data::model::{Direction, Pair, RangeWindow, Table};
use crate::error::{CheckerError, Result};
use crate::report::{Finding, ReportSink, Section};

// ---------------------------------------------------------------------------
// Checker
// ---------------------------------------------------------------------------

/// All configured pairs, loaded and ready to be checked.
pub struct Checker {
    pub pairs: Vec<Pair>,
    window: RangeWindow,
    range_delimiter: char,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// A table was present but empty; nothing was checked.
    Aborted,
}

impl Checker {
    /// Load every table, pair by pair (proto first), before any analysis.
    pub fn load(config: &CheckerConfig) -> Result<Self> {
        let options = config.loader_options();
        let pairs = config
            .pairs
            .iter()
            .map(|p| -> Result<Pair> {
                Ok(Pair {
                    label: p.label.clone(),
                    kind: p.kind,
                    proto: load_table(&config.table_path(&p.proto), &options)?,
                    names: load_table(&config.table_path(&p.names), &options)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!("loaded {} pairs from {}", pairs.len(), config.root.display());
        Ok(Checker {
            pairs,
            window: config.range_window,
            range_delimiter: config.range_delimiter,
        })
    }

    /// Tables in load order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.pairs.iter().flat_map(|p| [&p.proto, &p.names])
    }

    /// Duplicate section for every table, then the compare section for every
    /// pair in both directions.
    pub fn run<W: Write>(&self, sink: &mut ReportSink<W>) -> std::io::Result<()> {
        sink.append(Finding::SectionStart(Section::Duplicates))?;
        for table in self.tables() {
            report_duplicates(table, sink)?;
        }
        sink.append(Finding::SectionEnd(Section::Duplicates))?;

        sink.append(Finding::SectionStart(Section::Comparing))?;
        for pair in &self.pairs {
            debug!("comparing {} pair ({:?})", pair.label, pair.kind);
            for direction in [Direction::ProtoToNames, Direction::NamesToProto] {
                let (examine, search) = match direction {
                    Direction::ProtoToNames => (&pair.proto, &pair.names),
                    Direction::NamesToProto => (&pair.names, &pair.proto),
                };
                let comparison = Comparison::for_pair(pair.kind, direction, &self.window, self.range_delimiter);
                report_missing(examine, search, comparison, sink)?;
            }
        }
        sink.append(Finding::SectionEnd(Section::Comparing))
    }
}

/// Load and check everything described by `config`.
///
/// An empty table is reported through the sink and ends the run with
/// [`Outcome::Aborted`]. The caller flushes the sink in every case.
pub fn run_checks<W: Write>(config: &CheckerConfig, sink: &mut ReportSink<W>) -> Result<Outcome> {
    let checker = match Checker::load(config) {
        Ok(checker) => checker,
        Err(CheckerError::EmptyFile(path)) => {
            sink.append(Finding::EmptyFile {
                name: display_name(&path),
            })?;
            return Ok(Outcome::Aborted);
        }
        Err(e) => return Err(e),
    };

    checker.run(sink)?;
    Ok(Outcome::Completed)
}

// ---------------------------------------------------------------------------
// Report helpers
// ---------------------------------------------------------------------------

fn report_duplicates<W: Write>(table: &Table, sink: &mut ReportSink<W>) -> std::io::Result<()> {
    let Some(duplicates) = find_duplicates(table) else {
        return Ok(());
    };

    sink.append(Finding::Reading {
        name: table.name.clone(),
    })?;
    if duplicates.is_empty() {
        return sink.append(Finding::Ok);
    }

    let count = duplicates.len();
    for d in duplicates {
        sink.append(Finding::Duplicate {
            key: d.key,
            position: d.position,
        })?;
    }
    sink.append(Finding::Total { count })
}

fn report_missing<W: Write>(
    examine: &Table,
    search: &Table,
    comparison: Comparison<'_>,
    sink: &mut ReportSink<W>,
) -> std::io::Result<()> {
    let Some(missing) = missing_keys(examine, search, comparison) else {
        return Ok(());
    };

    sink.append(Finding::Reading {
        name: search.name.clone(),
    })?;
    if missing.is_empty() {
        return sink.append(Finding::Ok);
    }

    let count = missing.len();
    for key in missing {
        sink.append(Finding::Missing { key })?;
    }
    sink.append(Finding::Total { count })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::report::{MessageTemplates, Summary};

    fn write_table(dir: &Path, name: &str, rows: &[&str]) {
        let mut text = String::from("Vnum\tName\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        fs::write(dir.join(name), text).expect("write table");
    }

    fn config_for(dir: &TempDir) -> CheckerConfig {
        CheckerConfig {
            root: dir.path().to_path_buf(),
            log_file: dir.path().join("syslog.txt"),
            ..Default::default()
        }
    }

    fn sink() -> ReportSink<Vec<u8>> {
        ReportSink::new(Vec::new(), MessageTemplates::default())
    }

    #[test]
    fn end_to_end_item_and_mob_pairs() {
        let dir = TempDir::new().expect("tempdir");
        write_table(
            dir.path(),
            "item_proto.txt",
            &["110000\tSword+0", "27001\tPotion", "27001\tPotion", "999999\tTest"],
        );
        write_table(dir.path(), "item_names.txt", &["110000~110099\tSword", "27001\tPotion"]);
        write_table(dir.path(), "mob_proto.txt", &["101\tWolf", "102\tBear"]);
        write_table(dir.path(), "mob_names.txt", &["101\tWolf", "103\tTiger"]);

        let config = config_for(&dir);
        let mut sink = sink();
        let outcome = run_checks(&config, &mut sink).expect("run should succeed");
        assert_eq!(outcome, Outcome::Completed);

        assert_eq!(
            sink.lines(),
            [
                "###### START_CHECKING_FOR_DUPLICATE ######",
                "Reading file: item_proto.txt",
                "\tDuplicated key: 27001 at line: 3",
                "\tTotal lines: 1",
                "Reading file: item_names.txt",
                "\tOK",
                "Reading file: mob_proto.txt",
                "\tOK",
                "Reading file: mob_names.txt",
                "\tOK",
                "###### END_CHECKING_FOR_DUPLICATE ######",
                "###### START_COMPARING ######",
                "Reading file: item_names.txt",
                "\tMissing key: 999999",
                "\tTotal lines: 1",
                "Reading file: item_proto.txt",
                "\tOK",
                "Reading file: mob_names.txt",
                "\tMissing key: 102",
                "\tTotal lines: 1",
                "Reading file: mob_proto.txt",
                "\tMissing key: 103",
                "\tTotal lines: 1",
                "###### END_COMPARING ######",
            ]
        );

        let summary = sink.flush_to_log(&config.log_file).expect("flush");
        assert_eq!(
            summary,
            Summary {
                duplicates: 1,
                missing: 3
            }
        );
        let log = fs::read_to_string(&config.log_file).expect("read log");
        assert!(log.starts_with("###### START_CHECKING_FOR_DUPLICATE ######\n"));
        assert!(log.ends_with("###### END_COMPARING ######\n"));
        assert!(!log.contains('\u{1b}'));
    }

    #[test]
    fn absent_tables_are_skipped() {
        let dir = TempDir::new().expect("tempdir");
        write_table(dir.path(), "mob_proto.txt", &["101\tWolf"]);

        let mut sink = sink();
        let outcome = run_checks(&config_for(&dir), &mut sink).expect("run should succeed");
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(
            sink.lines(),
            [
                "###### START_CHECKING_FOR_DUPLICATE ######",
                "Reading file: mob_proto.txt",
                "\tOK",
                "###### END_CHECKING_FOR_DUPLICATE ######",
                "###### START_COMPARING ######",
                "###### END_COMPARING ######",
            ]
        );
    }

    #[test]
    fn empty_table_aborts_before_any_section() {
        let dir = TempDir::new().expect("tempdir");
        write_table(dir.path(), "item_proto.txt", &["1\tA"]);
        fs::write(dir.path().join("item_names.txt"), "").expect("write empty");
        write_table(dir.path(), "mob_proto.txt", &["101\tWolf"]);

        let mut sink = sink();
        let outcome = run_checks(&config_for(&dir), &mut sink).expect("empty file is not an error");
        assert_eq!(outcome, Outcome::Aborted);
        assert_eq!(sink.lines(), ["File item_names.txt is empty."]);
    }

    #[test]
    fn checker_loads_tables_in_pair_order() {
        let dir = TempDir::new().expect("tempdir");
        write_table(dir.path(), "item_proto.txt", &["1\tA"]);

        let checker = Checker::load(&config_for(&dir)).expect("load");
        let names: Vec<_> = checker.tables().map(|t| (t.name.as_str(), t.present)).collect();
        assert_eq!(
            names,
            vec![
                ("item_proto.txt", true),
                ("item_names.txt", false),
                ("mob_proto.txt", false),
                ("mob_names.txt", false),
            ]
        );
    }
}
