use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Trim};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::model::{KeyRange, Table};
use crate::error::{CheckerError, Result};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Rule deciding which first-column values become keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyParser {
    /// The row needs at least two fields and the key must be ASCII digits only.
    Strict,
    /// Any non-empty first field is a key; `start~end` keys also declare a range.
    #[default]
    RangeAware,
}

#[derive(Debug, Clone, Copy)]
pub struct LoaderOptions {
    pub delimiter: u8,
    pub range_delimiter: char,
    pub parser: KeyParser,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            delimiter: b'\t',
            range_delimiter: '~',
            parser: KeyParser::RangeAware,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one table from disk.
///
/// * missing file → absent table, nothing to check
/// * zero-byte file → [`CheckerError::EmptyFile`], which ends the run
/// * otherwise the file is parsed by [`parse_table`]
pub fn load_table(path: &Path, options: &LoaderOptions) -> Result<Table> {
    let name = display_name(path);

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{name}: not found, skipping");
            return Ok(Table::absent(name));
        }
        Err(source) => {
            return Err(CheckerError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if metadata.len() == 0 {
        return Err(CheckerError::EmptyFile(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| CheckerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_table(name, file, options).map_err(|source| CheckerError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    if table.is_empty() {
        warn!("{}: no keys below the header", table.name);
    }
    debug!(
        "{}: {} keys, {} ranges",
        table.name,
        table.len(),
        table.ranges.len()
    );
    Ok(table)
}

/// Parse a delimited source into a [`Table`].
///
/// The first row is a header and is discarded. Blank lines and `#` comment
/// lines are ignored and `"` quotes are honoured. The range-aware parser trims
/// fields, the strict one does not. Rows that yield no key are skipped silently.
pub fn parse_table<R: Read>(name: impl Into<String>, source: R, options: &LoaderOptions) -> csv::Result<Table> {
    let name = name.into();
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(match options.parser {
            KeyParser::Strict => Trim::None,
            KeyParser::RangeAware => Trim::All,
        })
        .from_reader(source);

    let mut keys = Vec::new();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        if let Some(key) = extract_key(&record, options) {
            keys.push(key);
        }
    }

    // Range-form keys that do not parse stay keys but declare nothing.
    let unparsed = keys
        .iter()
        .filter(|k| k.contains(options.range_delimiter))
        .filter(|k| KeyRange::parse(k, options.range_delimiter).is_none())
        .count();
    if unparsed > 0 {
        warn!("{name}: {unparsed} range keys could not be parsed as integers");
    }

    Ok(Table::from_keys(name, keys, options.range_delimiter))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Only the key column has to be text; other columns may carry any encoding.
fn extract_key(record: &ByteRecord, options: &LoaderOptions) -> Option<String> {
    let field = record.get(0)?;
    if field.is_empty() {
        return None;
    }

    match options.parser {
        KeyParser::Strict => {
            if record.len() < 2 || !field.iter().all(u8::is_ascii_digit) {
                return None;
            }
        }
        KeyParser::RangeAware => {}
    }

    Some(String::from_utf8_lossy(field).into_owned())
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn parse(text: &str, parser: KeyParser) -> Table {
        let options = LoaderOptions {
            parser,
            ..Default::default()
        };
        parse_table("t.txt", text.as_bytes(), &options).expect("table should parse")
    }

    #[test]
    fn skips_header_and_sorts_keys() {
        let table = parse("Vnum\tName\n30\tSword\n101\tBow\n27001\tPotion\n", KeyParser::RangeAware);
        assert_eq!(table.keys, vec!["101", "27001", "30"]);
        assert!(table.present);
    }

    #[test]
    fn strict_parser_keeps_only_digit_keys_with_columns() {
        let text = "Vnum\tName\n10\tA\nabc\tB\n20\n110000~110099\tC\n+40\tE\n";
        let table = parse(text, KeyParser::Strict);
        assert_eq!(table.keys, vec!["10"]);
        assert!(table.ranges.is_empty());
    }

    #[test]
    fn only_the_range_aware_parser_trims_keys() {
        let text = "Vnum\tName\n 30 \tD\n31\tE\n";
        assert_eq!(parse(text, KeyParser::Strict).keys, vec!["31"]);
        assert_eq!(parse(text, KeyParser::RangeAware).keys, vec!["30", "31"]);
    }

    #[test]
    fn range_aware_parser_records_ranges() {
        let text = "Vnum\tName\n110000~110099\tSet\n27001\tPotion\nabc\tOdd\n5~x\tBroken\n";
        let table = parse(text, KeyParser::RangeAware);
        assert_eq!(table.keys, vec!["110000~110099", "27001", "5~x", "abc"]);
        assert_eq!(table.ranges.len(), 1);
        assert!(table.ranges.contains(&KeyRange::new(110_000, 110_099)));
    }

    #[test]
    fn ignores_blank_and_comment_lines() {
        let text = "# exported table\nVnum\tName\n\n10\tA\n# 11\tB\n\t\n12\tC\n";
        let table = parse(text, KeyParser::RangeAware);
        assert_eq!(table.keys, vec!["10", "12"]);
    }

    #[test]
    fn header_only_source_is_present_but_empty() {
        let table = parse("Vnum\tName\n", KeyParser::RangeAware);
        assert!(table.present);
        assert!(table.is_empty());
    }

    #[test]
    fn non_utf8_columns_do_not_fail_the_load() {
        let mut bytes = b"Vnum\tName\n10\t".to_vec();
        bytes.extend_from_slice(&[0xB0, 0xA1, b'\n']);
        let table = parse_table("t.txt", bytes.as_slice(), &LoaderOptions::default())
            .expect("table should parse");
        assert_eq!(table.keys, vec!["10"]);
    }

    #[test]
    fn missing_file_is_absent() {
        let dir = TempDir::new().expect("tempdir");
        let table = load_table(&dir.path().join("item_proto.txt"), &LoaderOptions::default())
            .expect("absent file is not an error");
        assert!(!table.present);
        assert_eq!(table.name, "item_proto.txt");
        assert!(table.keys.is_empty());
        assert!(table.ranges.is_empty());
    }

    #[test]
    fn zero_byte_file_is_fatal() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("mob_names.txt");
        File::create(&path).expect("create file");

        let err = load_table(&path, &LoaderOptions::default()).expect_err("empty file must fail");
        assert!(matches!(err, CheckerError::EmptyFile(ref p) if p == &path));
        assert!(err.to_string().ends_with("mob_names.txt is empty."));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("mob_proto.txt");
        let mut file = File::create(&path).expect("create file");
        writeln!(file, "Vnum\tName\n101\tWolf\n102\tBear").expect("write file");

        let table = load_table(&path, &LoaderOptions::default()).expect("table should load");
        assert_eq!(table.name, "mob_proto.txt");
        assert_eq!(table.keys, vec!["101", "102"]);
    }
}
