//! Layered configuration.
//!
//! Sources, highest priority first:
//! 1. Command-line overrides (`--root`, `--log-file`)
//! 2. The TOML file given with `--config`
//! 3. Built-in defaults
//!
//! ```toml
//! root = "resource"
//! log_file = "syslog.txt"
//! key_parser = "range_aware"
//!
//! [range_window]
//! start = 110000
//! end = 165400
//! span = 99
//!
//! [[pairs]]
//! label = "item"
//! kind = "ranged"
//! proto = "item_proto.txt"
//! names = "item_names.txt"
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::data::loader::{KeyParser, LoaderOptions};
use crate::data::model::{PairKind, RangeWindow};
use crate::error::ConfigError;

fn default_root() -> PathBuf {
    PathBuf::from("resource")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("syslog.txt")
}

const fn default_delimiter() -> char {
    '\t'
}

const fn default_range_delimiter() -> char {
    '~'
}

/// One proto/names pair, by file name relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PairConfig {
    pub label: String,
    pub kind: PairKind,
    pub proto: String,
    pub names: String,
}

fn default_pairs() -> Vec<PairConfig> {
    vec![
        PairConfig {
            label: "item".into(),
            kind: PairKind::Ranged,
            proto: "item_proto.txt".into(),
            names: "item_names.txt".into(),
        },
        PairConfig {
            label: "mob".into(),
            kind: PairKind::Plain,
            proto: "mob_proto.txt".into(),
            names: "mob_names.txt".into(),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CheckerConfig {
    /// Directory holding the tables.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Plain-text run log, overwritten on every run.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_range_delimiter")]
    pub range_delimiter: char,

    #[serde(default)]
    pub key_parser: KeyParser,

    #[serde(default)]
    pub range_window: RangeWindow,

    #[serde(default = "default_pairs")]
    pub pairs: Vec<PairConfig>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            log_file: default_log_file(),
            delimiter: default_delimiter(),
            range_delimiter: default_range_delimiter(),
            key_parser: KeyParser::default(),
            range_window: RangeWindow::default(),
            pairs: default_pairs(),
        }
    }
}

impl CheckerConfig {
    /// Defaults, merged with `file` when given, then validated.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = file.filter(|p| !p.is_file()) {
            return Err(invalid("config", &format!("{} is not a readable file", path.display())));
        }
        let config: Self = Self::figment(file).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(file: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        match file {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delimiter.is_ascii() {
            return Err(invalid("delimiter", "must be a single ASCII character"));
        }
        if self.delimiter == self.range_delimiter {
            return Err(invalid("range_delimiter", "must differ from delimiter"));
        }
        if self.range_window.start > self.range_window.end {
            return Err(invalid("range_window", "start must not exceed end"));
        }
        if self.pairs.is_empty() {
            return Err(invalid("pairs", "at least one pair is required"));
        }
        Ok(())
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            // validate() guarantees ASCII
            delimiter: self.delimiter as u8,
            range_delimiter: self.range_delimiter,
            parser: self.key_parser,
        }
    }

    pub fn table_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
