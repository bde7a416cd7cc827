use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::info;

use crate::color::{self, Tone};

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// Transcript sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Duplicates,
    Comparing,
}

impl Section {
    pub fn marker(self) -> &'static str {
        match self {
            Section::Duplicates => "CHECKING_FOR_DUPLICATE",
            Section::Comparing => "COMPARING",
        }
    }
}

/// One structured entry of the run transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    SectionStart(Section),
    SectionEnd(Section),
    /// Status header naming the table being checked.
    Reading { name: String },
    Ok,
    Duplicate { key: String, position: usize },
    Missing { key: String },
    Total { count: usize },
    EmptyFile { name: String },
}

impl Finding {
    pub fn tone(&self) -> Tone {
        match self {
            Finding::SectionStart(_) | Finding::SectionEnd(_) => Tone::Plain,
            Finding::Reading { .. } => Tone::Muted,
            Finding::Ok => Tone::Good,
            Finding::Duplicate { .. }
            | Finding::Missing { .. }
            | Finding::Total { .. }
            | Finding::EmptyFile { .. } => Tone::Bad,
        }
    }
}

// ---------------------------------------------------------------------------
// Message templates
// ---------------------------------------------------------------------------

/// Formatting function per finding kind.
#[derive(Clone, Copy)]
pub struct MessageTemplates {
    pub section_start: fn(Section) -> String,
    pub section_end: fn(Section) -> String,
    pub reading: fn(&str) -> String,
    pub ok: fn() -> String,
    pub duplicate: fn(&str, usize) -> String,
    pub missing: fn(&str) -> String,
    pub total: fn(usize) -> String,
    pub empty_file: fn(&str) -> String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        MessageTemplates {
            section_start: |s| format!("###### START_{} ######", s.marker()),
            section_end: |s| format!("###### END_{} ######", s.marker()),
            reading: |name| format!("Reading file: {name}"),
            ok: || "\tOK".to_string(),
            duplicate: |key, position| format!("\tDuplicated key: {key} at line: {position}"),
            missing: |key| format!("\tMissing key: {key}"),
            total: |count| format!("\tTotal lines: {count}"),
            empty_file: |name| format!("File {name} is empty."),
        }
    }
}

impl MessageTemplates {
    /// Plain-text rendering of a finding.
    pub fn render(&self, finding: &Finding) -> String {
        match finding {
            Finding::SectionStart(s) => (self.section_start)(*s),
            Finding::SectionEnd(s) => (self.section_end)(*s),
            Finding::Reading { name } => (self.reading)(name),
            Finding::Ok => (self.ok)(),
            Finding::Duplicate { key, position } => (self.duplicate)(key, *position),
            Finding::Missing { key } => (self.missing)(key),
            Finding::Total { count } => (self.total)(*count),
            Finding::EmptyFile { name } => (self.empty_file)(name),
        }
    }
}

// ---------------------------------------------------------------------------
// Report sink
// ---------------------------------------------------------------------------

/// Counts of problems seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub duplicates: usize,
    pub missing: usize,
}

impl Summary {
    pub fn has_findings(&self) -> bool {
        self.duplicates > 0 || self.missing > 0
    }
}

/// Append-only transcript: every finding goes to the console right away and
/// is kept as plain text for the log artifact.
pub struct ReportSink<W: Write> {
    console: W,
    templates: MessageTemplates,
    lines: Vec<String>,
    summary: Summary,
}

impl<W: Write> ReportSink<W> {
    pub fn new(console: W, templates: MessageTemplates) -> Self {
        ReportSink {
            console,
            templates,
            lines: Vec::new(),
            summary: Summary::default(),
        }
    }

    pub fn append(&mut self, finding: Finding) -> io::Result<()> {
        let plain = self.templates.render(&finding);
        writeln!(self.console, "{}", color::paint(&plain, finding.tone()))?;

        match finding {
            Finding::Duplicate { .. } => self.summary.duplicates += 1,
            Finding::Missing { .. } => self.summary.missing += 1,
            _ => {}
        }
        self.lines.push(plain);
        Ok(())
    }

    /// Plain-text lines appended so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Write every line to `path`, replacing its previous content. Consumes
    /// the sink, so a run flushes at most once.
    pub fn flush_to_log(mut self, path: &Path) -> io::Result<Summary> {
        self.console.flush()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(path, text)?;

        info!("wrote {} lines to {}", self.lines.len(), path.display());
        Ok(self.summary)
    }
}
