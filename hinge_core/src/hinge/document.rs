//! # Model Text Document
//!
//! In-memory model of the analysis program's table-oriented text file.
//!
//! The file is a preamble followed by table sections, each introduced by a
//! `TABLE:  "<NAME>"` header line. Every line keeps its own terminator so an
//! unmodified document serializes back byte for byte, whatever mix of
//! `\n` and `\r\n` it was read with.
//!
//! Hinge upserts work on the section model: remove every record line tagged
//! with the hinge name, then insert the new lines directly after each table
//! header. Nothing touches the disk here; see [`super::patcher`].

use super::record::{HingeRecord, HingeTable};

/// Line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    text: String,
    /// `None` only for a final line without terminator, or a line added after it
    ending: Option<LineEnding>,
}

impl Line {
    fn new(text: impl Into<String>) -> Self {
        Line {
            text: text.into(),
            ending: None,
        }
    }
}

/// One table: its header line and everything up to the next header
#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    header: Line,
    body: Vec<Line>,
}

impl Table {
    fn is(&self, header: &str) -> bool {
        self.header.text.trim() == header
    }
}

/// Result of one upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertReport {
    /// Lines removed because they carried the hinge name
    pub removed: usize,
    /// Lines inserted
    pub inserted: usize,
    /// Tables appended because the file lacked them
    pub tables_created: usize,
}

/// A parsed model text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDocument {
    preamble: Vec<Line>,
    tables: Vec<Table>,
    /// Terminator given to inserted lines
    newline: LineEnding,
    trailing_newline: bool,
}

impl ModelDocument {
    /// Parse file text
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut rest = text;
        while let Some(pos) = rest.find('\n') {
            let raw = &rest[..pos];
            let line = match raw.strip_suffix('\r') {
                Some(stripped) => Line {
                    text: stripped.to_string(),
                    ending: Some(LineEnding::CrLf),
                },
                None => Line {
                    text: raw.to_string(),
                    ending: Some(LineEnding::Lf),
                },
            };
            lines.push(line);
            rest = &rest[pos + 1..];
        }
        if !rest.is_empty() {
            lines.push(Line::new(rest));
        }

        let newline = lines
            .iter()
            .find_map(|line| line.ending)
            .unwrap_or(LineEnding::Lf);
        // An empty file gets a conventional trailing newline once written to
        let trailing_newline = text.is_empty() || text.ends_with('\n');

        let mut preamble = Vec::new();
        let mut tables: Vec<Table> = Vec::new();
        for line in lines {
            if line.text.trim_start().starts_with("TABLE:") {
                tables.push(Table {
                    header: line,
                    body: Vec::new(),
                });
            } else if let Some(table) = tables.last_mut() {
                table.body.push(line);
            } else {
                preamble.push(line);
            }
        }

        ModelDocument {
            preamble,
            tables,
            newline,
            trailing_newline,
        }
    }

    /// Serialize back to file text
    pub fn serialize(&self) -> String {
        let lines: Vec<&Line> = self.lines().collect();
        let mut out = String::with_capacity(lines.iter().map(|l| l.text.len() + 2).sum());
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            out.push_str(&line.text);
            let ending = if i == last && !self.trailing_newline {
                None
            } else {
                Some(line.ending.unwrap_or(self.newline))
            };
            if let Some(ending) = ending {
                out.push_str(ending.as_str());
            }
        }
        out
    }

    fn lines(&self) -> impl Iterator<Item = &Line> {
        self.preamble
            .iter()
            .chain(self.tables.iter().flat_map(|t| std::iter::once(&t.header).chain(t.body.iter())))
    }

    /// Terminator used for inserted lines
    pub fn line_ending(&self) -> LineEnding {
        self.newline
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Whether a table with this exact header (ignoring surrounding spaces) exists
    pub fn has_table(&self, header: &str) -> bool {
        self.tables.iter().any(|t| t.is(header))
    }

    /// Body lines of the first table with `header`, without terminators
    pub fn table_lines(&self, header: &str) -> Option<Vec<&str>> {
        self.tables
            .iter()
            .find(|t| t.is(header))
            .map(|t| t.body.iter().map(|l| l.text.as_str()).collect())
    }

    /// Count table lines carrying `HingeName=<hinge_name>`
    pub fn count_hinge_lines(&self, hinge_name: &str) -> usize {
        self.tables
            .iter()
            .flat_map(|t| t.body.iter())
            .filter(|l| names_hinge(&l.text, hinge_name))
            .count()
    }

    /// Remove every table line carrying `HingeName=<hinge_name>`
    pub fn remove_hinge(&mut self, hinge_name: &str) -> usize {
        let mut removed = 0;
        for table in &mut self.tables {
            let before = table.body.len();
            table.body.retain(|l| !names_hinge(&l.text, hinge_name));
            removed += before - table.body.len();
        }
        removed
    }

    /// Index of the table with `header`, appending it at the end of the file
    /// (after a blank line) when missing
    fn ensure_table(&mut self, header: &str) -> (usize, bool) {
        if let Some(index) = self.tables.iter().position(|t| t.is(header)) {
            return (index, false);
        }
        let tail = match self.tables.last_mut() {
            Some(table) => &mut table.body,
            None => &mut self.preamble,
        };
        tail.push(Line::new(""));
        self.tables.push(Table {
            header: Line::new(header),
            body: Vec::new(),
        });
        (self.tables.len() - 1, true)
    }

    /// Replace all lines for `hinge_name` with `record`
    pub fn upsert_hinge(&mut self, hinge_name: &str, record: &HingeRecord) -> UpsertReport {
        let mut report = UpsertReport {
            removed: self.remove_hinge(hinge_name),
            ..Default::default()
        };

        for table in HingeTable::ALL {
            let (index, created) = self.ensure_table(table.header());
            if created {
                report.tables_created += 1;
            }
            let lines = record.lines_for(table, hinge_name);
            report.inserted += lines.len();
            let ending = Some(self.newline);
            let body = &mut self.tables[index].body;
            body.splice(0..0, lines.into_iter().map(|text| Line { text, ending }));
        }

        report
    }
}

/// Split a record line into `Key=Value` tokens, keeping quoted text together
fn tokens(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = None;
    let mut quoted = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => {
                quoted = !quoted;
                start.get_or_insert(i);
            }
            c if c.is_whitespace() && !quoted => {
                if let Some(s) = start.take() {
                    out.push(&line[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        out.push(&line[s..]);
    }
    out
}

/// True if a token of `line` is exactly `HingeName=<hinge_name>` (quotes ignored)
pub fn names_hinge(line: &str, hinge_name: &str) -> bool {
    tokens(line).into_iter().any(|token| {
        token
            .strip_prefix("HingeName=")
            .map(|value| value.trim_matches('"') == hinge_name)
            .unwrap_or(false)
    })
}
