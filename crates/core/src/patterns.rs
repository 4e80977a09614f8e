//! Identifier pattern table and first-match-wins matching.

use crate::{Entry, IdentifierKind, Result};
use regex::Regex;

/// Docket number shapes, tried as one alternation (leftmost match wins,
/// earlier alternatives win ties at the same position).
const DOCKET_PATTERN: &str = concat!(
    r"\b\d{4}-[A-Z]{2,}-\d{5}-\d{2}\b", // 2018-LOW-68327-13
    r"|\b\d{5}-\d{2}\b",                // 68327-13
    r"|\b\d{5}-\d{4}-\d{2}[A-Z]{2,4}\b", // 01330-0004-00US
    r"|\b\d{4}\.\d{3}-?[A-Z]{2,}\d*\b", // 0509.003US, 0509.003-US8
    r"|\b\d{4}-\d{4}-[A-Z]{3}\b",       // 0509-0001-PCT
);

/// `16/201,375 US` (commas are already gone after sanitizing).
const APPLICATION_PATTERN: &str = r"\b\d{2}/\d{3},?\d{3}\s+[A-Z]{2}\b";

/// Fallback application shapes: `P12345678901 EP-A1` or `201812345.6 CN`.
const ALT_APPLICATION_PATTERN: &str = concat!(
    r"\b[Pp]\d{11}\s+[A-Z]{2}-\w{1,4}\b",
    r"|\b\d{5,12}(?:[.,]\d+)?\s+[A-Z]{2,3}\b",
);

const PCT_PATTERN: &str = r"PCT/[A-Z]{2}\d{4}/\d{6}";

const WIPO_PATTERN: &str = r"\bWO\d{4}/\d{6}\b";

/// Loose numeric date token, e.g. `3/15/27` or `03-15-2027`.
const DATE_PATTERN: &str = r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b";

/// Compiled identifier and date patterns.
///
/// Built once and shared by reference with the matchers.
#[derive(Debug, Clone)]
pub struct PatternTable {
    docket: Vec<Regex>,
    application: Vec<Regex>,
    pct: Vec<Regex>,
    wipo: Vec<Regex>,
    date: Regex,
}

impl PatternTable {
    /// Compile the standard pattern set.
    pub fn compile() -> Result<Self> {
        Ok(Self {
            docket: vec![Regex::new(DOCKET_PATTERN)?],
            application: vec![
                Regex::new(APPLICATION_PATTERN)?,
                Regex::new(ALT_APPLICATION_PATTERN)?,
            ],
            pct: vec![Regex::new(PCT_PATTERN)?],
            wipo: vec![Regex::new(WIPO_PATTERN)?],
            date: Regex::new(DATE_PATTERN)?,
        })
    }

    /// Patterns for a kind, in priority order.
    pub fn patterns(&self, kind: IdentifierKind) -> &[Regex] {
        match kind {
            IdentifierKind::Docket => &self.docket,
            IdentifierKind::Application => &self.application,
            IdentifierKind::Pct => &self.pct,
            IdentifierKind::Wipo => &self.wipo,
        }
    }

    /// The date token pattern.
    pub fn date(&self) -> &Regex {
        &self.date
    }
}

/// Applies the identifier patterns to sanitized lines.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierMatcher<'a> {
    table: &'a PatternTable,
}

impl<'a> IdentifierMatcher<'a> {
    pub fn new(table: &'a PatternTable) -> Self {
        Self { table }
    }

    /// Find the identifier of `kind` in a line.
    ///
    /// Patterns are tried in priority order; a later pattern is consulted
    /// only when every earlier one fails on this line.
    pub fn find<'l>(&self, kind: IdentifierKind, line: &'l str) -> Option<&'l str> {
        self.table
            .patterns(kind)
            .iter()
            .find_map(|re| re.find(line))
            .map(|m| m.as_str())
    }

    /// Fill any still-empty identifier fields of `entry` from `line`.
    ///
    /// Kinds already set by an earlier line are not evaluated at all.
    pub fn apply_line(&self, line: &str, entry: &mut Entry) {
        for kind in IdentifierKind::ALL {
            if entry.identifier(kind).is_some() {
                continue;
            }
            if let Some(found) = self.find(kind, line) {
                log::trace!("{:?} identifier {:?} in line {:?}", kind, found, line);
                entry.set_identifier_if_absent(kind, found);
            }
        }
    }
}
