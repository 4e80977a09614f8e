//! Domain types for presentations, candidate entries and output records.

use serde::Serialize;

/// A presentation as exposed by a reader backend.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation with the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }
}

/// A single slide and its top-level shapes in document order.
#[derive(Debug, Clone)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Top-level shapes of the slide's shape tree.
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a top-level shape.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }
}

/// A node in a slide's shape tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// A group shape with ordered children.
    Group(Vec<Shape>),
    /// A shape with a text frame, holding its raw (untrimmed) text.
    Text(String),
    /// Pictures, connectors, graphic frames and anything else without text.
    Other,
}

impl Shape {
    /// Convenience constructor for a text-frame shape.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// The four identifier families recognized in a textbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Docket,
    Application,
    Pct,
    Wipo,
}

impl IdentifierKind {
    /// All kinds, in output column order.
    pub const ALL: [IdentifierKind; 4] = [
        IdentifierKind::Docket,
        IdentifierKind::Application,
        IdentifierKind::Pct,
        IdentifierKind::Wipo,
    ];

    /// Column header used for this kind in exported tables.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Docket => "Docket Number",
            Self::Application => "Application Number",
            Self::Pct => "PCT Number",
            Self::Wipo => "WIPO Number",
        }
    }
}

/// Candidate entry accumulated from the lines of one textbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub docket_number: Option<String>,
    pub application_number: Option<String>,
    pub pct_number: Option<String>,
    pub wipo_number: Option<String>,

    /// Formatted `MM/DD/YYYY` due dates in encounter order, duplicates kept.
    pub due_dates: Vec<String>,

    /// The textbox's non-empty lines joined by `\n`, unsanitized.
    pub raw_text: String,
}

impl Entry {
    /// Create an empty entry for the given raw text.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// Get the identifier of the given kind, if set.
    pub fn identifier(&self, kind: IdentifierKind) -> Option<&str> {
        match kind {
            IdentifierKind::Docket => self.docket_number.as_deref(),
            IdentifierKind::Application => self.application_number.as_deref(),
            IdentifierKind::Pct => self.pct_number.as_deref(),
            IdentifierKind::Wipo => self.wipo_number.as_deref(),
        }
    }

    /// Set an identifier unless one of that kind is already present.
    ///
    /// Returns `true` if the value was stored. A set identifier is never
    /// overwritten.
    pub fn set_identifier_if_absent(&mut self, kind: IdentifierKind, value: &str) -> bool {
        let slot = match kind {
            IdentifierKind::Docket => &mut self.docket_number,
            IdentifierKind::Application => &mut self.application_number,
            IdentifierKind::Pct => &mut self.pct_number,
            IdentifierKind::Wipo => &mut self.wipo_number,
        };

        if slot.is_some() {
            return false;
        }
        *slot = Some(value.to_string());
        true
    }

    /// Whether at least one identifier field is set.
    pub fn has_identifier(&self) -> bool {
        IdentifierKind::ALL
            .iter()
            .any(|&kind| self.identifier(kind).is_some())
    }

    /// Whether this entry qualifies for output: an identifier and a due date.
    pub fn is_retained(&self) -> bool {
        self.has_identifier() && !self.due_dates.is_empty()
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Slide")]
    pub slide: usize,

    #[serde(rename = "Textbox Content")]
    pub textbox_content: String,

    #[serde(rename = "Docket Number")]
    pub docket_number: Option<String>,

    #[serde(rename = "Application Number")]
    pub application_number: Option<String>,

    #[serde(rename = "PCT Number")]
    pub pct_number: Option<String>,

    #[serde(rename = "WIPO Number")]
    pub wipo_number: Option<String>,

    /// Due dates joined by `"; "`.
    #[serde(rename = "Due Dates")]
    pub due_dates: String,

    #[serde(rename = "Filename")]
    pub filename: String,
}

impl Record {
    /// Output column headers, in order.
    pub const COLUMNS: [&'static str; 8] = [
        "Slide",
        "Textbox Content",
        IdentifierKind::Docket.label(),
        IdentifierKind::Application.label(),
        IdentifierKind::Pct.label(),
        IdentifierKind::Wipo.label(),
        "Due Dates",
        "Filename",
    ];

    /// Build a record from a retained entry found on `slide`.
    pub fn from_entry(slide: usize, entry: Entry, filename: impl Into<String>) -> Self {
        Self {
            slide,
            due_dates: entry.due_dates.join("; "),
            textbox_content: entry.raw_text,
            docket_number: entry.docket_number,
            application_number: entry.application_number,
            pct_number: entry.pct_number,
            wipo_number: entry.wipo_number,
            filename: filename.into(),
        }
    }

    /// Cell values in column order, with absent identifiers as empty strings.
    pub fn cells(&self) -> [String; 8] {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        [
            self.slide.to_string(),
            self.textbox_content.clone(),
            opt(&self.docket_number),
            opt(&self.application_number),
            opt(&self.pct_number),
            opt(&self.wipo_number),
            self.due_dates.clone(),
            self.filename.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_never_overwritten() {
        let mut entry = Entry::new("text");

        assert!(entry.set_identifier_if_absent(IdentifierKind::Docket, "68327-13"));
        assert!(!entry.set_identifier_if_absent(IdentifierKind::Docket, "11111-22"));
        assert_eq!(entry.identifier(IdentifierKind::Docket), Some("68327-13"));
    }

    #[test]
    fn test_retention_requires_identifier_and_date() {
        let mut entry = Entry::new("text");
        assert!(!entry.is_retained());

        entry.due_dates.push("03/15/2027".to_string());
        assert!(!entry.is_retained());

        entry.set_identifier_if_absent(IdentifierKind::Wipo, "WO2023/123456");
        assert!(entry.is_retained());

        entry.due_dates.clear();
        assert!(!entry.is_retained());
    }

    #[test]
    fn test_record_from_entry_joins_dates() {
        let mut entry = Entry::new("0509.003US\ndue 01/02/2027");
        entry.set_identifier_if_absent(IdentifierKind::Docket, "0509.003US");
        entry.due_dates = vec!["01/02/2027".to_string(), "02/03/2027".to_string()];

        let record = Record::from_entry(4, entry, "deck.pptx");

        assert_eq!(record.slide, 4);
        assert_eq!(record.due_dates, "01/02/2027; 02/03/2027");
        assert_eq!(record.docket_number.as_deref(), Some("0509.003US"));
        assert_eq!(record.application_number, None);
        assert_eq!(record.filename, "deck.pptx");
        assert_eq!(record.cells()[3], "");
    }

    #[test]
    fn test_column_labels_match_record_columns() {
        for (i, kind) in IdentifierKind::ALL.iter().enumerate() {
            assert_eq!(kind.label(), Record::COLUMNS[i + 2]);
        }
    }
}
