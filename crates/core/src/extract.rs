//! End-to-end extraction of docket records from one presentation.

use crate::assemble::ResultAssembler;
use crate::collect::{collect_text_blocks, TextBlockFilter};
use crate::dates::DateExtractor;
use crate::entry::EntryBuilder;
use crate::patterns::{IdentifierMatcher, PatternTable};
use crate::{Entry, Error, Presentation, Record, Result};
use chrono::{Local, NaiveDate};

/// Largest supported due-date lookback, in months.
pub const MAX_MONTHS_BACK: u32 = 24;

/// Options controlling which textboxes and dates are reported.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Months of past due dates to include (30 days each).
    months_back: u32,

    /// Reference date for the cutoff.
    today: NaiveDate,

    /// Phrases added to the standard status-box blocklist.
    extra_skip_phrases: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            months_back: 0,
            today: Local::now().date_naive(),
            extra_skip_phrases: Vec::new(),
        }
    }
}

impl ExtractOptions {
    /// Options with no lookback, relative to the local current date.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include due dates up to this many months in the past.
    pub fn with_months_back(mut self, months_back: u32) -> Self {
        self.months_back = months_back;
        self
    }

    /// Use a fixed reference date instead of the current date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Also skip textboxes containing any of these phrases.
    pub fn with_extra_skip_phrases(mut self, phrases: Vec<String>) -> Self {
        self.extra_skip_phrases = phrases;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn validate(&self) -> Result<()> {
        if self.months_back > MAX_MONTHS_BACK {
            return Err(Error::InvalidLookback(self.months_back));
        }
        Ok(())
    }
}

/// Extracts docket records from presentations.
///
/// Holds the compiled pattern table, so build it once and reuse it for
/// every file in a batch.
#[derive(Debug, Clone)]
pub struct DocketExtractor {
    patterns: PatternTable,
    filter: TextBlockFilter,
    options: ExtractOptions,
}

impl DocketExtractor {
    /// Create an extractor, validating the options and compiling patterns.
    pub fn new(options: ExtractOptions) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            patterns: PatternTable::compile()?,
            filter: TextBlockFilter::new().with_extra_phrases(&options.extra_skip_phrases),
            options,
        })
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    fn entry_builder(&self) -> EntryBuilder<'_> {
        EntryBuilder::new(
            IdentifierMatcher::new(&self.patterns),
            DateExtractor::new(&self.patterns, self.options.today, self.options.months_back),
        )
    }

    /// Extract the entry for a single textbox, if it qualifies.
    ///
    /// Status and legend boxes are rejected before any matching.
    pub fn extract_textbox(&self, text: &str) -> Option<Entry> {
        if !self.filter.should_include(text) {
            log::trace!("Skipping status box {:?}", text);
            return None;
        }
        self.entry_builder().build(text)
    }

    /// Extract sorted records from every textbox of every slide.
    ///
    /// Each record carries the presentation's filename.
    pub fn extract(&self, presentation: &Presentation) -> Vec<Record> {
        let builder = self.entry_builder();
        let mut entries = Vec::new();

        for slide in &presentation.slides {
            let before = entries.len();

            for shape in &slide.shapes {
                for text in collect_text_blocks(shape) {
                    if !self.filter.should_include(&text) {
                        log::trace!("Skipping status box on slide {}", slide.number);
                        continue;
                    }
                    if let Some(entry) = builder.build(&text) {
                        entries.push((slide.number, entry));
                    }
                }
            }

            log::debug!(
                "Slide {}: {} entries",
                slide.number,
                entries.len() - before
            );
        }

        ResultAssembler::new(self.options.today).assemble(entries, &presentation.filename)
    }
}
