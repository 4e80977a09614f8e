//! Core domain types and extraction pipeline for pulling docket identifiers
//! and upcoming due dates out of slide-deck textboxes.

pub mod assemble;
pub mod collect;
pub mod dates;
pub mod entry;
pub mod error;
pub mod export;
pub mod extract;
pub mod patterns;
pub mod sanitize;
pub mod types;

pub use assemble::ResultAssembler;
pub use collect::{collect_text_blocks, TextBlockFilter, SKIP_PHRASES};
pub use dates::{cutoff_date, earliest_due_date, parse_lenient, DateExtractor, DUE_DATE_FORMAT};
pub use entry::EntryBuilder;
pub use error::{Error, Result};
pub use export::{render_table, write_csv, write_json};
pub use extract::{DocketExtractor, ExtractOptions, MAX_MONTHS_BACK};
pub use patterns::{IdentifierMatcher, PatternTable};
pub use sanitize::{split_lines, LineSanitizer};
pub use types::{Entry, IdentifierKind, Presentation, Record, Shape, Slide};
