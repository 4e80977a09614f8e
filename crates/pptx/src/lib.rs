//! PPTX (Office Open XML) reader for docket extraction.
//!
//! Parses .pptx files, which are ZIP archives of XML parts, into slides of
//! shape trees that keep group nesting and document order.

pub mod parser;

pub use parser::{is_pptx_magic, PptxParser};
