//! Shape-tree flattening and status-box filtering.

use crate::Shape;

/// Phrases that mark legend and status boxes rather than docket entries.
///
/// Matched as case-insensitive substrings, so compound phrasing such as
/// "PENDING/ABANDONED" is caught as well.
pub const SKIP_PHRASES: &[&str] = &[
    "PENDING",
    "ABANDONED",
    "WITHDRAWN",
    "GRANTED",
    "ISSUED",
    "STRUCTURE",
];

/// Flatten a shape subtree into its text blocks, in document order.
///
/// Group children are visited recursively in order. Each text frame
/// contributes its trimmed text; empty frames and shapes without a text
/// frame contribute nothing.
pub fn collect_text_blocks(shape: &Shape) -> Vec<String> {
    match shape {
        Shape::Group(children) => children.iter().flat_map(collect_text_blocks).collect(),
        Shape::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Shape::Other => Vec::new(),
    }
}

/// Rejects text blocks containing any blocklisted status phrase.
#[derive(Debug, Clone)]
pub struct TextBlockFilter {
    /// Upper-cased phrases.
    phrases: Vec<String>,
}

impl Default for TextBlockFilter {
    fn default() -> Self {
        Self {
            phrases: SKIP_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl TextBlockFilter {
    /// Create a filter with the standard blocklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the blocklist with additional phrases.
    pub fn with_extra_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.phrases.extend(
            phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_uppercase())
                .filter(|p| !p.is_empty()),
        );
        self
    }

    /// Whether the block should go on to entry extraction.
    pub fn should_include(&self, text: &str) -> bool {
        let upper = text.to_uppercase();
        !self.phrases.iter().any(|phrase| upper.contains(phrase.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_flattens_groups_in_order() {
        let tree = Shape::Group(vec![
            Shape::text("first"),
            Shape::Group(vec![Shape::text("  second  "), Shape::Other]),
            Shape::text("third"),
        ]);

        assert_eq!(collect_text_blocks(&tree), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_collect_skips_empty_and_textless_shapes() {
        assert!(collect_text_blocks(&Shape::text("   \n\t ")).is_empty());
        assert!(collect_text_blocks(&Shape::Other).is_empty());
        assert!(collect_text_blocks(&Shape::Group(Vec::new())).is_empty());
    }

    #[test]
    fn test_filter_rejects_status_boxes() {
        let filter = TextBlockFilter::new();

        assert!(!filter.should_include("Pending"));
        assert!(!filter.should_include("US patent granted 2019"));
        assert!(!filter.should_include("Legend: Abandoned/Withdrawn"));
        assert!(!filter.should_include("Chemical structure"));
        assert!(filter.should_include("2018-LOW-68327-13\nOA due 03/15/2027"));
    }

    #[test]
    fn test_filter_matches_substrings() {
        let filter = TextBlockFilter::new();

        // "REISSUED" contains "ISSUED"
        assert!(!filter.should_include("Reissued claims"));
    }

    #[test]
    fn test_filter_extra_phrases() {
        let filter = TextBlockFilter::new().with_extra_phrases(["expired", " "]);

        assert!(!filter.should_include("Expired 2020"));
        assert!(filter.should_include("68327-13 due 01/01/2027"));
    }
}
