//! Per-textbox entry construction and retention.

use crate::dates::DateExtractor;
use crate::patterns::IdentifierMatcher;
use crate::sanitize::{split_lines, LineSanitizer};
use crate::Entry;

/// Builds at most one [`Entry`] from a textbox.
#[derive(Debug, Clone)]
pub struct EntryBuilder<'a> {
    sanitizer: LineSanitizer,
    matcher: IdentifierMatcher<'a>,
    dates: DateExtractor<'a>,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(matcher: IdentifierMatcher<'a>, dates: DateExtractor<'a>) -> Self {
        Self {
            sanitizer: LineSanitizer::new(),
            matcher,
            dates,
        }
    }

    /// Scan every line of `text` and return the entry if it qualifies.
    ///
    /// Each line is sanitized once; the same sanitized line feeds both
    /// identifier and date matching. The entry is kept only when it has at
    /// least one identifier and at least one due date on or after the
    /// cutoff.
    pub fn build(&self, text: &str) -> Option<Entry> {
        let lines = split_lines(text);
        let mut entry = Entry::new(lines.join("\n"));

        for line in &lines {
            let clean = self.sanitizer.sanitize(line);
            self.matcher.apply_line(&clean, &mut entry);
            entry.due_dates.extend(self.dates.extract(&clean));
        }

        if !entry.has_identifier() {
            log::trace!("No identifier in textbox {:?}", entry.raw_text);
            return None;
        }
        if entry.due_dates.is_empty() {
            log::trace!(
                "No due date on or after {} in textbox {:?}",
                self.dates.cutoff(),
                entry.raw_text
            );
            return None;
        }

        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatternTable;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn build(text: &str, months_back: u32) -> Option<Entry> {
        let table = PatternTable::compile().unwrap();
        let builder = EntryBuilder::new(
            IdentifierMatcher::new(&table),
            DateExtractor::new(&table, today(), months_back),
        );
        builder.build(text)
    }

    #[test]
    fn test_docket_with_future_date() {
        let entry = build("2018-LOW-68327-13 response due 03/15/2027", 0).unwrap();

        assert_eq!(entry.docket_number.as_deref(), Some("2018-LOW-68327-13"));
        assert_eq!(entry.due_dates, vec!["03/15/2027"]);
    }

    #[test]
    fn test_identifier_without_date_is_dropped() {
        assert_eq!(build("PCT/US2023/012345", 0), None);
    }

    #[test]
    fn test_dates_without_identifier_are_dropped() {
        assert_eq!(build("Team meeting 03/15/2027\nfollow-up 04/01/2027", 0), None);
    }

    #[test]
    fn test_only_past_dates_are_dropped() {
        assert_eq!(build("68327-13\nOA due 01/05/2026", 0), None);
        assert!(build("68327-13\nOA due 01/05/2026", 12).is_some());
    }

    #[test]
    fn test_first_line_wins_across_lines() {
        let text = "68327-13\nWO2023/123456\n0509.003US due 12/01/2026\n2018-LOW-11111-22 due 11/01/2026";
        let entry = build(text, 0).unwrap();

        assert_eq!(entry.docket_number.as_deref(), Some("68327-13"));
        assert_eq!(entry.wipo_number.as_deref(), Some("WO2023/123456"));
        assert_eq!(entry.due_dates, vec!["12/01/2026", "11/01/2026"]);
    }

    #[test]
    fn test_raw_text_keeps_original_lines() {
        let text = "  (68327-13)  \n\n   16/201,375 US: due 01/02/2027  ";
        let entry = build(text, 0).unwrap();

        assert_eq!(entry.raw_text, "(68327-13)\n16/201,375 US: due 01/02/2027");
        assert_eq!(entry.application_number.as_deref(), Some("16/201375 US"));
    }
}
