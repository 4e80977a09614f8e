//! Conversion of retained entries into sorted output records.

use crate::dates::earliest_due_date;
use crate::{Entry, Record};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Turns retained entries into records ordered by earliest due date.
#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler {
    /// Reference date for resolving two-digit years when re-parsing.
    today: NaiveDate,
}

impl ResultAssembler {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Build records for `(slide number, entry)` pairs and sort them.
    ///
    /// Records are ordered by the earliest date in their due-date list.
    /// Records whose dates cannot be re-parsed go last. Ties keep input
    /// order. The sort key is not part of the output.
    pub fn assemble<I>(&self, entries: I, filename: &str) -> Vec<Record>
    where
        I: IntoIterator<Item = (usize, Entry)>,
    {
        let mut keyed: Vec<(Option<NaiveDate>, Record)> = entries
            .into_iter()
            .map(|(slide, entry)| {
                let record = Record::from_entry(slide, entry, filename);
                (earliest_due_date(&record.due_dates, self.today), record)
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| compare_due(a, b));

        keyed.into_iter().map(|(_, record)| record).collect()
    }
}

/// Ascending by date, with missing dates after every real one.
fn compare_due(a: &Option<NaiveDate>, b: &Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
