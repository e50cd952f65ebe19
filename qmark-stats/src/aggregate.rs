//! Reduction of a classified message stream into per-author and per-date counts.
//!
//! Dates are bucketed in UTC: a message posted at 23:30 UTC counts for that UTC day regardless of
//! where the chat members live.

use crate::classify::{Classification, Classified};
use chrono::{DateTime, NaiveDate, Utc};
use qmark_core::Author;
use serde::Serialize;
use std::collections::BTreeMap;

/// Calendar date a timestamp is counted under.
pub fn bucket_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorTally {
    /// Most recently seen display name for this author.
    pub display_name: String,
    pub count: u64,
}

/// Valid-message count per author id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorCount(BTreeMap<i64, AuthorTally>);

impl AuthorCount {
    pub fn increment(&mut self, author: &Author) {
        let tally = self.0.entry(author.id).or_insert_with(|| AuthorTally {
            display_name: author.display_name.clone(),
            count: 0,
        });
        if tally.display_name != author.display_name {
            tally.display_name = author.display_name.clone();
        }
        tally.count += 1;
    }

    pub fn get(&self, author_id: i64) -> Option<&AuthorTally> {
        self.0.get(&author_id)
    }

    /// Entries in ascending author-id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &AuthorTally)> {
        self.0.iter().map(|(id, tally)| (*id, tally))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.values().map(|t| t.count).sum()
    }
}

/// Valid-message count per UTC calendar date, always in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateCount(BTreeMap<NaiveDate, u64>);

impl DateCount {
    pub fn increment(&mut self, date: NaiveDate) {
        *self.0.entry(date).or_insert(0) += 1;
    }

    pub fn get(&self, date: NaiveDate) -> Option<u64> {
        self.0.get(&date).copied()
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.0.iter().map(|(d, c)| (*d, *c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

/// Result of one full crawl. Lives for one report request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationSnapshot {
    /// Number of valid messages.
    pub total: u64,
    /// Number of messages fetched since the anchor (valid + anomalous).
    pub fetched: u64,
    pub anomalous: u64,
    pub authors: AuthorCount,
    pub dates: DateCount,
}

/// Blocking reduction: push every classified message, then [`Aggregator::finish`].
#[derive(Debug, Default)]
pub struct Aggregator {
    snapshot: AggregationSnapshot,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, classified: &Classified) {
        self.snapshot.fetched += 1;
        match classified.classification {
            Classification::Valid => {
                let message = &classified.message;
                self.snapshot.total += 1;
                self.snapshot.authors.increment(&message.author);
                self.snapshot.dates.increment(bucket_date(message.created_at));
            }
            Classification::Anomalous => {
                self.snapshot.anomalous += 1;
            }
        }
    }

    pub fn finish(self) -> AggregationSnapshot {
        self.snapshot
    }
}
