//! Running aggregates folded from parsed records

use crate::record::Record;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Sentiment points of one category, ordered by message index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentSeries {
    points: Vec<(u64, f64)>,
}

impl SentimentSeries {
    fn push(&mut self, index: u64, score: f64) {
        self.points.push((index, score));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(u64, f64)] {
        &self.points
    }

    pub fn indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.points.iter().map(|(i, _)| *i)
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, s)| *s)
    }
}

/// In-memory aggregate state, owned by the consumer loop.
#[derive(Debug, Default)]
pub struct AggregateStore {
    author_counts: BTreeMap<String, u64>,
    category_series: BTreeMap<String, SentimentSeries>,
    last_timestamp: Option<String>,
    message_index: u64,
    rejected: u64,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the aggregates.
    ///
    /// Returns the message index assigned to the record.
    pub fn apply(&mut self, record: &Record) -> u64 {
        *self.author_counts.entry(record.author.clone()).or_insert(0) += 1;
        self.last_timestamp = Some(record.timestamp.clone());

        self.message_index += 1;
        if let Some(score) = record.sentiment {
            self.category_series
                .entry(record.category.clone())
                .or_default()
                .push(self.message_index, score);
        }

        self.message_index
    }

    /// Count a line the parser dropped.
    pub fn reject(&mut self) {
        self.rejected += 1;
    }

    pub fn author_count(&self, author: &str) -> u64 {
        self.author_counts.get(author).copied().unwrap_or(0)
    }

    pub fn series(&self, category: &str) -> Option<&SentimentSeries> {
        self.category_series.get(category)
    }

    pub fn message_index(&self) -> u64 {
        self.message_index
    }

    pub fn last_timestamp(&self) -> Option<&str> {
        self.last_timestamp.as_deref()
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn snapshot(&self) -> AggregateSnapshot<'_> {
        AggregateSnapshot {
            author_counts: &self.author_counts,
            category_series: &self.category_series,
            last_timestamp: self.last_timestamp.as_deref(),
            message_index: self.message_index,
            rejected: self.rejected,
        }
    }
}

/// Read-only view handed to renderers.
#[derive(Debug, Clone, Copy)]
pub struct AggregateSnapshot<'a> {
    pub author_counts: &'a BTreeMap<String, u64>,
    pub category_series: &'a BTreeMap<String, SentimentSeries>,
    pub last_timestamp: Option<&'a str>,
    pub message_index: u64,
    pub rejected: u64,
}

impl AggregateSnapshot<'_> {
    /// Highest sentiment message index seen so far, used for the x-axis.
    pub fn max_series_index(&self) -> u64 {
        self.category_series
            .values()
            .filter_map(|s| s.points().last().map(|(i, _)| *i))
            .max()
            .unwrap_or(0)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            messages: self.message_index,
            rejected: self.rejected,
            last_timestamp: self.last_timestamp.map(str::to_string),
            authors: self.author_counts.clone(),
            categories: self
                .category_series
                .iter()
                .map(|(name, series)| (name.clone(), series.points().to_vec()))
                .collect(),
        }
    }
}

/// Owned copy of the aggregates, printed on exit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub messages: u64,
    pub rejected: u64,
    pub last_timestamp: Option<String>,
    pub authors: BTreeMap<String, u64>,
    /// category -> [(message index, sentiment)]
    pub categories: BTreeMap<String, Vec<(u64, f64)>>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Messages: {} | Rejected: {} | Last msg: {}",
            self.messages,
            self.rejected,
            self.last_timestamp.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "Authors:")?;
        for (author, count) in &self.authors {
            writeln!(f, "  {}: {}", author, count)?;
        }
        writeln!(f, "Sentiment by category:")?;
        for (category, points) in &self.categories {
            let latest = points.last().map(|(_, s)| format!("{:.2}", s)).unwrap_or_default();
            writeln!(f, "  {}: {} points, latest {}", category, points.len(), latest)?;
        }
        Ok(())
    }
}
