//! Chart renderer seam

use crate::aggregate::AggregateSnapshot;
use anyhow::Result;
use tracing::{debug, info};

/// Anything that can draw the aggregates.
///
/// `redraw` replaces the whole picture on every call; there is no diffing,
/// so calling it twice with the same snapshot shows the same thing.
pub trait ChartRenderer {
    fn redraw(&mut self, snapshot: &AggregateSnapshot<'_>) -> Result<()>;

    /// Called once when the loop stops.
    fn finish(&mut self, _snapshot: &AggregateSnapshot<'_>) -> Result<()> {
        Ok(())
    }
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for Box<R> {
    fn redraw(&mut self, snapshot: &AggregateSnapshot<'_>) -> Result<()> {
        (**self).redraw(snapshot)
    }

    fn finish(&mut self, snapshot: &AggregateSnapshot<'_>) -> Result<()> {
        (**self).finish(snapshot)
    }
}

/// Headless renderer: writes the counts to the log instead of a screen.
#[derive(Debug, Default)]
pub struct LogRenderer {
    redraws: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl ChartRenderer for LogRenderer {
    fn redraw(&mut self, snapshot: &AggregateSnapshot<'_>) -> Result<()> {
        self.redraws += 1;
        info!(
            messages = snapshot.message_index,
            last_timestamp = snapshot.last_timestamp.unwrap_or("-"),
            "Updated counts: {:?}",
            snapshot.author_counts
        );
        for (category, series) in snapshot.category_series {
            if let Some((index, score)) = series.points().last() {
                debug!(category = %category, index, score, points = series.len(), "Sentiment trend");
            }
        }
        Ok(())
    }

    fn finish(&mut self, snapshot: &AggregateSnapshot<'_>) -> Result<()> {
        info!(
            messages = snapshot.message_index,
            rejected = snapshot.rejected,
            redraws = self.redraws,
            "Final counts: {:?}",
            snapshot.author_counts
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateStore;
    use crate::record::Record;

    #[test]
    fn test_log_renderer_counts_redraws() {
        let mut store = AggregateStore::new();
        store.apply(&Record::parse(br#"{"author":"Eve","category":"movies","sentiment":0.9}"#).unwrap());

        let mut renderer = LogRenderer::new();
        renderer.redraw(&store.snapshot()).unwrap();
        renderer.redraw(&store.snapshot()).unwrap();
        renderer.finish(&store.snapshot()).unwrap();

        assert_eq!(renderer.redraws(), 2);
    }

    #[test]
    fn test_boxed_renderer_forwards() {
        let store = AggregateStore::new();
        let mut renderer: Box<dyn ChartRenderer> = Box::new(LogRenderer::new());
        assert!(renderer.redraw(&store.snapshot()).is_ok());
        assert!(renderer.finish(&store.snapshot()).is_ok());
    }
}
