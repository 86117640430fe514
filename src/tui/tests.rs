#[cfg(test)]
mod tests {
    use crate::aggregate::AggregateStore;
    use crate::consumer::Consumer;
    use crate::infra::Tailer;
    use crate::record::Record;
    use crate::render::ChartRenderer;
    use crate::tui::TerminalChart;
    use crate::wait::SignalWait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn chart(width: u16, height: u16) -> TerminalChart<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        TerminalChart::new(terminal, "data/project_live.json")
    }

    fn rows(chart: &TerminalChart<TestBackend>) -> Vec<String> {
        let buffer = chart.terminal().backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn store_with(lines: &[&str]) -> AggregateStore {
        let mut store = AggregateStore::new();
        for line in lines {
            store.apply(&Record::parse(line.as_bytes()).unwrap());
        }
        store
    }

    #[test]
    fn test_renders_both_panels() {
        let store = store_with(&[
            r#"{"author":"Eve","timestamp":"t1","category":"movies","sentiment":0.9}"#,
            r#"{"author":"Eve","timestamp":"t2"}"#,
            r#"{"author":"Bob","timestamp":"t3","category":"movies","sentiment":0.4}"#,
        ]);
        let mut chart = chart(100, 32);

        chart.redraw(&store.snapshot()).unwrap();

        let screen = rows(&chart).join("\n");
        assert!(screen.contains("Real-Time Author Message Counts"));
        assert!(screen.contains("Sentiment Trend by Category"));
        assert!(screen.contains("Last msg: t3"));
        assert!(screen.contains("Messages: 3"));
        assert!(screen.contains("data/project_live.json"));
        assert!(screen.contains("Eve"));
        assert!(screen.contains("Bob"));
        assert!(screen.contains("movies"));
        assert_eq!(chart.frames(), 1);
    }

    #[test]
    fn test_renders_empty_state() {
        let store = AggregateStore::new();
        let mut chart = chart(60, 20);

        chart.redraw(&store.snapshot()).unwrap();

        let screen = rows(&chart).join("\n");
        assert!(screen.contains("Messages: 0"));
        assert!(screen.contains("Last msg: -"));
    }

    #[test]
    fn test_redraw_replaces_previous_frame() {
        let mut store = store_with(&[r#"{"author":"Alice","timestamp":"t1"}"#]);
        let mut chart = chart(80, 24);
        chart.redraw(&store.snapshot()).unwrap();

        store.apply(&Record::parse(br#"{"author":"Zed","timestamp":"t9"}"#).unwrap());
        chart.redraw(&store.snapshot()).unwrap();

        let screen = rows(&chart).join("\n");
        assert!(screen.contains("Last msg: t9"));
        assert!(!screen.contains("Last msg: t1"));
        assert!(screen.contains("Zed"));
    }

    #[test]
    fn test_same_snapshot_same_picture() {
        let store = store_with(&[
            r#"{"author":"Eve","category":"tech","sentiment":0.2}"#,
            r#"{"author":"Bob","category":"food","sentiment":0.7}"#,
        ]);
        let mut chart = chart(80, 24);

        chart.redraw(&store.snapshot()).unwrap();
        let first = rows(&chart);
        chart.redraw(&store.snapshot()).unwrap();
        let second = rows(&chart);

        // Row 0 carries the wall clock
        assert_eq!(first[1..], second[1..]);
        assert_eq!(chart.frames(), 2);
    }

    #[test]
    fn test_many_authors_fit() {
        let lines: Vec<String> = (0..40)
            .map(|i| format!(r#"{{"author":"author-{}"}}"#, i))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let store = store_with(&refs);
        let mut chart = chart(50, 20);

        assert!(chart.redraw(&store.snapshot()).is_ok());
    }

    #[test]
    fn test_dashboard_visible_before_first_record() {
        let file = NamedTempFile::new().unwrap();
        let tailer = Tailer::open(file.path()).unwrap();
        let interrupted = Arc::new(AtomicBool::new(true));
        let mut consumer = Consumer::new(tailer, chart(80, 24), SignalWait::with_flag(interrupted));

        consumer.run().unwrap();

        let (store, chart) = consumer.into_parts();
        assert_eq!(store.message_index(), 0);
        assert!(chart.frames() >= 1);
        let screen = rows(&chart).join("\n");
        assert!(screen.contains("[q/Esc/Ctrl-C] quit"));
        assert!(screen.contains("Messages: 0"));
    }
}
