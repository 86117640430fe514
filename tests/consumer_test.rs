//! End-to-end tests for the consumer loop against real files

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tailchart::{Consumer, LogRenderer, SignalWait, StartAt, TailError, Tailer};

fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

#[test]
fn test_tails_lines_written_by_another_process() {
    // Given: an existing data file with history the consumer should skip
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project_live.json");
    std::fs::write(&path, "{\"author\":\"Old\",\"timestamp\":\"t0\"}\n").unwrap();

    let interrupted = Arc::new(AtomicBool::new(false));
    let tailer = Tailer::open(&path).unwrap();
    let mut consumer = Consumer::new(tailer, LogRenderer::new(), SignalWait::with_flag(interrupted.clone()))
        .with_poll_interval(Duration::from_millis(10));

    // When: a writer appends records, then the user interrupts
    let writer_path = path.clone();
    let writer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        append(&writer_path, "{\"author\":\"Eve\",\"timestamp\":\"t1\",\"category\":\"movies\",\"sentiment\":0.9}\n");
        append(&writer_path, "{\"author\":\"Eve\",\"timestamp\":\"t2\"}\n");
        append(&writer_path, "not valid json\n");
        append(&writer_path, "   \n");
        append(&writer_path, "{\"author\":\"Bob\",\"timestamp\":\"t3\",\"category\":\"movies\",\"sentiment\":0.4}\n");
        thread::sleep(Duration::from_millis(150));
        interrupted.store(true, Ordering::SeqCst);
    });

    consumer.run().unwrap();
    writer.join().unwrap();

    // Then: only the appended records are counted
    let store = consumer.store();
    assert_eq!(store.author_count("Old"), 0);
    assert_eq!(store.author_count("Eve"), 2);
    assert_eq!(store.author_count("Bob"), 1);
    assert_eq!(store.message_index(), 3);
    assert_eq!(store.rejected(), 1);
    assert_eq!(store.series("movies").unwrap().points(), &[(1, 0.9), (3, 0.4)]);
    assert_eq!(store.last_timestamp(), Some("t3"));
    // startup frame plus one per record
    assert_eq!(consumer.renderer().redraws(), 4);
}

#[test]
fn test_replay_from_start() {
    // Given: a file that already holds records
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project_live.json");
    std::fs::write(
        &path,
        "{\"author\":\"Ann\",\"category\":\"tech\",\"sentiment\":0.6}\n{\"author\":\"Ann\",\"category\":\"tech\",\"sentiment\":0.8}\n",
    )
    .unwrap();

    // When: replaying from the beginning and interrupting once idle
    let interrupted = Arc::new(AtomicBool::new(false));
    let tailer = Tailer::open_at(&path, StartAt::Beginning).unwrap();
    let mut consumer = Consumer::new(tailer, LogRenderer::new(), SignalWait::with_flag(interrupted.clone()))
        .with_poll_interval(Duration::from_millis(10));
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        interrupted.store(true, Ordering::SeqCst);
    });

    consumer.run().unwrap();
    stopper.join().unwrap();

    // Then: existing records are aggregated
    let summary = consumer.store().snapshot().summary();
    assert_eq!(summary.messages, 2);
    assert_eq!(summary.authors.get("Ann"), Some(&2));
    assert_eq!(summary.categories.get("tech"), Some(&vec![(1, 0.6), (2, 0.8)]));
}

#[test]
fn test_missing_file_fails_before_loop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("project_live.json");

    let err = Tailer::open(&path).err().unwrap();

    assert!(matches!(err, TailError::Missing(_)));
    assert!(err.to_string().contains("does not exist"));
}
