//! Local file reads.

mod common;

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{Script, fetcher, recording_options};
use molview_fetch::{
    CancellationToken, FetchOptions, FetchPhase, FileRequest, Outcome, Payload, PayloadKind,
    Progress,
};

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

#[tokio::test]
async fn test_read_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "1cbs.pdb", b"HEADER    RETINOIC ACID BINDING PROTEIN\nEND\n");
    let (fetcher, _) = fetcher(Script::ok(""), 15);

    let outcome = fetcher
        .read_file(&FileRequest::text(&path), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Completed(Payload::Text(
            "HEADER    RETINOIC ACID BINDING PROTEIN\nEND\n".to_string()
        ))
    );
}

#[tokio::test]
async fn test_read_binary_file_with_progress() {
    let dir = tempfile::tempdir().unwrap();
    let contents: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let path = write_file(&dir, "1cbs.bcif", &contents);
    let (fetcher, _) = fetcher(Script::ok(""), 15);
    let (options, events) = recording_options();

    let payload = fetcher
        .read_file(&FileRequest::binary(&path), &options)
        .await
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(&payload.as_bytes().unwrap()[..], contents.as_slice());

    let events = events.lock().unwrap();
    assert_eq!(events[0].message, "Opening file...");
    let transfers: Vec<_> = events.iter().filter(|e| e.phase == FetchPhase::Transferring).collect();
    assert!(transfers.iter().all(|e| e.message == "Reading..." && e.max == Some(200_000)));
    assert_eq!(transfers.last().unwrap().current, Some(200_000));
    assert!(transfers.windows(2).all(|w| w[0].current <= w[1].current));
}

#[tokio::test]
async fn test_read_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "annotations.json", br#"{"1cbs":{"chains":["A"]}}"#);
    let (fetcher, _) = fetcher(Script::ok(""), 15);

    let payload = fetcher
        .read_file(&FileRequest::new(&path, PayloadKind::Json), &FetchOptions::default())
        .await
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(payload.as_json().unwrap()["1cbs"]["chains"][0], "A");
}

#[tokio::test]
async fn test_gzip_file_is_not_implemented() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "1CBS.CIF.GZ", b"\x1f\x8b\x08\x00");
    let (fetcher, _) = fetcher(Script::ok(""), 15);

    let err = fetcher
        .read_file(&FileRequest::text(&path), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_not_implemented());
}

#[tokio::test]
async fn test_bare_gz_name_is_compressed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, ".gz", b"\x1f\x8b");
    let (fetcher, _) = fetcher(Script::ok(""), 15);

    let err = fetcher
        .read_file(&FileRequest::binary(&path), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_not_implemented());
}

#[tokio::test]
async fn test_missing_file_is_transfer_error() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, _) = fetcher(Script::ok(""), 15);

    let err = fetcher
        .read_file(&FileRequest::text(dir.path().join("absent.cif")), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_transfer());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_file_read_does_not_touch_pool() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.txt", b"a");
    let (fetcher, _) = fetcher(Script::ok(""), 15);

    fetcher
        .read_file(&FileRequest::text(&path), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(fetcher.pool().stats().acquired, 0);
}

#[tokio::test]
async fn test_cancelled_file_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.txt", b"a");
    let (fetcher, _) = fetcher(Script::ok(""), 15);
    let options = FetchOptions::default();
    options.cancel.cancel();

    let task = fetcher.spawn_read_file(FileRequest::text(&path), options);
    assert_eq!(task.title(), "a.txt");
    assert!(task.join().await.unwrap().is_cancelled());
}

#[tokio::test]
async fn test_cancel_during_file_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "emd-1234.map", &vec![7u8; 512 * 1024]);
    let (fetcher, _) = fetcher(Script::ok(""), 15);

    let token = CancellationToken::new();
    let trigger = token.clone();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = FetchOptions::default()
        .cancel_token(token)
        .on_progress(Arc::new(move |progress: &Progress| {
            if progress.phase == FetchPhase::Transferring {
                trigger.cancel();
            }
            sink.lock().unwrap().push(progress.clone());
        }));

    let task = fetcher.spawn_read_file(FileRequest::binary(&path), options);
    assert!(task.join().await.unwrap().is_cancelled());

    let seen: Vec<_> = events.lock().unwrap().iter().map(|e| e.message.clone()).collect();
    assert_eq!(seen, ["Opening file...", "Reading..."]);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(events.lock().unwrap().len(), 2);
}
