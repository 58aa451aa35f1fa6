mod common;

use std::io::{Read, Seek, SeekFrom, Write};

// ---------------------------------------------------------------------------
// ObjectReader
// ---------------------------------------------------------------------------

#[test]
fn reader_read_to_end() {
    let (_server, fs) = common::quickstart_fs();
    let mut f = fs.open("quickstart/main/README.md").unwrap();
    assert_eq!(f.size(), common::README.len() as u64);

    let mut out = Vec::new();
    f.read_to_end(&mut out).unwrap();
    assert_eq!(out, common::README.as_bytes());
}

#[test]
fn reader_small_blocksize_refills() {
    let (_server, fs) = common::quickstart_fs();
    let mut f = fs
        .open("quickstart/main/README.md")
        .unwrap()
        .with_blocksize(7);

    let mut out = Vec::new();
    f.read_to_end(&mut out).unwrap();
    assert_eq!(out, common::README.as_bytes());
}

#[test]
fn reader_seeks() {
    let (_server, fs) = common::quickstart_fs();
    let bytes = common::README.as_bytes();
    let mut f = fs
        .open("quickstart/main/README.md")
        .unwrap()
        .with_blocksize(8);

    f.seek(SeekFrom::Start(2)).unwrap();
    let mut buf = [0u8; 4];
    f.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, &bytes[2..6]);

    f.seek(SeekFrom::Current(-4)).unwrap();
    f.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, &bytes[2..6]);

    f.seek(SeekFrom::End(-6)).unwrap();
    let mut tail = Vec::new();
    f.read_to_end(&mut tail).unwrap();
    assert_eq!(tail, &bytes[bytes.len() - 6..]);
}

#[test]
fn reader_seek_before_start_errors() {
    let (_server, fs) = common::quickstart_fs();
    let mut f = fs.open("quickstart/main/README.md").unwrap();
    let err = f.seek(SeekFrom::Current(-1)).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

#[test]
fn reader_past_end_reads_nothing() {
    let (_server, fs) = common::quickstart_fs();
    let mut f = fs.open("quickstart/main/README.md").unwrap();
    f.seek(SeekFrom::End(100)).unwrap();
    let mut out = Vec::new();
    assert_eq!(f.read_to_end(&mut out).unwrap(), 0);
    assert!(out.is_empty());
}

#[test]
fn open_missing_errors() {
    let (_server, fs) = common::quickstart_fs();
    assert!(fs.open("quickstart/main/nope.bin").is_err());
}

// ---------------------------------------------------------------------------
// ObjectWriter
// ---------------------------------------------------------------------------

#[test]
fn writer_uploads_on_close() {
    let (_server, fs) = common::quickstart_fs();
    let mut w = fs.open_write("quickstart/main/out.bin").unwrap();
    w.write_all(b"chunk1").unwrap();
    w.write_all(b"chunk2").unwrap();
    let stats = w.close().unwrap();

    assert_eq!(stats.path, "out.bin");
    assert_eq!(stats.size_bytes, Some(12));
    assert_eq!(fs.cat("quickstart/main/out.bin").unwrap(), b"chunk1chunk2");
}

#[test]
fn writer_close_is_idempotent() {
    let (_server, fs) = common::quickstart_fs();
    let mut w = fs.open_write("quickstart/main/out.bin").unwrap();
    w.write_all(b"data").unwrap();

    let first = w.close().unwrap();
    assert!(w.closed());
    let second = w.close().unwrap();
    assert_eq!(first.checksum, second.checksum);
}

#[test]
fn writer_write_after_close_errors() {
    let (_server, fs) = common::quickstart_fs();
    let mut w = fs.open_write("quickstart/main/out.bin").unwrap();
    w.write_all(b"data").unwrap();
    w.close().unwrap();
    assert!(w.write_all(b"more").is_err());
}

#[test]
fn writer_drop_uploads() {
    let (_server, fs) = common::quickstart_fs();
    {
        let mut w = fs.open_write("quickstart/main/dropped.txt").unwrap();
        w.write_all(b"auto").unwrap();
        // no explicit close
    }
    assert_eq!(fs.cat("quickstart/main/dropped.txt").unwrap(), b"auto");
}

#[test]
fn writer_creates_branch_like_pipe() {
    let (_server, fs) = common::quickstart_fs();
    let mut w = fs.open_write("quickstart/streams/out.txt").unwrap();
    w.write_all(b"streamed").unwrap();
    w.close().unwrap();

    assert_eq!(fs.cat("quickstart/streams/out.txt").unwrap(), b"streamed");
    assert!(fs.exists("quickstart/streams/README.md").unwrap());
}
