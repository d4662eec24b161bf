//! File handle lifecycle: open → read/write/flush → close.

use anyhow::Result;
use tempfile::TempDir;
use urivfs::{Config, Context, Mode, Vfs, VfsError};

fn file_vfs() -> (TempDir, Vfs) {
    let tmp = TempDir::new().unwrap();
    let config = Config::new().set("vfs.file.root", tmp.path().display().to_string());
    let ctx = Context::with_config(config);
    let vfs = Vfs::new(&ctx);
    (tmp, vfs)
}

fn mem_vfs() -> Vfs {
    Vfs::new(&Context::new())
}

#[test]
fn write_flush_reopen_read_roundtrip() {
    let (_tmp, file) = file_vfs();
    for (vfs, uri) in [(&file, "file://data.bin"), (&mem_vfs(), "mem://data.bin")] {
        let payload = b"round-trip payload";

        let mut fh = vfs.open(uri, Mode::Write).unwrap();
        fh.write(payload).unwrap();
        fh.flush().unwrap();
        fh.close().unwrap();

        let mut fh = vfs.open(uri, Mode::Read).unwrap();
        let got = fh.read(0, payload.len() as u64).unwrap();
        assert_eq!(got, payload);
        fh.close().unwrap();
    }
}

#[test]
fn closed_flag_tracks_lifecycle() -> Result<()> {
    let vfs = mem_vfs();
    let mut fh = vfs.open("mem://f", Mode::Write)?;
    assert!(!fh.closed());

    fh.close()?;
    assert!(fh.closed());

    // Double close is a no-op
    fh.close()?;
    assert!(fh.closed());
    Ok(())
}

#[test]
fn operations_on_closed_handle_fail() {
    let vfs = mem_vfs();
    let mut fh = vfs.open("mem://f", Mode::Write).unwrap();
    fh.close().unwrap();

    assert!(matches!(
        fh.read(0, 1).unwrap_err(),
        VfsError::HandleClosed { op: "read", .. }
    ));
    assert!(matches!(
        fh.write(b"x").unwrap_err(),
        VfsError::HandleClosed { op: "write", .. }
    ));
    assert!(matches!(
        fh.flush().unwrap_err(),
        VfsError::HandleClosed { op: "flush", .. }
    ));
}

#[test]
fn open_missing_file_for_read_fails() {
    let (_tmp, file) = file_vfs();
    for (vfs, uri) in [
        (&file, "file://no/such/file"),
        (&mem_vfs(), "mem://no/such/file"),
    ] {
        let err = vfs.open(uri, Mode::Read).unwrap_err();
        assert!(matches!(err, VfsError::Open { .. }));
    }
}

#[test]
fn read_past_extent_is_an_error() {
    let (_tmp, file) = file_vfs();
    for (vfs, uri) in [(&file, "file://short.bin"), (&mem_vfs(), "mem://short.bin")] {
        let mut fh = vfs.open(uri, Mode::Write).unwrap();
        fh.write(b"abc").unwrap();
        fh.close().unwrap();

        let mut fh = vfs.open(uri, Mode::Read).unwrap();
        // Asking for more than the file holds is a short read, hence an error
        let err = fh.read(0, 10).unwrap_err();
        assert!(matches!(err, VfsError::Read { .. }));

        // Offset at the boundary with zero length is fine
        assert_eq!(fh.read(3, 0).unwrap(), Vec::<u8>::new());
    }
}

#[test]
fn offset_reads_address_into_the_file() {
    let vfs = mem_vfs();
    let mut fh = vfs.open("mem://offs", Mode::Write).unwrap();
    fh.write(b"0123456789").unwrap();
    fh.close().unwrap();

    let mut fh = vfs.open("mem://offs", Mode::Read).unwrap();
    assert_eq!(fh.read(4, 3).unwrap(), b"456");
    assert_eq!(fh.read(0, 1).unwrap(), b"0");
}

#[test]
fn append_mode_extends() {
    let (_tmp, file) = file_vfs();
    for (vfs, uri) in [(&file, "file://log"), (&mem_vfs(), "mem://log")] {
        let mut fh = vfs.open(uri, Mode::Write).unwrap();
        fh.write(b"one,").unwrap();
        fh.close().unwrap();

        let mut fh = vfs.open(uri, Mode::Append).unwrap();
        fh.write(b"two").unwrap();
        fh.close().unwrap();

        let mut fh = vfs.open(uri, Mode::Read).unwrap();
        assert_eq!(fh.read(0, 7).unwrap(), b"one,two");
    }
}

#[test]
fn write_mode_truncates_existing() {
    let vfs = mem_vfs();
    let mut fh = vfs.open("mem://t", Mode::Write).unwrap();
    fh.write(b"a long first version").unwrap();
    fh.close().unwrap();

    let mut fh = vfs.open("mem://t", Mode::Write).unwrap();
    fh.write(b"short").unwrap();
    fh.close().unwrap();

    assert_eq!(vfs.file_size("mem://t").unwrap(), 5);
}

#[test]
fn write_to_read_handle_fails() {
    let vfs = mem_vfs();
    vfs.touch("mem://ro").unwrap();

    let mut fh = vfs.open("mem://ro", Mode::Read).unwrap();
    assert!(matches!(
        fh.write(b"nope").unwrap_err(),
        VfsError::Write { .. }
    ));
}

#[test]
fn close_flushes_outstanding_writes() {
    let vfs = mem_vfs();
    let mut fh = vfs.open("mem://c", Mode::Write).unwrap();
    fh.write(b"payload").unwrap();
    // No explicit flush
    fh.close().unwrap();

    assert_eq!(vfs.file_size("mem://c").unwrap(), 7);
}

#[test]
fn handle_keeps_context_alive() {
    // Handle outlives every other owner of the context and facade
    let mut fh = {
        let ctx = Context::new();
        let vfs = Vfs::new(&ctx);
        vfs.touch("mem://kept").unwrap();
        vfs.open("mem://kept", Mode::Read).unwrap()
    };
    assert!(fh.vfs().is_file("mem://kept").unwrap());
    assert_eq!(fh.read(0, 0).unwrap(), Vec::<u8>::new());
    fh.close().unwrap();
}
