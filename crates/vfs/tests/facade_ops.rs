//! Facade management operations, exercised against both built-in backends.

use anyhow::Result;
use tempfile::TempDir;
use urivfs::{Config, Context, Vfs};

/// A vfs whose `file://` backend is rooted in a fresh tempdir.
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

fn each_backend(test: impl Fn(&Vfs, &str)) {
    let (_tmp, file) = file_vfs();
    test(&file, "file");
    test(&mem_vfs(), "mem");
}

#[test]
fn create_dir_then_is_dir() {
    each_backend(|vfs, scheme| {
        let uri = format!("{scheme}://d1/d2");
        vfs.create_dir(&uri).unwrap();
        assert!(vfs.is_dir(&uri).unwrap());

        vfs.remove_dir(&uri).unwrap();
        assert!(!vfs.is_dir(&uri).unwrap());
    });
}

#[test]
fn touch_creates_empty_file_once() {
    each_backend(|vfs, scheme| {
        let uri = format!("{scheme}://f.txt");
        assert!(!vfs.is_file(&uri).unwrap());

        vfs.touch(&uri).unwrap();
        assert!(vfs.is_file(&uri).unwrap());
        assert_eq!(vfs.file_size(&uri).unwrap(), 0);

        // Second touch is a no-op
        vfs.touch(&uri).unwrap();
        assert!(vfs.is_file(&uri).unwrap());
    });
}

#[test]
fn ls_returns_child_uris() {
    each_backend(|vfs, scheme| {
        vfs.create_dir(&format!("{scheme}://d")).unwrap();
        vfs.touch(&format!("{scheme}://d/a.txt")).unwrap();
        vfs.touch(&format!("{scheme}://d/b.txt")).unwrap();
        vfs.create_dir(&format!("{scheme}://d/sub")).unwrap();

        let children = vfs.ls(&format!("{scheme}://d")).unwrap();
        assert_eq!(
            children,
            vec![
                format!("{scheme}:///d/a.txt"),
                format!("{scheme}:///d/b.txt"),
                format!("{scheme}:///d/sub"),
            ]
        );
    });
}

#[test]
fn move_and_copy_files() {
    each_backend(|vfs, scheme| {
        let src = format!("{scheme}://src.txt");
        let copy = format!("{scheme}://copy.txt");
        let moved = format!("{scheme}://moved.txt");

        vfs.touch(&src).unwrap();
        vfs.copy_file(&src, &copy).unwrap();
        assert!(vfs.is_file(&src).unwrap());
        assert!(vfs.is_file(&copy).unwrap());

        vfs.move_file(&src, &moved).unwrap();
        assert!(!vfs.is_file(&src).unwrap());
        assert!(vfs.is_file(&moved).unwrap());

        // Destination exists → error, per backend policy
        assert!(vfs.move_file(&moved, &copy).is_err());
        assert!(vfs.copy_file(&moved, &copy).is_err());
    });
}

#[test]
fn move_and_copy_dirs() {
    each_backend(|vfs, scheme| {
        vfs.create_dir(&format!("{scheme}://tree/sub")).unwrap();
        vfs.touch(&format!("{scheme}://tree/sub/f.txt")).unwrap();

        vfs.copy_dir(&format!("{scheme}://tree"), &format!("{scheme}://tree2"))
            .unwrap();
        assert!(vfs.is_file(&format!("{scheme}://tree2/sub/f.txt")).unwrap());

        vfs.move_dir(&format!("{scheme}://tree"), &format!("{scheme}://tree3"))
            .unwrap();
        assert!(!vfs.is_dir(&format!("{scheme}://tree")).unwrap());
        assert!(vfs.is_file(&format!("{scheme}://tree3/sub/f.txt")).unwrap());
    });
}

#[test]
fn dir_size_sums_recursively() -> Result<()> {
    let vfs = mem_vfs();
    vfs.create_dir("mem://d/sub")?;

    let mut fh = vfs.open("mem://d/a.bin", urivfs::Mode::Write)?;
    fh.write(&[1u8; 64])?;
    fh.close()?;
    let mut fh = vfs.open("mem://d/sub/b.bin", urivfs::Mode::Write)?;
    fh.write(&[2u8; 36])?;
    fh.close()?;

    assert_eq!(vfs.dir_size("mem://d")?, 100);
    Ok(())
}

#[test]
fn bucket_lifecycle() {
    each_backend(|vfs, scheme| {
        let bucket = format!("{scheme}://bkt");
        vfs.create_bucket(&bucket).unwrap();
        assert!(vfs.is_bucket(&bucket).unwrap());
        assert!(vfs.is_empty_bucket(&bucket).unwrap());

        vfs.touch(&format!("{scheme}://bkt/obj")).unwrap();
        assert!(!vfs.is_empty_bucket(&bucket).unwrap());

        vfs.empty_bucket(&bucket).unwrap();
        assert!(vfs.is_empty_bucket(&bucket).unwrap());

        vfs.remove_bucket(&bucket).unwrap();
        assert!(!vfs.is_bucket(&bucket).unwrap());
    });
}

#[test]
fn unknown_scheme_is_rejected() {
    let vfs = mem_vfs();
    let err = vfs.is_file("s3://bucket/key").unwrap_err();
    assert!(matches!(err, urivfs::VfsError::UnsupportedScheme { .. }));
}

#[test]
fn cross_scheme_move_is_rejected() {
    let vfs = mem_vfs();
    vfs.touch("mem://a").unwrap();
    let err = vfs.move_file("mem://a", "file:///tmp/b").unwrap_err();
    assert!(matches!(err, urivfs::VfsError::InvalidUri { .. }));
}

#[test]
fn supports_reports_registered_schemes() {
    let vfs = mem_vfs();
    assert!(vfs.supports("file"));
    assert!(vfs.supports("mem"));
    assert!(!vfs.supports("azure"));
}

#[test]
fn facade_config_overlay_is_effective() {
    let ctx = Context::with_config(Config::new().set("a", "base").set("b", "base"));
    let vfs = Vfs::with_config(&ctx, &Config::new().set("b", "overlay"));

    assert_eq!(vfs.config().get("a"), Some("base"));
    assert_eq!(vfs.config().get("b"), Some("overlay"));
    // The context's own config is untouched
    assert_eq!(vfs.ctx().config().get("b"), Some("base"));
}
