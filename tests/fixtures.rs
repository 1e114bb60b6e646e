//! Fixture scope tests

use std::path::Path;
use tempfile::TempDir;
use utiltest::{ErrorKind, Fixtures, Origin, ResourceKind};

fn exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

#[test]
fn created_entries_removed_on_drop() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("d");
    let file = dir.join("f.txt");
    let link = dir.join("l");

    {
        let mut fx = Fixtures::new();
        fx.create_dir(&dir).unwrap();
        fx.create_file(&file, "hello").unwrap();
        fx.create_symlink(&link, &file).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "hello");
        assert_eq!(std::fs::read_link(&link).unwrap(), file);
        assert_eq!(fx.tracked().len(), 3);
        assert!(fx.tracked().iter().all(|r| r.origin == Origin::Created));
    }

    assert!(!exists(&link));
    assert!(!exists(&file));
    assert!(!exists(&dir));
}

#[test]
fn cleanup_runs_on_error_path() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("f");

    let result = (|| -> Result<(), utiltest::BenchError> {
        let mut fx = Fixtures::new();
        fx.create_file(&file, None)?;
        fx.create_file(&file, None)?;
        Ok(())
    })();

    assert_eq!(result.unwrap_err().kind, ErrorKind::AlreadyExists);
    assert!(!exists(&file));
}

#[test]
fn manually_removed_entries_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("d");
    let file = dir.join("f");

    let mut fx = Fixtures::new();
    fx.create_dir(&dir).unwrap();
    fx.create_file(&file, "x").unwrap();
    std::fs::remove_file(&file).unwrap();
    fx.close().unwrap();
    assert!(!exists(&dir));
}

#[test]
fn create_refuses_existing_paths() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("f");
    std::fs::write(&file, "").unwrap();

    let mut fx = Fixtures::new();
    assert_eq!(fx.create_file(&file, "x").unwrap_err().kind, ErrorKind::AlreadyExists);
    assert_eq!(fx.create_dir(&file).unwrap_err().kind, ErrorKind::AlreadyExists);
    assert_eq!(fx.create_symlink(&file, "/").unwrap_err().kind, ErrorKind::AlreadyExists);
    assert!(fx.tracked().is_empty());
    drop(fx);
    assert!(exists(&file));
}

#[test]
fn modify_only_own_files() {
    let tmp = TempDir::new().unwrap();
    let own = tmp.path().join("own");
    let foreign = tmp.path().join("foreign");
    std::fs::write(&foreign, "original").unwrap();

    let mut fx = Fixtures::new();
    fx.create_file(&own, None).unwrap();
    assert_eq!(std::fs::read_to_string(&own).unwrap(), "");
    fx.modify_file(&own, "changed").unwrap();
    assert_eq!(std::fs::read_to_string(&own).unwrap(), "changed");

    fx.track_file(&foreign).unwrap();
    let err = fx.modify_file(&foreign, "nope").unwrap_err();
    assert_eq!(err.kind, ErrorKind::PermissionDenied);
    assert_eq!(std::fs::read_to_string(&foreign).unwrap(), "original");

    std::fs::remove_file(&own).unwrap();
    assert_eq!(fx.modify_file(&own, "again").unwrap_err().kind, ErrorKind::NotFound);
}

#[cfg(unix)]
#[test]
fn track_checks_type() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("d");
    let file = tmp.path().join("f");
    let link = tmp.path().join("l");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(&file, "").unwrap();
    std::os::unix::fs::symlink(&file, &link).unwrap();

    let mut fx = Fixtures::new();
    assert_eq!(fx.track_dir(&file).unwrap_err().kind, ErrorKind::NotFound);
    assert_eq!(fx.track_file(&dir).unwrap_err().kind, ErrorKind::NotFound);
    assert_eq!(fx.track_symlink(&file).unwrap_err().kind, ErrorKind::NotFound);
    assert_eq!(fx.track_file(tmp.path().join("missing")).unwrap_err().kind, ErrorKind::NotFound);

    fx.track_dir(&dir).unwrap();
    fx.track_file(&file).unwrap();
    fx.track_symlink(&link).unwrap();
    let kinds: Vec<_> = fx.tracked().iter().map(|r| (r.kind, r.origin)).collect();
    assert_eq!(kinds, vec![
        (ResourceKind::Directory, Origin::Tracked),
        (ResourceKind::File, Origin::Tracked),
        (ResourceKind::Symlink, Origin::Tracked),
    ]);

    drop(fx);
    assert!(!exists(&dir));
    assert!(!exists(&file));
    assert!(!exists(&link));
}

#[test]
fn release_all_keeps_everything() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("f");

    let mut fx = Fixtures::new();
    fx.create_file(&file, "kept").unwrap();
    fx.release_all();
    assert!(fx.tracked().is_empty());
    assert_eq!(fx.modify_file(&file, "x").unwrap_err().kind, ErrorKind::PermissionDenied);
    drop(fx);

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "kept");
}

#[test]
fn preserve_leaves_entries() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("d");

    let mut fx = Fixtures::new();
    fx.preserve(true);
    fx.create_dir(&dir).unwrap();
    fx.close().unwrap();

    assert!(dir.is_dir());
}

#[test]
fn non_empty_directory_reported_by_close() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("d");

    let mut fx = Fixtures::new();
    fx.create_dir(&dir).unwrap();
    std::fs::write(dir.join("stray"), "").unwrap();

    let err = fx.close().unwrap_err();
    assert_eq!(err.path.as_deref(), Some(dir.as_path()));
    assert!(dir.is_dir());
}

#[test]
fn non_empty_directory_swallowed_by_drop() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("d");
    let file = tmp.path().join("f");

    {
        let mut fx = Fixtures::new();
        fx.create_file(&file, None).unwrap();
        fx.create_dir(&dir).unwrap();
        std::fs::write(dir.join("stray"), "").unwrap();
    }

    // The directory stays, but cleanup carried on past it.
    assert!(dir.is_dir());
    assert!(!exists(&file));
}

#[cfg(unix)]
#[test]
fn created_directory_mode() {
    use std::os::unix::fs::PermissionsExt;
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("d");

    let mut fx = Fixtures::new();
    fx.create_dir(&dir).unwrap();
    let mode = std::fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
    // umask can only remove bits
    assert_eq!(mode & !0o755, 0);
    assert_ne!(mode & 0o700, 0);
}

#[cfg(unix)]
#[test]
fn track_rejects_symlinks_to_dirs_and_files() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("real_dir");
    let file = tmp.path().join("real_file");
    let dir_link = tmp.path().join("dir_link");
    let file_link = tmp.path().join("file_link");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(&file, "").unwrap();
    std::os::unix::fs::symlink(&dir, &dir_link).unwrap();
    std::os::unix::fs::symlink(&file, &file_link).unwrap();

    let mut fx = Fixtures::new();
    assert_eq!(fx.track_dir(&dir_link).unwrap_err().kind, ErrorKind::NotFound);
    assert_eq!(fx.track_file(&file_link).unwrap_err().kind, ErrorKind::NotFound);
    assert!(fx.tracked().is_empty());

    fx.track_symlink(&dir_link).unwrap();
    fx.close().unwrap();
    assert!(!exists(&dir_link));
    assert!(dir.is_dir());
}

#[test]
fn modify_accepts_equivalent_spelling() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("a");
    let dotted = tmp.path().join(".").join("sub").join("..").join("a");

    std::fs::create_dir(tmp.path().join("sub")).unwrap();

    let mut fx = Fixtures::new();
    fx.create_file(&file, "one").unwrap();
    fx.modify_file(&dotted, "two").unwrap();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "two");
}
