//! Temporary fixtures
//!
//! A `Fixtures` value is a cleanup scope: files, directories and symlinks
//! created or tracked through it are deleted in reverse registration order
//! when it is dropped, on every exit path including `?` and panics.
//!
//! ```rust,no_run
//! # fn main() -> Result<(), utiltest::BenchError> {
//! let mut fx = utiltest::Fixtures::new();
//! fx.create_dir("work")?;
//! fx.create_file("work/input.txt", "data\n")?;
//! // ... run experiments ...
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use crate::error::{BenchError, ErrorKind};

/// Environment switch that turns on preservation in `Fixtures::from_env`
pub const KEEP_ENV: &str = "UTILTEST_KEEP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Directory,
    Symlink,
}

/// Whether the scope created the entry or was handed an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Created,
    Tracked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedResource {
    pub path: PathBuf,
    pub kind: ResourceKind,
    pub origin: Origin,
}

/// A scoped registry of filesystem fixtures. Not synchronized: share
/// between threads only behind the caller's own lock.
#[derive(Debug, Default)]
pub struct Fixtures {
    tracked: Vec<TrackedResource>,
    /// Files created by `create_file`, the only ones `modify_file` accepts
    own: HashSet<PathBuf>,
    preserve: bool,
}

impl Fixtures {
    /// Enter a new scope with nothing tracked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new scope that is preserved when `UTILTEST_KEEP` is set.
    pub fn from_env() -> Self {
        let mut fx = Self::new();
        fx.preserve(std::env::var_os(KEEP_ENV).is_some());
        fx
    }

    /// Leave every tracked entry on disk at scope exit (for debugging).
    pub fn preserve(&mut self, preserve: bool) {
        self.preserve = preserve;
    }

    pub fn tracked(&self) -> &[TrackedResource] {
        &self.tracked
    }

    pub fn create_dir(&mut self, path: impl AsRef<Path>) -> Result<(), BenchError> {
        let path = path.as_ref();
        ensure_absent(path)?;
        let mut builder = std::fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder.create(path).map_err(|e| io_error(path, e))?;
        self.push(path, ResourceKind::Directory, Origin::Created);
        Ok(())
    }

    /// Track an existing directory. A symlink to a directory is rejected;
    /// use `track_symlink` for it.
    pub fn track_dir(&mut self, path: impl AsRef<Path>) -> Result<(), BenchError> {
        let path = path.as_ref();
        if entry_kind(path) != Some(ResourceKind::Directory) {
            return Err(BenchError::not_found(path, "directory"));
        }
        self.push(path, ResourceKind::Directory, Origin::Tracked);
        Ok(())
    }

    /// Create a file with `contents` (empty for `None`). Only files created
    /// here can later be changed with `modify_file`, under any spelling of
    /// the path that cleans to the same one (`a` and `./a` match).
    pub fn create_file<'a>(&mut self, path: impl AsRef<Path>, contents: impl Into<Option<&'a str>>) -> Result<(), BenchError> {
        let path = path.as_ref();
        ensure_absent(path)?;
        std::fs::write(path, contents.into().unwrap_or("")).map_err(|e| io_error(path, e))?;
        self.push(path, ResourceKind::File, Origin::Created);
        self.own.insert(clean_path(path));
        Ok(())
    }

    pub fn modify_file<'a>(&mut self, path: impl AsRef<Path>, contents: impl Into<Option<&'a str>>) -> Result<(), BenchError> {
        let path = path.as_ref();
        if !self.own.contains(&clean_path(path)) {
            return Err(BenchError::unmanaged(path));
        }
        if !path.is_file() {
            return Err(BenchError::not_found(path, "file"));
        }
        std::fs::write(path, contents.into().unwrap_or("")).map_err(|e| io_error(path, e))?;
        Ok(())
    }

    pub fn track_file(&mut self, path: impl AsRef<Path>) -> Result<(), BenchError> {
        let path = path.as_ref();
        if entry_kind(path) != Some(ResourceKind::File) {
            return Err(BenchError::not_found(path, "file"));
        }
        self.push(path, ResourceKind::File, Origin::Tracked);
        Ok(())
    }

    /// Create a symlink at `link` pointing to the absolute form of `target`.
    /// The target does not need to exist.
    pub fn create_symlink(&mut self, link: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<(), BenchError> {
        let link = link.as_ref();
        ensure_absent(link)?;
        let target = absolute(target.as_ref())?;
        symlink(&target, link).map_err(|e| io_error(link, e))?;
        self.push(link, ResourceKind::Symlink, Origin::Created);
        Ok(())
    }

    pub fn track_symlink(&mut self, link: impl AsRef<Path>) -> Result<(), BenchError> {
        let link = link.as_ref();
        if entry_kind(link) != Some(ResourceKind::Symlink) {
            return Err(BenchError::not_found(link, "symlink"));
        }
        self.push(link, ResourceKind::Symlink, Origin::Tracked);
        Ok(())
    }

    /// Forget every tracked entry without deleting anything.
    ///
    /// This defeats the cleanup guarantee; whatever was tracked stays on disk.
    pub fn release_all(&mut self) {
        self.tracked.clear();
        self.own.clear();
    }

    /// Leave the scope now and report deletion failures instead of
    /// swallowing them as `Drop` does.
    pub fn close(mut self) -> Result<(), BenchError> {
        let mut failures = self.sweep();
        if failures.len() > 1 {
            let paths = failures.iter()
                .map(|(p, e)| format!("{}: {}", p.display(), e))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BenchError::new(ErrorKind::Io,
                format!("{} fixtures not removed: {}", failures.len(), paths)));
        }
        match failures.pop() {
            Some((path, e)) => Err(io_error(&path, e)),
            None => Ok(()),
        }
    }

    fn push(&mut self, path: &Path, kind: ResourceKind, origin: Origin) {
        self.tracked.push(TrackedResource {
            path: path.to_path_buf(),
            kind,
            origin,
        });
    }

    /// Delete tracked entries newest first. Entries already gone are
    /// skipped; directories are removed only if empty.
    fn sweep(&mut self) -> Vec<(PathBuf, std::io::Error)> {
        let tracked = std::mem::take(&mut self.tracked);
        self.own.clear();

        if self.preserve {
            for res in &tracked {
                eprintln!("utiltest: keeping {}", res.path.display());
            }
            return Vec::new();
        }

        let mut failures = Vec::new();
        for res in tracked.into_iter().rev() {
            if std::fs::symlink_metadata(&res.path).is_err() {
                continue;
            }
            let removed = match res.kind {
                ResourceKind::Directory => std::fs::remove_dir(&res.path),
                ResourceKind::File | ResourceKind::Symlink => std::fs::remove_file(&res.path),
            };
            if let Err(e) = removed {
                failures.push((res.path, e));
            }
        }
        failures
    }
}

impl Drop for Fixtures {
    fn drop(&mut self) {
        for (path, e) in self.sweep() {
            eprintln!("utiltest: failed to remove {}: {}", path.display(), e);
        }
    }
}

/// The type of the entry at `path` itself, without following symlinks
fn entry_kind(path: &Path) -> Option<ResourceKind> {
    let ft = std::fs::symlink_metadata(path).ok()?.file_type();
    if ft.is_symlink() {
        Some(ResourceKind::Symlink)
    } else if ft.is_dir() {
        Some(ResourceKind::Directory)
    } else if ft.is_file() {
        Some(ResourceKind::File)
    } else {
        None
    }
}

fn ensure_absent(path: &Path) -> Result<(), BenchError> {
    if std::fs::symlink_metadata(path).is_ok() {
        return Err(BenchError::already_exists(path));
    }
    Ok(())
}

fn io_error(path: &Path, e: std::io::Error) -> BenchError {
    let kind = match e.kind() {
        std::io::ErrorKind::NotFound => ErrorKind::NotFound,
        std::io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
        std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
        _ => ErrorKind::Io,
    };
    BenchError::new(kind, e.to_string()).with_path(path).with_source(e)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Make `path` absolute against the current directory and clean it
/// lexically. The path does not need to exist.
fn absolute(path: &Path) -> Result<PathBuf, BenchError> {
    if path.is_absolute() {
        Ok(clean_path(path))
    } else {
        Ok(clean_path(&std::env::current_dir()?.join(path)))
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn clean_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();
    let mut has_root = false;
    let mut prefix: Option<Component> = None;

    for component in path.components() {
        match component {
            Component::RootDir => {
                has_root = true;
                components.clear();
            }
            Component::Prefix(_) => {
                prefix = Some(component);
                components.clear();
            }
            Component::CurDir => {}
            Component::ParentDir => {
                // '..' at the root stays at the root
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else if !has_root {
                    components.push(component);
                }
            }
            Component::Normal(_) => components.push(component),
        }
    }

    let mut result = PathBuf::new();
    if let Some(p) = prefix {
        result.push(p);
    }
    if has_root {
        result.push(std::path::MAIN_SEPARATOR.to_string());
    }
    for c in &components {
        result.push(c);
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}
