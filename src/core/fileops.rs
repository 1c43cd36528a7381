//! File operations for kaser: copy, move, delete, rename and create.
//!
//! The engine builds a [PendingOperation] when a command key is pressed, fills in
//! the destination from the prompt, and hands it to [execute]. Execution is
//! synchronous; the returned [OpOutcome] or [FsError] becomes the status line.
//!
//! Confirmation is enforced by the engine, not here.

use crate::config::General;
use crate::core::error::{FsError, FsResult, IoResultExt};
use crate::utils::{copy_recursive, expand_home};

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Copy,
    Move,
    Delete,
    Rename,
    CreateFile,
    CreateDirectory,
}

impl OpKind {
    /// Move and Delete ask for a yes/no before anything else happens.
    #[inline]
    pub fn needs_confirmation(self) -> bool {
        matches!(self, OpKind::Move | OpKind::Delete)
    }
}

/// A requested mutation awaiting confirmation or parameters.
///
/// For create operations `source` is the directory the new entry goes into.
#[derive(Debug, Clone)]
pub struct PendingOperation {
    kind: OpKind,
    source: PathBuf,
    destination: Option<PathBuf>,
    requires_confirmation: bool,
}

impl PendingOperation {
    pub fn new(kind: OpKind, source: PathBuf) -> Self {
        Self {
            kind,
            source,
            destination: None,
            requires_confirmation: kind.needs_confirmation(),
        }
    }

    pub fn with_destination(mut self, destination: PathBuf) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn set_destination(&mut self, destination: PathBuf) {
        self.destination = Some(destination);
    }

    // Accessors

    #[inline]
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    #[inline]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[inline]
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    #[inline]
    pub fn requires_confirmation(&self) -> bool {
        self.requires_confirmation
    }

    /// File name of the source, for prompts and status messages.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Behaviour switches taken from the `[general]` config section.
#[derive(Debug, Clone, Copy)]
pub struct OpSettings {
    pub allow_recursive_delete: bool,
    pub move_to_trash: bool,
}

impl Default for OpSettings {
    fn default() -> Self {
        Self {
            allow_recursive_delete: true,
            move_to_trash: false,
        }
    }
}

impl From<&General> for OpSettings {
    fn from(general: &General) -> Self {
        Self {
            allow_recursive_delete: general.allow_recursive_delete(),
            move_to_trash: general.move_to_trash(),
        }
    }
}

/// Result of a successful operation.
#[derive(Debug, Clone)]
pub struct OpOutcome {
    kind: OpKind,
    target: PathBuf,
    trashed: bool,
}

impl OpOutcome {
    #[inline]
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// The path that now exists (or, for deletes, no longer does).
    #[inline]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Translation key for the status message.
    pub fn message_key(&self) -> &'static str {
        match self.kind {
            OpKind::Copy => "copied",
            OpKind::Move => "moved",
            OpKind::Delete if self.trashed => "trashed",
            OpKind::Delete => "deleted",
            OpKind::Rename => "renamed",
            OpKind::CreateFile => "created_file",
            OpKind::CreateDirectory => "created_folder",
        }
    }

    /// Entry name to select after the listing is rebuilt.
    pub fn focus(&self) -> Option<OsString> {
        match self.kind {
            OpKind::Delete => None,
            _ => self.target.file_name().map(|n| n.to_os_string()),
        }
    }
}

/// Resolves a typed Copy/Move destination.
///
/// `~` expands to home and relative paths resolve against `cwd`. An existing
/// directory receives the source under its own name.
pub fn resolve_destination(cwd: &Path, input: &str, source: &Path) -> PathBuf {
    let typed = expand_home(input.trim());
    let dest = if typed.is_absolute() {
        typed
    } else {
        cwd.join(typed)
    };
    match source.file_name() {
        Some(name) if dest.is_dir() => dest.join(name),
        _ => dest,
    }
}

/// Resolves a bare name typed for Rename or the create operations.
pub fn resolve_name(dir: &Path, name: &str) -> FsResult<PathBuf> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(FsError::invalid(dir, "invalid name"));
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(FsError::invalid(
            &dir.join(name),
            "name must not contain a path separator",
        ));
    }
    Ok(dir.join(name))
}

/// Runs one operation to completion.
pub fn execute(op: &PendingOperation, settings: OpSettings) -> FsResult<OpOutcome> {
    let source = op.source();
    let result = match op.kind() {
        OpKind::Copy => {
            let dest = required_destination(op)?;
            copy_entry(source, dest).map(|_| dest.to_path_buf())
        }
        OpKind::Move | OpKind::Rename => {
            let dest = required_destination(op)?;
            move_entry(source, dest).map(|_| dest.to_path_buf())
        }
        OpKind::Delete => delete_entry(source, settings).map(|_| source.to_path_buf()),
        OpKind::CreateFile => {
            let target = required_destination(op)?;
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(target)
                .at(target)
                .map(|_| target.to_path_buf())
        }
        OpKind::CreateDirectory => {
            let target = required_destination(op)?;
            fs::create_dir(target).at(target).map(|_| target.to_path_buf())
        }
    };

    match result {
        Ok(target) => {
            tracing::info!(kind = ?op.kind(), source = %source.display(), target = %target.display(), "file operation done");
            Ok(OpOutcome {
                kind: op.kind(),
                target,
                trashed: op.kind() == OpKind::Delete && settings.move_to_trash,
            })
        }
        Err(e) => {
            tracing::warn!(kind = ?op.kind(), source = %source.display(), error = %e, "file operation failed");
            Err(e)
        }
    }
}

fn required_destination(op: &PendingOperation) -> FsResult<&Path> {
    op.destination()
        .ok_or_else(|| FsError::invalid(op.source(), "no destination given"))
}

/// Shared pre-flight for copy and move: source must exist, destination must not,
/// and a directory may not be placed inside itself.
fn check_transfer(source: &Path, dest: &Path) -> FsResult<()> {
    let meta = fs::symlink_metadata(source).at(source)?;
    if fs::symlink_metadata(dest).is_ok() {
        return Err(FsError::AlreadyExists(dest.to_path_buf()));
    }
    if meta.is_dir() || source.is_dir() {
        let src_abs = fs::canonicalize(source).at(source)?;
        let dest_parent = dest.parent().unwrap_or(dest);
        let parent_abs = fs::canonicalize(dest_parent).at(dest_parent)?;
        if parent_abs.starts_with(&src_abs) {
            return Err(FsError::invalid(
                dest,
                "destination is inside the source directory",
            ));
        }
    }
    Ok(())
}

fn copy_entry(source: &Path, dest: &Path) -> FsResult<()> {
    check_transfer(source, dest)?;
    if let Err(e) = copy_recursive(source, dest) {
        discard_partial_copy(dest);
        return Err(e);
    }
    Ok(())
}

fn move_entry(source: &Path, dest: &Path) -> FsResult<()> {
    check_transfer(source, dest)?;
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(source = %source.display(), "rename crosses devices, copying");
            move_by_copy(source, dest)
        }
        Err(e) => Err(FsError::from_io(e, source)),
    }
}

/// Copy then delete. A copy failure removes the partial copy; a delete failure
/// leaves the copy in place and reports [FsError::PartialMove].
pub(crate) fn move_by_copy(source: &Path, dest: &Path) -> FsResult<()> {
    move_by_copy_with(source, dest, |path| remove_entry(path, true))
}

fn move_by_copy_with<F>(source: &Path, dest: &Path, remove_source: F) -> FsResult<()>
where
    F: FnOnce(&Path) -> FsResult<()>,
{
    if let Err(e) = copy_recursive(source, dest) {
        discard_partial_copy(dest);
        return Err(e);
    }
    remove_source(source).map_err(|e| FsError::PartialMove {
        src: source.to_path_buf(),
        dest: dest.to_path_buf(),
        reason: e.to_string(),
    })
}

fn delete_entry(source: &Path, settings: OpSettings) -> FsResult<()> {
    fs::symlink_metadata(source).at(source)?;
    if settings.move_to_trash {
        return trash::delete(source).map_err(|e| FsError::invalid(source, e.to_string()));
    }
    remove_entry(source, settings.allow_recursive_delete)
}

fn remove_entry(path: &Path, recursive: bool) -> FsResult<()> {
    let meta = fs::symlink_metadata(path).at(path)?;
    if !meta.is_dir() {
        return fs::remove_file(path).at(path);
    }
    if recursive {
        fs::remove_dir_all(path).at(path)
    } else {
        fs::remove_dir(path).at(path)
    }
}

fn discard_partial_copy(dest: &Path) {
    if fs::symlink_metadata(dest).is_ok()
        && let Err(e) = remove_entry(dest, true)
    {
        tracing::warn!(dest = %dest.display(), error = %e, "could not remove partial copy");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error;
    use tempfile::tempdir;

    fn run(op: PendingOperation) -> FsResult<OpOutcome> {
        execute(&op, OpSettings::default())
    }

    #[test]
    fn confirmation_only_for_move_and_delete() {
        let p = PathBuf::from("/tmp/x");
        assert!(PendingOperation::new(OpKind::Move, p.clone()).requires_confirmation());
        assert!(PendingOperation::new(OpKind::Delete, p.clone()).requires_confirmation());
        assert!(!PendingOperation::new(OpKind::Copy, p.clone()).requires_confirmation());
        assert!(!PendingOperation::new(OpKind::Rename, p).requires_confirmation());
    }

    #[test]
    fn copy_file_and_directory() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("a.txt");
        fs::write(&file, "bytes\0here")?;
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("inner"))?;
        fs::write(tree.join("inner/x"), "x")?;

        let out = run(PendingOperation::new(OpKind::Copy, file.clone())
            .with_destination(dir.path().join("b.txt")))?;
        assert_eq!(out.message_key(), "copied");
        assert_eq!(fs::read(dir.path().join("b.txt"))?, fs::read(&file)?);

        run(PendingOperation::new(OpKind::Copy, tree.clone())
            .with_destination(dir.path().join("tree2")))?;
        assert_eq!(fs::read_to_string(dir.path().join("tree2/inner/x"))?, "x");
        assert!(tree.join("inner/x").exists());
        Ok(())
    }

    #[test]
    fn copy_onto_existing_destination_changes_nothing() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "first")?;
        fs::write(&b, "second")?;

        let err = run(PendingOperation::new(OpKind::Copy, a.clone()).with_destination(b.clone()))
            .unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists(ref p) if p == &b));
        assert_eq!(fs::read_to_string(&a)?, "first");
        assert_eq!(fs::read_to_string(&b)?, "second");
        Ok(())
    }

    #[test]
    fn copy_missing_source_is_not_found() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let err = run(PendingOperation::new(OpKind::Copy, dir.path().join("ghost"))
            .with_destination(dir.path().join("copy")))
        .unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
        Ok(())
    }

    #[test]
    fn copy_into_itself_is_rejected() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let tree = dir.path().join("tree");
        fs::create_dir(&tree)?;
        let err = run(PendingOperation::new(OpKind::Copy, tree.clone())
            .with_destination(tree.join("nested")))
        .unwrap_err();
        assert!(matches!(err, FsError::Invalid { .. }));
        assert!(!tree.join("nested").exists());
        Ok(())
    }

    #[test]
    fn move_and_rename() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let sub = dir.path().join("sub");
        fs::create_dir(&sub)?;
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "n")?;

        let renamed = resolve_name(dir.path(), "notes2.txt")?;
        let out = run(PendingOperation::new(OpKind::Rename, notes.clone())
            .with_destination(renamed.clone()))?;
        assert_eq!(out.focus(), Some(OsString::from("notes2.txt")));
        assert!(!notes.exists());

        let dest = resolve_destination(dir.path(), "sub", &renamed);
        assert_eq!(dest, sub.join("notes2.txt"));
        run(PendingOperation::new(OpKind::Move, renamed.clone()).with_destination(dest.clone()))?;
        assert!(!renamed.exists());
        assert_eq!(fs::read_to_string(dest)?, "n");
        Ok(())
    }

    #[test]
    fn move_by_copy_removes_source() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("src");
        fs::create_dir(&src)?;
        fs::write(src.join("f"), "data")?;
        let dest = dir.path().join("dest");

        move_by_copy(&src, &dest)?;
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dest.join("f"))?, "data");
        Ok(())
    }

    #[test]
    fn failed_source_removal_keeps_the_copy() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("src");
        fs::create_dir(&src)?;
        fs::write(src.join("f"), "data")?;
        let dest = dir.path().join("dest");

        let err = move_by_copy_with(&src, &dest, |path| {
            Err(FsError::PermissionDenied(path.to_path_buf()))
        })
        .unwrap_err();

        match &err {
            FsError::PartialMove { src: s, dest: d, reason } => {
                assert_eq!(s, &src);
                assert_eq!(d, &dest);
                assert!(reason.contains("Permission denied"));
            }
            other => panic!("expected PartialMove, got {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains(&src.display().to_string()));
        assert!(message.contains(&dest.display().to_string()));
        assert_eq!(fs::read_to_string(src.join("f"))?, "data");
        assert_eq!(fs::read_to_string(dest.join("f"))?, "data");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn copy_keeps_directory_links_as_links() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let proj = dir.path().join("proj");
        fs::create_dir(&proj)?;
        fs::write(proj.join("a.txt"), "a")?;
        std::os::unix::fs::symlink("..", proj.join("up"))?;

        let dest = dir.path().join("proj2");
        run(PendingOperation::new(OpKind::Copy, proj.clone()).with_destination(dest.clone()))?;

        assert_eq!(fs::read_to_string(dest.join("a.txt"))?, "a");
        let link = dest.join("up");
        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read_link(&link)?, PathBuf::from(".."));
        assert_eq!(fs::read_dir(&dest)?.count(), 2);
        Ok(())
    }

    #[test]
    fn delete_recursive_and_guarded() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("a/b"))?;
        fs::write(tree.join("a/b/c.txt"), "c")?;

        let guarded = OpSettings {
            allow_recursive_delete: false,
            move_to_trash: false,
        };
        let err = execute(&PendingOperation::new(OpKind::Delete, tree.clone()), guarded)
            .unwrap_err();
        assert!(matches!(err, FsError::NotEmpty(_) | FsError::Io { .. }));
        assert!(tree.exists());

        let out = run(PendingOperation::new(OpKind::Delete, tree.clone()))?;
        assert_eq!(out.message_key(), "deleted");
        assert!(out.focus().is_none());
        assert!(!tree.exists());
        Ok(())
    }

    #[test]
    fn create_collisions_are_already_exists() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let file = resolve_name(dir.path(), "new.txt")?;
        let folder = resolve_name(dir.path(), "folder")?;
        let cwd = dir.path().to_path_buf();

        run(PendingOperation::new(OpKind::CreateFile, cwd.clone()).with_destination(file.clone()))?;
        run(PendingOperation::new(OpKind::CreateDirectory, cwd.clone())
            .with_destination(folder.clone()))?;
        assert!(file.is_file());
        assert!(folder.is_dir());

        let err = run(PendingOperation::new(OpKind::CreateFile, cwd.clone()).with_destination(file))
            .unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists(_)));
        let err = run(PendingOperation::new(OpKind::CreateDirectory, cwd).with_destination(folder))
            .unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists(_)));
        Ok(())
    }

    #[test]
    fn names_with_separators_are_rejected() {
        let dir = Path::new("/tmp");
        assert!(resolve_name(dir, "a/b").is_err());
        assert!(resolve_name(dir, "  ").is_err());
        assert!(resolve_name(dir, "..").is_err());
        assert_eq!(resolve_name(dir, " ok.txt ").ok(), Some(dir.join("ok.txt")));
    }
}
