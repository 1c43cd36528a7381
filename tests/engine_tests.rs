//! End-to-end engine scenarios.
//!
//! Each test builds an [AppState] over a temp directory, drives it with logical
//! key presses and checks both the engine state and the files on disk.

use kaser_fm::app::{AppState, EngineMode, Key, View};
use kaser_fm::config::{Config, Translator};
use kaser_fm::core::{Document, PlainRenderer};

use rand::Rng;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn engine<'a>(config: &'a Config, dir: &Path) -> Result<AppState<'a>, Box<dyn Error>> {
    Ok(AppState::new(
        config,
        dir,
        Translator::default(),
        Box::new(PlainRenderer),
    )?)
}

fn press(app: &mut AppState, keys: &[Key]) {
    for key in keys {
        app.handle_key(*key);
    }
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        app.handle_key(Key::Char(c));
    }
}

fn selected_name(app: &AppState) -> Option<String> {
    app.nav().selected_entry().map(|e| e.name_str().into_owned())
}

/// docs/ and notes.txt in a fresh directory.
fn sample_tree() -> Result<tempfile::TempDir, Box<dyn Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("docs"))?;
    fs::write(dir.path().join("docs").join("inner.md"), "# inner\n")?;
    fs::write(dir.path().join("notes.txt"), "hello\n")?;
    Ok(dir)
}

#[test]
fn listing_has_parent_and_root_rows() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let app = engine(&config, dir.path())?;

    assert_eq!(app.nav().len(), 2 + 2);
    assert_eq!(app.nav().selected_idx(), 0);
    assert_eq!(app.mode(), EngineMode::Browsing);
    Ok(())
}

#[test]
fn open_descends_and_parent_reselects() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Down, Key::Down]);
    assert_eq!(selected_name(&app).as_deref(), Some("docs"));
    press(&mut app, &[Key::Enter]);
    assert_eq!(app.nav().current_dir(), dir.path().join("docs"));
    assert_eq!(app.nav().selected_idx(), 0);
    assert_eq!(app.nav().len(), 2 + 1);

    // Row 0 is "..".
    press(&mut app, &[Key::Enter]);
    assert_eq!(app.nav().current_dir(), dir.path());
    assert_eq!(selected_name(&app).as_deref(), Some("docs"));
    Ok(())
}

/// Restores the process working directory when dropped.
struct CwdGuard(PathBuf);

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[cfg(unix)]
#[test]
fn relative_start_path_can_leave() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let docs = fs::canonicalize(dir.path().join("docs"))?;
    let _guard = CwdGuard(std::env::current_dir()?);
    std::env::set_current_dir(&docs)?;

    let config = Config::default();
    let mut app = engine(&config, Path::new("."))?;
    assert_eq!(app.nav().current_dir(), docs);

    press(&mut app, &[Key::Enter]);
    assert_eq!(app.nav().current_dir(), fs::canonicalize(dir.path())?);
    assert_eq!(selected_name(&app).as_deref(), Some("docs"));

    press(&mut app, &[Key::Up, Key::Up, Key::Down, Key::Enter]);
    assert_eq!(app.nav().current_dir(), Path::new("/"));
    assert_eq!(app.nav().selected_idx(), 0);
    Ok(())
}

#[test]
fn root_row_jumps_to_filesystem_root() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, &dir.path().join("docs"))?;

    press(&mut app, &[Key::Down, Key::Enter]);
    let root = dir.path().ancestors().last().ok_or("no root")?;
    assert_eq!(app.nav().current_dir(), root);
    assert_eq!(app.mode(), EngineMode::Browsing);
    Ok(())
}

#[test]
fn home_key_opens_home_directory() -> Result<(), Box<dyn Error>> {
    let Some(home) = kaser_fm::utils::get_home().filter(|h| h.is_dir()) else {
        return Ok(());
    };
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Char('h')]);
    assert_eq!(app.nav().current_dir(), home);
    assert_eq!(app.nav().selected_idx(), 0);
    Ok(())
}

#[test]
fn cursor_clamps_at_both_ends() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Up, Key::Up]);
    assert_eq!(app.nav().selected_idx(), 0);
    press(&mut app, &[Key::Down; 10]);
    assert_eq!(app.nav().selected_idx(), app.nav().len() - 1);
    assert_eq!(selected_name(&app).as_deref(), Some("notes.txt"));
    Ok(())
}

#[test]
fn random_walk_keeps_cursor_in_range() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    for i in 0..25 {
        fs::write(dir.path().join(format!("file{i:02}.txt")), "x")?;
    }
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    let mut rng = rand::rng();
    for _ in 0..500 {
        let key = if rng.random_bool(0.5) { Key::Up } else { Key::Down };
        app.handle_key(key);
        assert!(app.nav().selected_idx() < app.nav().len());
    }
    Ok(())
}

#[test]
fn rename_selects_new_name() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Down, Key::Down, Key::Down, Key::Char('r')]);
    assert_eq!(app.mode(), EngineMode::AwaitingTextInput);
    assert_eq!(app.actions().input_buffer(), "notes.txt");

    press(&mut app, &[Key::Backspace; 4]);
    type_text(&mut app, "2.txt");
    press(&mut app, &[Key::Enter]);

    assert!(!dir.path().join("notes.txt").exists());
    assert_eq!(fs::read_to_string(dir.path().join("notes2.txt"))?, "hello\n");
    assert_eq!(selected_name(&app).as_deref(), Some("notes2.txt"));
    assert_eq!(app.status_message(), Some("Renamed: notes2.txt"));
    Ok(())
}

#[test]
fn delete_directory_after_confirmation() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Down, Key::Down, Key::Char('d')]);
    assert_eq!(app.mode(), EngineMode::ConfirmingDestructiveOp);
    press(&mut app, &[Key::Char('y')]);

    assert!(!dir.path().join("docs").exists());
    assert_eq!(app.mode(), EngineMode::Browsing);
    assert_eq!(app.nav().len(), 2 + 1);
    Ok(())
}

#[test]
fn any_other_key_cancels_delete() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Down, Key::Down, Key::Char('d'), Key::Enter]);
    assert!(dir.path().join("docs").join("inner.md").exists());
    assert_eq!(app.status_message(), Some("Cancelled"));
    Ok(())
}

#[test]
fn copy_onto_existing_file_fails_without_changes() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    fs::write(dir.path().join("other.txt"), "other\n")?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    // docs, notes.txt, other.txt
    press(&mut app, &[Key::Down, Key::Down, Key::Down, Key::Char('c')]);
    type_text(&mut app, "other.txt");
    press(&mut app, &[Key::Enter]);

    assert_eq!(fs::read_to_string(dir.path().join("notes.txt"))?, "hello\n");
    assert_eq!(fs::read_to_string(dir.path().join("other.txt"))?, "other\n");
    let message = app.status_message().ok_or("no message")?;
    assert!(message.contains("Already exists"), "got {message}");
    assert_eq!(app.overlays().message().map(|(_, err)| err), Some(true));
    Ok(())
}

#[test]
fn copy_into_directory_keeps_name() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Down, Key::Down, Key::Down, Key::Char('c')]);
    type_text(&mut app, "docs");
    press(&mut app, &[Key::Enter]);

    assert!(dir.path().join("notes.txt").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("docs").join("notes.txt"))?,
        "hello\n"
    );
    Ok(())
}

#[test]
fn move_confirms_then_asks_for_destination() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Down, Key::Down, Key::Down, Key::Char('m')]);
    assert_eq!(app.mode(), EngineMode::ConfirmingDestructiveOp);
    press(&mut app, &[Key::Char('y')]);
    assert_eq!(app.mode(), EngineMode::AwaitingTextInput);
    type_text(&mut app, "docs");
    press(&mut app, &[Key::Enter]);

    assert!(!dir.path().join("notes.txt").exists());
    assert!(dir.path().join("docs").join("notes.txt").exists());
    Ok(())
}

#[test]
fn create_file_and_folder() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Char('n')]);
    type_text(&mut app, "todo.md");
    press(&mut app, &[Key::Enter]);
    assert!(dir.path().join("todo.md").is_file());
    assert_eq!(selected_name(&app).as_deref(), Some("todo.md"));

    press(&mut app, &[Key::Char('g')]);
    type_text(&mut app, "archive");
    press(&mut app, &[Key::Enter]);
    assert!(dir.path().join("archive").is_dir());

    press(&mut app, &[Key::Char('n')]);
    type_text(&mut app, "todo.md");
    press(&mut app, &[Key::Enter]);
    assert_eq!(app.overlays().message().map(|(_, err)| err), Some(true));
    Ok(())
}

#[test]
fn filter_toggle_restores_listing() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;
    let full = app.nav().len();

    // No filter yet, so F opens the prompt. 1 = files only.
    press(&mut app, &[Key::Char('f')]);
    assert_eq!(app.mode(), EngineMode::AwaitingTextInput);
    press(&mut app, &[Key::Char('1'), Key::Enter]);
    assert!(app.nav().filter_active());
    assert_eq!(app.nav().len(), 2 + 1);

    press(&mut app, &[Key::Char('f')]);
    assert!(!app.nav().filter_active());
    assert_eq!(app.nav().len(), full);

    press(&mut app, &[Key::Char('f')]);
    assert!(app.nav().filter_active());
    assert_eq!(app.nav().len(), 2 + 1);
    Ok(())
}

#[test]
fn view_then_edit_then_save() -> Result<(), Box<dyn Error>> {
    let dir = sample_tree()?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Down, Key::Down, Key::Down, Key::Char('v')]);
    assert!(matches!(app.view(), View::Viewer(_)));
    press(&mut app, &[Key::Char('e')]);
    assert_eq!(app.mode(), EngineMode::Editing);

    press(&mut app, &[Key::End]);
    type_text(&mut app, " world");
    press(&mut app, &[Key::Ctrl('s'), Key::Esc]);

    assert_eq!(app.mode(), EngineMode::Browsing);
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt"))?,
        "hello world\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt.bak"))?,
        "hello\n"
    );
    assert_eq!(app.status_message(), Some("Saved"));

    let doc = Document::open(&dir.path().join("notes.txt"), &PlainRenderer)?;
    let text: Vec<String> = doc.lines().iter().map(|l| l.text()).collect();
    assert_eq!(text, ["hello world"]);
    Ok(())
}

#[test]
fn binary_file_is_not_viewable() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("blob.bin"), [0x00, 0x01, 0x80, 0x81, 0x00])?;
    let config = Config::default();
    let mut app = engine(&config, dir.path())?;

    press(&mut app, &[Key::Down, Key::Down, Key::Enter]);
    assert_eq!(app.mode(), EngineMode::Browsing);
    assert_eq!(app.overlays().message().map(|(_, err)| err), Some(true));
    Ok(())
}
