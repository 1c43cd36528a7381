//! Helpers for kaser.
//!
//! Provides utility functions:
//! - Color parsing from strings or hex codes
//! - Recursive copying for the file operations
//! - Home directory lookup, `~` expansion and shortening for display
//!
//! These helpers are used throughout kaser.

use crate::core::error::{FsResult, IoResultExt};

use ratatui::style::Color;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Parses a string (color name or hex) into a ratatui::style::Color
///
/// Supports standard names (red, green, etc.) as well as hex values (#RRGGBB or #RGB)
pub fn parse_color(s: &str) -> Color {
    match s.trim().to_lowercase().as_str() {
        "default" | "reset" => Color::Reset,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        "blue" => Color::Blue,
        "green" => Color::Green,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "black" => Color::Black,
        "gray" => Color::Gray,
        "darkgray" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightblue" => Color::LightBlue,
        hex => {
            let Some(digits) = hex.strip_prefix('#') else {
                return Color::Reset;
            };
            let expanded = match digits.len() {
                6 => digits.to_string(),
                3 => digits.chars().flat_map(|c| [c, c]).collect(),
                _ => return Color::Reset,
            };
            match u32::from_str_radix(&expanded, 16) {
                Ok(rgb) => Color::Rgb(
                    ((rgb >> 16) & 0xFF) as u8,
                    ((rgb >> 8) & 0xFF) as u8,
                    (rgb & 0xFF) as u8,
                ),
                Err(_) => Color::Reset,
            }
        }
    }
}

/// Recursively copies files and directories from `src` to `dest`.
///
/// Directories are recreated at `dest` and their contents copied entry by entry.
/// Symlinks are recreated as links, never followed. Errors name the path that failed.
pub fn copy_recursive(src: &Path, dest: &Path) -> FsResult<()> {
    let file_type = fs::symlink_metadata(src).at(src)?.file_type();
    if file_type.is_symlink() {
        copy_symlink(src, dest)
    } else if file_type.is_dir() {
        fs::create_dir_all(dest).at(dest)?;
        for entry in fs::read_dir(src).at(src)? {
            let entry = entry.at(src)?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(src, dest).at(src).map(|_| ())
    }
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> FsResult<()> {
    let target = fs::read_link(src).at(src)?;
    std::os::unix::fs::symlink(target, dest).at(dest)
}

#[cfg(windows)]
fn copy_symlink(src: &Path, dest: &Path) -> FsResult<()> {
    let target = fs::read_link(src).at(src)?;
    let resolved = src.parent().map(|p| p.join(&target)).unwrap_or_else(|| target.clone());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, dest).at(dest)
    } else {
        std::os::windows::fs::symlink_file(target, dest).at(dest)
    }
}

pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(input: &str) -> PathBuf {
    let home = get_home();
    match (input, home) {
        ("~", Some(home)) => home,
        (s, Some(home)) if s.starts_with("~/") || s.starts_with("~\\") => home.join(&s[2..]),
        (s, _) => PathBuf::from(s),
    }
}

/// Util function to shorten home directory to ~.
/// Used by the path header in the browser view.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = get_home()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        let mut short = stripped.display().to_string();
        if short.starts_with(MAIN_SEPARATOR) {
            short.remove(0);
        }
        return format!("~{}{}", MAIN_SEPARATOR, short);
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error;
    use tempfile::tempdir;

    #[test]
    fn colors_from_names_and_hex() {
        assert_eq!(parse_color("Cyan"), Color::Cyan);
        assert_eq!(parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(parse_color("#0f0"), Color::Rgb(0, 255, 0));
        assert_eq!(parse_color("#12"), Color::Reset);
        assert_eq!(parse_color("not-a-color"), Color::Reset);
    }

    #[test]
    fn copy_recursive_copies_nested_tree() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("a/b"))?;
        fs::write(src.join("top.txt"), "top")?;
        fs::write(src.join("a/b/deep.txt"), "deep")?;

        let dest = dir.path().join("dest");
        copy_recursive(&src, &dest)?;
        assert_eq!(fs::read_to_string(dest.join("top.txt"))?, "top");
        assert_eq!(fs::read_to_string(dest.join("a/b/deep.txt"))?, "deep");
        Ok(())
    }

    #[test]
    fn home_expansion_and_shortening() -> Result<(), Box<dyn error::Error>> {
        let Some(home) = get_home() else {
            return Ok(());
        };
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("~/notes"), home.join("notes"));
        assert_eq!(expand_home("rel/path"), PathBuf::from("rel/path"));

        assert_eq!(shorten_home_path(&home), "~");
        let short = shorten_home_path(home.join("docs"));
        assert_eq!(short, format!("~{}docs", MAIN_SEPARATOR));
        Ok(())
    }
}
