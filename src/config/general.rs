//! The general configuration settings for kaser.
//!
//! Holds the settings record read by the core: language, theme name,
//! hidden-entry visibility and sort order, plus a few behaviour switches
//! for deletes and saves.

use serde::Deserialize;

/// Sort key for directory listings.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Size,
    Modified,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Size => "size",
            SortBy::Modified => "modified",
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct General {
    language: String,
    theme: String,
    show_hidden: bool,
    sort_by: SortBy,
    dirs_first: bool,
    allow_recursive_delete: bool,
    move_to_trash: bool,
    backup_on_save: bool,
}

impl Default for General {
    fn default() -> Self {
        General {
            language: "en".into(),
            theme: "default".into(),
            show_hidden: false,
            sort_by: SortBy::Name,
            dirs_first: true,
            allow_recursive_delete: true,
            move_to_trash: false,
            backup_on_save: true,
        }
    }
}

impl General {
    #[inline]
    pub fn language(&self) -> &str {
        let lang = self.language.trim();
        if lang.is_empty() { "en" } else { lang }
    }

    #[inline]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    #[inline]
    pub fn dirs_first(&self) -> bool {
        self.dirs_first
    }

    #[inline]
    pub fn allow_recursive_delete(&self) -> bool {
        self.allow_recursive_delete
    }

    #[inline]
    pub fn move_to_trash(&self) -> bool {
        self.move_to_trash
    }

    #[inline]
    pub fn backup_on_save(&self) -> bool {
        self.backup_on_save
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let general: General = toml::from_str(
            r#"
            sort_by = "modified"
            language = "fr"
            "#,
        )?;
        assert_eq!(general.sort_by(), SortBy::Modified);
        assert_eq!(general.language(), "fr");
        assert!(!general.show_hidden());
        assert!(general.dirs_first());
        assert!(general.backup_on_save());
        Ok(())
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let parsed: Result<General, _> = toml::from_str(r#"sort_by = "color""#);
        assert!(parsed.is_err());
    }
}
