//! Configuration for kaser.
//!
//! - [load]: reading `kaser.toml` into [Config], plus `--init` generation.
//! - [general]: the settings record (language, theme, hidden entries, sort order).
//! - [input]: key bindings for the browsing view.
//! - [theme]: named palettes and per-color overrides.
//! - [i18n]: translation lookup with file and builtin catalogs.

pub mod general;
pub mod i18n;
pub mod input;
pub mod load;
pub mod theme;

pub use general::{General, SortBy};
pub use i18n::{BuiltinCatalog, FileCatalog, Translate, Translator};
pub use input::Keys;
pub use load::Config;
pub use theme::{Theme, ThemeOverrides};
