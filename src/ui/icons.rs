//! Icon lookup for listing rows.
//!
//! [icon_for] is a pure function of the entry kind and name. Special file and
//! directory names win over the extension table.

use crate::core::fm::EntryKind;

use phf::phf_map;

static EXT_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "rs" => "🦀",
    "py" => "🐍",
    "js" => "📜",
    "ts" => "📜",
    "go" => "🐹",
    "java" => "☕",
    "c" => "🔧",
    "h" => "🔧",
    "cpp" => "🔧",
    "hpp" => "🔧",
    "sh" => "💻",
    "bat" => "💻",
    "ps1" => "💻",
    "cmd" => "💻",
    "md" => "📝",
    "txt" => "📝",
    "rtf" => "📝",
    "log" => "📋",
    "csv" => "📊",
    "json" => "🔣",
    "xml" => "🔣",
    "yml" => "⚙️",
    "yaml" => "⚙️",
    "toml" => "⚙️",
    "ini" => "⚙️",
    "cfg" => "⚙️",
    "conf" => "⚙️",
    "html" => "🌐",
    "css" => "🎨",
    "sql" => "🗃️",
    "jpg" => "🖼️",
    "jpeg" => "🖼️",
    "png" => "🖼️",
    "gif" => "🖼️",
    "bmp" => "🖼️",
    "tiff" => "🖼️",
    "svg" => "🖼️",
    "ico" => "🖼️",
    "webp" => "🖼️",
    "mp3" => "🎵",
    "wav" => "🎵",
    "flac" => "🎵",
    "mp4" => "🎬",
    "mkv" => "🎬",
    "avi" => "🎬",
    "pdf" => "📕",
    "zip" => "📦",
    "rar" => "📦",
    "7z" => "📦",
    "tar" => "📦",
    "gz" => "📦",
    "bz2" => "📦",
    "xz" => "📦",
    "exe" => "⚡",
    "msi" => "⚡",
    "deb" => "⚡",
    "rpm" => "⚡",
    "dmg" => "⚡",
    "app" => "⚡",
    "lock" => "🔒",
};

static SPECIAL_FILE_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "README" => "📖",
    "README.md" => "📖",
    "LICENSE" => "⚖️",
    "COPYING" => "⚖️",
    "Makefile" => "🛠️",
    "Dockerfile" => "🐳",
    "Cargo.toml" => "🦀",
    ".gitignore" => "🙈",
    ".env" => "🔑",
};

static SPECIAL_DIR_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    ".git" => "🌱",
    "node_modules" => "📚",
    "src" => "🧩",
    "docs" => "📚",
    "Downloads" => "📥",
    "Music" => "🎵",
    "Pictures" => "🖼️",
    "Videos" => "🎬",
};

/// Icon shown in front of an entry.
pub fn icon_for(kind: EntryKind, name: &str) -> &'static str {
    match kind {
        EntryKind::Directory => SPECIAL_DIR_ICON_MAP.get(name).copied().unwrap_or("📁"),
        EntryKind::Symlink => "🔗",
        EntryKind::Other => "❔",
        EntryKind::File => {
            if let Some(icon) = SPECIAL_FILE_ICON_MAP.get(name) {
                return icon;
            }
            match name.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => EXT_ICON_MAP
                    .get(ext.to_ascii_lowercase().as_str())
                    .copied()
                    .unwrap_or("📄"),
                _ => "📄",
            }
        }
    }
}
