//! Translation lookup for kaser's display strings.
//!
//! Two catalogs implement [Translate]: [FileCatalog] reads `translations.toml`
//! from the config directory, [BuiltinCatalog] is compiled in. [Translator::select]
//! picks one at startup; the rest of the program only ever calls [Translator::t].
//!
//! Lookups never fail: the requested language is tried first, then English, then
//! the key itself is returned.

use phf::phf_map;
use serde::Deserialize;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub trait Translate {
    fn lookup<'a>(&'a self, key: &'a str, language: &str) -> Cow<'a, str>;
}

static EN: phf::Map<&'static str, &'static str> = phf_map! {
    "current_directory" => "Current directory",
    "entries" => "entries",
    "empty_directory" => "Empty directory",
    "confirm_delete" => "Delete",
    "confirm_move" => "Move",
    "yes_no" => "[y/N]",
    "prompt_copy_to" => "Copy to",
    "prompt_move_to" => "Move to",
    "prompt_rename" => "Rename to",
    "prompt_new_file" => "New file name",
    "prompt_new_folder" => "New folder name",
    "prompt_filter" => "Filter: 1 files, 2 folders, 3 text, 4 images, 5 archives, 6 executables, or text",
    "prompt_search" => "Search",
    "filter_applied" => "Filter applied",
    "filter_cleared" => "Filter cleared",
    "copied" => "Copied",
    "moved" => "Moved",
    "deleted" => "Deleted",
    "trashed" => "Moved to trash",
    "renamed" => "Renamed",
    "created_file" => "Created file",
    "created_folder" => "Created folder",
    "cancelled" => "Cancelled",
    "saved" => "Saved",
    "save_failed" => "Save failed",
    "discarded" => "Changes discarded",
    "discard_changes" => "Discard unsaved changes?",
    "no_matches" => "No matches",
    "modified" => "modified",
    "line" => "line",
    "page" => "page",
    "help_title" => "Key bindings",
    "viewer_help" => "Q/Esc back  E edit  / search  N/P next/prev  PgUp/PgDn page",
    "editor_help" => "Ctrl+S save  Ctrl+D discard  Esc close  Ins overwrite",
    "overwrite" => "OVR",
    "insert" => "INS",
};

static FR: phf::Map<&'static str, &'static str> = phf_map! {
    "current_directory" => "Répertoire actuel",
    "entries" => "éléments",
    "empty_directory" => "Répertoire vide",
    "confirm_delete" => "Supprimer",
    "confirm_move" => "Déplacer",
    "yes_no" => "[o/N]",
    "prompt_copy_to" => "Copier vers",
    "prompt_move_to" => "Déplacer vers",
    "prompt_rename" => "Renommer en",
    "prompt_new_file" => "Nom du nouveau fichier",
    "prompt_new_folder" => "Nom du nouveau dossier",
    "prompt_search" => "Rechercher",
    "filter_applied" => "Filtre appliqué",
    "filter_cleared" => "Filtre effacé",
    "copied" => "Copié",
    "moved" => "Déplacé",
    "deleted" => "Supprimé",
    "trashed" => "Mis à la corbeille",
    "renamed" => "Renommé",
    "created_file" => "Fichier créé",
    "created_folder" => "Dossier créé",
    "cancelled" => "Annulé",
    "saved" => "Enregistré",
    "save_failed" => "Échec de l'enregistrement",
    "discarded" => "Modifications abandonnées",
    "discard_changes" => "Abandonner les modifications ?",
    "no_matches" => "Aucun résultat",
    "help_title" => "Raccourcis clavier",
};

static ES: phf::Map<&'static str, &'static str> = phf_map! {
    "current_directory" => "Directorio actual",
    "entries" => "elementos",
    "empty_directory" => "Directorio vacío",
    "confirm_delete" => "Eliminar",
    "confirm_move" => "Mover",
    "yes_no" => "[s/N]",
    "prompt_copy_to" => "Copiar a",
    "prompt_move_to" => "Mover a",
    "prompt_rename" => "Renombrar a",
    "prompt_new_file" => "Nombre del archivo nuevo",
    "prompt_new_folder" => "Nombre de la carpeta nueva",
    "prompt_search" => "Buscar",
    "filter_applied" => "Filtro aplicado",
    "filter_cleared" => "Filtro borrado",
    "copied" => "Copiado",
    "moved" => "Movido",
    "deleted" => "Eliminado",
    "trashed" => "Enviado a la papelera",
    "renamed" => "Renombrado",
    "created_file" => "Archivo creado",
    "created_folder" => "Carpeta creada",
    "cancelled" => "Cancelado",
    "saved" => "Guardado",
    "save_failed" => "Error al guardar",
    "discarded" => "Cambios descartados",
    "discard_changes" => "¿Descartar los cambios?",
    "no_matches" => "Sin coincidencias",
    "help_title" => "Atajos de teclado",
};

static DE: phf::Map<&'static str, &'static str> = phf_map! {
    "current_directory" => "Aktuelles Verzeichnis",
    "entries" => "Einträge",
    "empty_directory" => "Leeres Verzeichnis",
    "confirm_delete" => "Löschen",
    "confirm_move" => "Verschieben",
    "yes_no" => "[j/N]",
    "prompt_copy_to" => "Kopieren nach",
    "prompt_move_to" => "Verschieben nach",
    "prompt_rename" => "Umbenennen in",
    "prompt_new_file" => "Name der neuen Datei",
    "prompt_new_folder" => "Name des neuen Ordners",
    "prompt_search" => "Suchen",
    "filter_applied" => "Filter angewendet",
    "filter_cleared" => "Filter entfernt",
    "copied" => "Kopiert",
    "moved" => "Verschoben",
    "deleted" => "Gelöscht",
    "trashed" => "In den Papierkorb verschoben",
    "renamed" => "Umbenannt",
    "created_file" => "Datei erstellt",
    "created_folder" => "Ordner erstellt",
    "cancelled" => "Abgebrochen",
    "saved" => "Gespeichert",
    "save_failed" => "Speichern fehlgeschlagen",
    "discarded" => "Änderungen verworfen",
    "discard_changes" => "Ungespeicherte Änderungen verwerfen?",
    "no_matches" => "Keine Treffer",
    "help_title" => "Tastenbelegung",
};

/// Compiled-in catalog for en, fr, es and de.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    fn table(language: &str) -> Option<&'static phf::Map<&'static str, &'static str>> {
        match language {
            "en" => Some(&EN),
            "fr" => Some(&FR),
            "es" => Some(&ES),
            "de" => Some(&DE),
            _ => None,
        }
    }

    fn get(key: &str, language: &str) -> Option<&'static str> {
        Self::table(language).and_then(|t| t.get(key).copied())
    }
}

impl Translate for BuiltinCatalog {
    fn lookup<'a>(&'a self, key: &'a str, language: &str) -> Cow<'a, str> {
        Self::get(key, language)
            .or_else(|| Self::get(key, "en"))
            .map(Cow::Borrowed)
            .unwrap_or(Cow::Borrowed(key))
    }
}

/// Catalog read from `translations.toml`, one table per language:
///
/// ```toml
/// [it]
/// copied = "Copiato"
/// ```
///
/// Keys missing from the file fall through to the builtin tables.
#[derive(Deserialize, Debug, Default)]
#[serde(transparent)]
pub struct FileCatalog {
    languages: HashMap<String, HashMap<String, String>>,
}

impl FileCatalog {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn get(&self, key: &str, language: &str) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|t| t.get(key))
            .map(String::as_str)
    }
}

impl Translate for FileCatalog {
    fn lookup<'a>(&'a self, key: &'a str, language: &str) -> Cow<'a, str> {
        if let Some(s) = self.get(key, language) {
            return Cow::Borrowed(s);
        }
        if let Some(s) = BuiltinCatalog::get(key, language) {
            return Cow::Borrowed(s);
        }
        if let Some(s) = self.get(key, "en") {
            return Cow::Borrowed(s);
        }
        BuiltinCatalog.lookup(key, "en")
    }
}

/// Language bound lookup handed to the engine and the ui.
pub struct Translator {
    catalog: Box<dyn Translate>,
    language: String,
}

impl Translator {
    pub fn new(catalog: Box<dyn Translate>, language: &str) -> Self {
        Self {
            catalog,
            language: language.to_string(),
        }
    }

    /// Uses `translations.toml` from `config_dir` when it can be read and parsed,
    /// the builtin catalog otherwise.
    pub fn select(config_dir: Option<&Path>, language: &str) -> Self {
        let file = config_dir
            .map(|d| d.join("translations.toml"))
            .and_then(|p| fs::read_to_string(&p).ok().map(|c| (p, c)));

        if let Some((path, content)) = file {
            match FileCatalog::from_toml(&content) {
                Ok(catalog) => {
                    tracing::debug!(path = %path.display(), "using translation file");
                    return Self::new(Box::new(catalog), language);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "translation file rejected");
                }
            }
        }
        Self::new(Box::new(BuiltinCatalog), language)
    }

    #[inline]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[inline]
    pub fn t<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        self.catalog.lookup(key, &self.language)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Box::new(BuiltinCatalog), "en")
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
