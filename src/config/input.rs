//! Key binding options for the browsing view of kaser.
//!
//! Read from the `[keys]` section of kaser.toml. Each action takes a list of key
//! names such as `"up"`, `"esc"`, `"d"` or `"ctrl+r"`.

use serde::Deserialize;

/// Key lists for every browse action.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Keys {
    go_up: Vec<String>,
    go_down: Vec<String>,
    open: Vec<String>,
    quit: Vec<String>,
    go_home: Vec<String>,
    view: Vec<String>,
    copy: Vec<String>,
    move_file: Vec<String>,
    delete: Vec<String>,
    rename: Vec<String>,
    create: Vec<String>,
    create_directory: Vec<String>,
    toggle_filter: Vec<String>,
    choose_filter: Vec<String>,
    keybind_help: Vec<String>,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    go_up,
    go_down,
    open,
    quit,
    go_home,
    view,
    copy,
    move_file,
    delete,
    rename,
    create,
    create_directory,
    toggle_filter,
    choose_filter,
    keybind_help,
);

impl Default for Keys {
    fn default() -> Self {
        Keys {
            go_up: vec!["Up".into(), "k".into()],
            go_down: vec!["Down".into(), "j".into()],
            open: vec!["Enter".into()],
            quit: vec!["Esc".into()],
            go_home: vec!["h".into()],
            view: vec!["v".into()],
            copy: vec!["c".into()],
            move_file: vec!["m".into()],
            delete: vec!["d".into()],
            rename: vec!["r".into()],
            create: vec!["n".into()],
            create_directory: vec!["g".into()],
            toggle_filter: vec!["f".into()],
            choose_filter: vec!["/".into()],
            keybind_help: vec!["?".into()],
        }
    }
}
