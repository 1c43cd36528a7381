//! Command-line argument parsing and help for kaser.
//!
//! When invoked without arguments kaser opens the browser in the working directory.

use crate::app::keymap::Keymap;
use crate::config::Config;

#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    RunApp,
    RunAppAtPath(String),
    Exit,
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

pub fn parse_args(args: &[String]) -> CliAction {
    let Some(first) = args.first() else {
        return CliAction::RunApp;
    };

    if args.len() > 1 {
        eprintln!("[kaser] Error: only one argument is accepted.");
        eprintln!("Usage: kaser [PATH] or kaser [OPTION]");
        return CliAction::Exit;
    }

    match first.as_str() {
        "--version" | "-v" => {
            println!("kaser {}", env!("CARGO_PKG_VERSION"));
            CliAction::Exit
        }
        "-h" | "--help" => {
            print_help();
            CliAction::Exit
        }
        "--keybinds" => {
            print_keybinds(&Config::load());
            CliAction::Exit
        }
        "--init" => {
            let path = Config::default_path();
            match Config::generate_default(&path) {
                Ok(()) => println!("Default config generated at {}", path.display()),
                Err(e) => eprintln!("[kaser] Error: {}: {}", path.display(), e),
            }
            CliAction::Exit
        }
        arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
            CliAction::RunAppAtPath(arg.to_string())
        }
        arg => {
            eprintln!("Unknown argument: {}", arg);
            eprintln!("Try --help for available options");
            CliAction::Exit
        }
    }
}

fn print_help() {
    println!(
        r#"kaser - a keyboard driven console file browser

USAGE:
  kaser [PATH]

PATH:
  Directory to open (defaults to the current directory)

OPTIONS:
      --init              Write a default kaser.toml
      --keybinds          Print the active key bindings
  -h, --help              Print help information
  -v, --version           Print the version

ENVIRONMENT:
  KASER_CONFIG            Override the config file path
  KASER_LOG               Enable logging with a filter, e.g. "kaser_fm=debug"
  NO_COLOR                Use the plain renderer
"#
    );
}

fn print_keybinds(config: &Config) {
    println!("[keys]");
    for (action, keys) in Keymap::from_keys(config.keys()).bindings() {
        let labels: Vec<String> = keys.iter().map(|k| k.label()).collect();
        println!("  {:<30} {}", action.describe(), labels.join(", "));
    }
    println!();
    println!("Viewer: Up/Down scroll, Left/Right or PgUp/PgDn page, Home/End, / search, N/P match, E edit, Q/Esc back");
    println!("Editor: Ctrl+S save, Ctrl+D discard, Ctrl+K delete line, Ins overwrite, Esc close");
}
