//! main.rs
//! Entry point for kaser

use kaser_fm::app::AppState;
use kaser_fm::config::{Config, Translator};
use kaser_fm::core::{select_renderer, terminal};
use kaser_fm::utils::cli::{CliAction, handle_args};
use kaser_fm::utils::{expand_home, get_home, logging};

use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[kaser] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let action = handle_args();
    let start = match action {
        CliAction::Exit => return Ok(()),
        CliAction::RunApp => std::env::current_dir()
            .ok()
            .or_else(get_home)
            .unwrap_or_else(|| PathBuf::from(".")),
        CliAction::RunAppAtPath(path_arg) => {
            let target = expand_home(&path_arg);
            if !target.is_dir() {
                eprintln!("[kaser] Error: Path '{}' is not a directory.", path_arg);
                std::process::exit(1);
            }
            target
        }
    };

    let _log_guard = logging::init();
    let config = Config::load();
    let translator =
        Translator::select(config.config_dir().as_deref(), config.general().language());
    let renderer = select_renderer(config.theme());

    let mut app = match AppState::new(&config, &start, translator, renderer) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, start = %start.display(), "cannot open start directory");
            eprintln!("[kaser] Error: {}: {}", start.display(), e);
            std::process::exit(1);
        }
    };
    let result = terminal::run_terminal(&mut app);
    tracing::info!("kaser exiting");
    result
}
