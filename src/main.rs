mod app;
mod clipboard;
mod config;
mod editor;
mod error;
mod event;
mod list;
mod logging;
mod markup;
mod note;
mod panel;
mod storage;
mod store;
mod ui;

use std::env;
use std::io;

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use app::App;
use clipboard::Clipboard;
use config::{Config, Theme};
use storage::FileStorage;
use store::NoteStore;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("inkpad {}", VERSION);
    println!("A small terminal notepad with bold, italic and underline");
    println!();
    println!("USAGE:");
    println!("    inkpad [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version information");
    println!("    -c, --config     Print config file path");
    println!("    -d, --dir        Print data directory path");
    println!();
    println!("ENVIRONMENT:");
    println!("    {:<16} Log filter, e.g. inkpad=debug", logging::LOG_ENV);
}

fn main() -> io::Result<()> {
    // Handle CLI arguments
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "-v" | "--version" => {
                println!("inkpad {}", VERSION);
                return Ok(());
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-c" | "--config" => {
                println!("{}", Config::config_path().display());
                return Ok(());
            }
            "-d" | "--dir" => {
                let config = Config::load();
                println!("{}", config.data_path().display());
                return Ok(());
            }
            _ => {
                eprintln!("Unknown option: {}", args[1]);
                eprintln!("Run 'inkpad --help' for usage information");
                return Ok(());
            }
        }
    }

    let config = Config::load_or_create();
    let data_path = config.data_path();
    logging::init(&data_path, &config.log_level);
    info!(version = VERSION, data = %data_path.display(), "starting inkpad");

    let theme = Theme::from_name(&config.theme);
    let store = NoteStore::initialize(Box::new(FileStorage::new(&data_path)));
    let mut app = App::new(config, theme, store, Clipboard::new());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = event::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(%err, "event loop failed");
        eprintln!("Error: {err:?}");
    }
    info!("inkpad exited");

    Ok(())
}
