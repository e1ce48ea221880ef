// algotrace: step-by-step algorithm tracer with time-travel playback

use std::fs::File;
use std::io;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use algotrace::cli::{self, Cli};
use algotrace::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    // stderr belongs to the TUI, so logs only go to a file when asked for
    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let request = match args.command.request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    tracing::info!(?request, "input parsed");

    if args.print {
        let trace = request.run();
        print!("{}", cli::dump(&trace, request.pseudocode()));
        if let Some(error) = trace.rejection() {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let pseudocode = request.pseudocode();
    let mut app = App::new(pseudocode, args.speed, Box::new(move || request.run()));
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
