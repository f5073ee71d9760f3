//! tabula CLI
//!
//! A small interactive shell around the in-memory database engine.
//!
//! Statements are executed line by line; `.save <file>`, `.open <file>`
//! and `.quit` are handled by the shell itself.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use tabula_engine::Database;

/// In-memory database shell.
#[derive(Parser)]
#[command(name = "tabula")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database file to open on startup.
    #[arg(short, long)]
    open: Option<PathBuf>,

    /// Execute a single statement and exit.
    #[arg(short, long)]
    execute: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut db = Database::new();
    if let Some(path) = &cli.open {
        if let Err(err) = db.open(path) {
            error!("{err}");
            std::process::exit(1);
        }
    }

    if let Some(statement) = &cli.execute {
        match db.execute(statement) {
            Ok(response) => println!("{response}"),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    repl(&mut db)
}

fn repl(db: &mut Database) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "tabula> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('.') {
            match run_meta_command(db, command) {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(message) => eprintln!("{message}"),
            }
            continue;
        }

        match db.execute(line) {
            Ok(response) => println!("{response}"),
            Err(err) => eprintln!("{err}"),
        }
    }
}

/// Runs a `.command`; returns `Ok(true)` when the shell should exit.
fn run_meta_command(db: &mut Database, command: &str) -> Result<bool, String> {
    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("quit" | "exit") => Ok(true),
        Some("save") => {
            let path = parts.next().ok_or("usage: .save <file>")?;
            db.save(path).map_err(|err| err.to_string())?;
            println!("saved to {path}");
            Ok(false)
        }
        Some("open") => {
            let path = parts.next().ok_or("usage: .open <file>")?;
            db.open(path).map_err(|err| err.to_string())?;
            println!("opened {path}");
            Ok(false)
        }
        Some(other) => Err(format!("unknown command '.{other}'")),
        None => Ok(false),
    }
}
