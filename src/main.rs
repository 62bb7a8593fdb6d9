use kindle_clippings::config::{Command, Config};
use kindle_clippings::Session;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    let input = config.resolve_input().unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to locate clippings");
        std::process::exit(1);
    });

    let text = fs::read_to_string(&input).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?input, "failed to read clippings");
        std::process::exit(1);
    });

    let mut session = Session::new();
    if let Err(e) = session.load_file(&input, &text) {
        tracing::error!(error = %e, path = ?input, "Invalid JSON file. Please provide a valid clippings JSON export");
        std::process::exit(1);
    }

    if let Err(e) = run(&mut session, &config) {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

fn run(session: &mut Session, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match &config.command {
        Command::Books => {
            println!("{} books", session.library().len());
            for book in &session.library().books {
                println!("{:>5}  {}", book.count(), book.title);
            }
        }
        Command::Show { book, index } => {
            if let Some(title) = book {
                session.select_book(title)?;
            }
            session.go_to(*index);
            print_current(session);
        }
        Command::Export => write_export(session, &config.output_path)?,
        Command::Delete { book, index } => {
            session.select_clipping(book, *index)?;
            session.delete_current()?;
            write_export(session, &config.output_path)?;
        }
        Command::Note { book, index, text } => {
            session.select_clipping(book, *index)?;
            session.set_current_note(text)?;
            write_export(session, &config.output_path)?;
        }
    }
    Ok(())
}

fn print_current(session: &Session) {
    let (Some(book), Some((position, total))) = (session.current_book(), session.position())
    else {
        println!("No clippings loaded");
        return;
    };

    println!("{}", book.title);
    println!("Clipping {} of {}", position, total);

    let Some(clipping) = session.current() else {
        return;
    };
    println!("{}", clipping.metadata);
    println!();
    println!("{}", clipping.content);
    if let Some(note) = &clipping.note {
        println!();
        println!("Your Note:");
        println!("{}", note);
    }
}

fn write_export(session: &Session, path: &Path) -> std::io::Result<()> {
    fs::write(path, session.export_json())?;
    tracing::info!(path = ?path, books = session.library().len(), "exported clippings");
    println!("Exported {} books to {}", session.library().len(), path.display());
    Ok(())
}
