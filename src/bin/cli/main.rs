mod app;
mod commands;
mod password;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "folio-cli",
    about = "Manage documents, model configs and prompts; export and import encrypted archives",
    version
)]
struct Cli {
    /// Data directory (default: $FOLIO_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Section {
    Documents,
    Models,
    Prompts,
}

#[derive(Subcommand)]
enum Command {
    /// Add records from a JSON file (a single record or an array)
    Add {
        section: Section,
        /// JSON file, "-" for stdin
        file: String,
    },

    /// List records of one kind
    List { section: Section },

    /// Delete a record by id
    Delete { section: Section, id: i64 },

    /// Show record counts
    Count,

    /// Store a parsed document from its heading list
    Ingest {
        /// Document name
        name: String,
        /// JSON array of headings produced by the document parser, "-" for stdin
        headings: String,
        /// Original file path
        #[arg(long)]
        source: Option<String>,
        /// Original file type (e.g. docx, md)
        #[arg(long)]
        file_type: Option<String>,
        /// Heading id to drop together with everything below it (repeatable)
        #[arg(long = "drop")]
        drop_ids: Vec<i64>,
    },

    /// Show the heading tree of a document
    Tree {
        /// Document name (case-insensitive prefix match)
        document: String,
        /// Attach headings without explicit parents by level
        #[arg(long)]
        infer_levels: bool,
    },

    /// Search headings of a document
    Search {
        /// Document name (case-insensitive prefix match)
        document: String,
        /// Search query
        query: String,
        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,
        /// Attach headings without explicit parents by level
        #[arg(long)]
        infer_levels: bool,
    },

    /// Write an encrypted export archive
    Export {
        /// Output file
        file: PathBuf,
        /// Sections to export (default: all)
        #[arg(long = "section")]
        sections: Vec<Section>,
    },

    /// Import an encrypted export archive
    Import {
        /// Archive file
        file: PathBuf,
    },
}

/// Read text from a file path, or stdin for "-"
fn read_input(path: &str) -> anyhow::Result<String> {
    use anyhow::Context;

    if path == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Add { section, file } => {
            let content = read_input(&file)?;
            commands::records::run_add(&app, section, &content, &cli.format)?;
        }
        Command::List { section } => {
            commands::records::run_list(&app, section, &cli.format)?;
        }
        Command::Delete { section, id } => {
            commands::records::run_delete(&app, section, id)?;
        }
        Command::Count => {
            commands::records::run_count(&app, &cli.format)?;
        }
        Command::Ingest {
            name,
            headings,
            source,
            file_type,
            drop_ids,
        } => {
            let content = read_input(&headings)?;
            commands::ingest::run(
                &app,
                &name,
                &content,
                source,
                file_type,
                &drop_ids,
                &cli.format,
            )?;
        }
        Command::Tree {
            document,
            infer_levels,
        } => {
            commands::tree::run(&app, &document, infer_levels, &cli.format, use_color)?;
        }
        Command::Search {
            document,
            query,
            case_sensitive,
            infer_levels,
        } => {
            commands::search::run(
                &app,
                &document,
                &query,
                case_sensitive,
                infer_levels,
                &cli.format,
                use_color,
            )?;
        }
        Command::Export { file, sections } => {
            commands::transfer::run_export(&app, &file, &sections)?;
        }
        Command::Import { file } => {
            commands::transfer::run_import(&app, &file, &cli.format)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

/// Check if stdin is a terminal (not piped)
pub fn stdin_is_tty() -> bool {
    unsafe { libc_isatty(0) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
