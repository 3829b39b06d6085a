use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use colored::Colorize;
use library_circulation::{Book, LibraryConfig, LibraryService, Member};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Command-line front end for the library circulation manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding members.txt and books.txt (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print collections as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Operation to run
    #[command(subcommand)]
    command: Command,
}

/// Member id and password for member-scoped commands
#[derive(clap::Args, Debug)]
struct Credentials {
    /// Member id
    #[arg(long)]
    id: String,

    /// Member password
    #[arg(long)]
    password: String,
}

/// Operations exposed by the CLI
#[derive(Subcommand, Debug)]
enum Command {
    /// Create empty record files if they do not exist
    Init,
    /// List every book
    Books,
    /// List books whose title contains a keyword
    Search {
        /// Case-sensitive title fragment
        keyword: String,
    },
    /// Register a new member
    Register {
        /// Unique member id
        #[arg(long)]
        id: String,
        /// Password
        #[arg(long)]
        password: String,
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// Check credentials
    Login(Credentials),
    /// List books borrowed by the authenticated member
    Mine(Credentials),
    /// Borrow a book
    Borrow {
        /// Book number
        no: u32,
        /// Borrowing member
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Return a borrowed book
    Return {
        /// Book number
        no: u32,
        /// Returning member
        #[command(flatten)]
        credentials: Credentials,
    },
    /// List all members (privileged account only)
    Members(Credentials),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Structured logging to stderr, filtered by `RUST_LOG` (default `warn`)
fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Config file first, then command-line overrides
fn resolve_config(cli: &Cli) -> Result<LibraryConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => LibraryConfig::from_json_file(path)?,
        None => LibraryConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir.clone_from(data_dir);
    }
    Ok(config)
}

/// Load, execute one command, save if it changed anything
fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(cli)?;
    let mut service = LibraryService::new(&config);

    if matches!(cli.command, Command::Init) {
        if service.initialize_storage()? {
            println!("{}", format!("Initialized records in {}", config.data_dir.display()).green());
        } else {
            println!("Records already present in {}", config.data_dir.display());
        }
        return Ok(());
    }

    // A failed load aborts before any command runs
    service.load()?;

    if execute(&mut service, &cli.command, cli.json)? {
        service.save()?;
    }
    Ok(())
}

/// Run a command against a loaded service; returns whether records changed
fn execute(
    service: &mut LibraryService,
    command: &Command,
    json: bool,
) -> Result<bool, Box<dyn Error>> {
    match command {
        Command::Init => Ok(false),
        Command::Books => {
            let books: Vec<&Book> = service.get_all_books().iter().collect();
            print_collection(&books, json, "No books in the library.")?;
            Ok(false)
        }
        Command::Search { keyword } => {
            let books = service.search_books(keyword);
            print_collection(&books, json, &format!("No titles contain {keyword:?}."))?;
            Ok(false)
        }
        Command::Register { id, password, name } => {
            service.register_member(Member::new(id.as_str(), password.as_str(), name.as_str()))?;
            println!("{}", format!("Registered {name} ({id}).").green());
            Ok(true)
        }
        Command::Login(credentials) => {
            let member = service.login(&credentials.id, &credentials.password)?;
            let role = if service.is_privileged(&member) { " [admin]" } else { "" };
            println!("{}", format!("Logged in as {member}{role}.").green());
            Ok(false)
        }
        Command::Mine(credentials) => {
            let member = service.login(&credentials.id, &credentials.password)?;
            let books = service.get_my_borrowed_books(member.id());
            print_collection(&books, json, "You have no borrowed books.")?;
            Ok(false)
        }
        Command::Borrow { no, credentials } => {
            let member = service.login(&credentials.id, &credentials.password)?;
            service.borrow_book(*no, member.id())?;
            println!("{}", format!("Book [{no}] borrowed by {member}.").green());
            Ok(true)
        }
        Command::Return { no, credentials } => {
            let member = service.login(&credentials.id, &credentials.password)?;
            service.return_book(*no, member.id())?;
            println!("{}", format!("Book [{no}] returned by {member}.").green());
            Ok(true)
        }
        Command::Members(credentials) => {
            let member = service.login(&credentials.id, &credentials.password)?;
            if !service.is_privileged(&member) {
                return Err(format!("{} may not list members", member.id()).into());
            }
            let members: Vec<&Member> = service.members().iter().collect();
            print_collection(&members, json, "No members registered.")?;
            Ok(false)
        }
    }
}

/// Print one item per line, or the whole collection as JSON
fn print_collection<T>(items: &[&T], json: bool, empty: &str) -> Result<(), Box<dyn Error>>
where
    T: Serialize + std::fmt::Display,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else if items.is_empty() {
        println!("{}", empty.yellow());
    } else {
        for item in items {
            println!("{item}");
        }
    }
    Ok(())
}
