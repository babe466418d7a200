use clap::{ArgAction, Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tql_lang::cli::{self, CheckOptions, CheckResult, CliError, FilterOptions, LowerOptions};
use tracing::Level;

#[derive(ClapParser)]
#[command(name = "tql")]
#[command(about = "TQL - A query language for filtering records, with EL and criteria backends")]
#[command(version)]
struct Cli {
    /// Log translation steps to stderr (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a query and print its canonical form
    Check {
        /// The TQL query (reads from stdin if not provided)
        query: Option<String>,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate a query into the expression language
    Lower {
        /// The TQL query (reads from stdin if not provided)
        query: Option<String>,

        /// Lowering policy: generic, storage or runtime
        #[arg(short, long, default_value = "generic")]
        policy: String,

        /// JSON file mapping field names to type names
        #[arg(short, long)]
        types: Option<String>,
    },

    /// Translate an expression back into TQL
    Raise {
        /// The EL expression (reads from stdin if not provided)
        el: Option<String>,

        /// Policy the expression was lowered with: generic, storage or runtime
        #[arg(short, long, default_value = "generic")]
        policy: String,
    },

    /// Translate a query into a document-store criteria document
    Criteria {
        /// The TQL query (reads from stdin if not provided)
        query: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the JSON records a query matches
    Filter {
        /// The TQL query
        query: String,

        /// JSON records, as an array or one per line (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'tql docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { query, json } => run_check(query, json),
        Commands::Lower {
            query,
            policy,
            types,
        } => run_lower(query, policy, types),
        Commands::Raise { el, policy } => read_arg(el, "expression")
            .and_then(|el| print_line(cli::execute_raise(&el, &policy))),
        Commands::Criteria { query, pretty } => read_arg(query, "query")
            .and_then(|query| print_line(cli::execute_criteria(&query, pretty))),
        Commands::Filter { query, input } => run_filter(query, input),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn read_stdin() -> Option<Result<String, CliError>> {
    if atty::is(atty::Stream::Stdin) {
        return None;
    }
    let mut buffer = String::new();
    Some(
        io::stdin()
            .read_to_string(&mut buffer)
            .map(|_| buffer)
            .map_err(CliError::Io),
    )
}

/// The argument itself, or whatever was piped to stdin.
fn read_arg(arg: Option<String>, what: &'static str) -> Result<String, CliError> {
    match arg {
        Some(s) => Ok(s),
        None => read_stdin().unwrap_or(Err(CliError::NoInput(what))),
    }
}

fn print_line(output: Result<String, CliError>) -> Result<(), CliError> {
    println!("{}", output?);
    Ok(())
}

fn run_check(query: Option<String>, json: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        query: read_arg(query, "query")?,
        json,
    };

    match cli::execute_check(&options)? {
        CheckResult::Canonical(text) => println!("{}", text),
        CheckResult::Ast(ast) => println!("{}", serde_json::to_string_pretty(&ast)?),
    }
    Ok(())
}

fn run_lower(query: Option<String>, policy: String, types: Option<String>) -> Result<(), CliError> {
    let types = match types {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };
    let options = LowerOptions {
        query: read_arg(query, "query")?,
        policy,
        types,
    };
    print_line(cli::execute_lower(&options))
}

fn run_filter(query: String, input: Option<String>) -> Result<(), CliError> {
    let options = FilterOptions {
        query,
        input: read_arg(input, "input")?,
    };

    for record in cli::execute_filter(&options)? {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}
