use clap::{Parser as ClapParser, Subcommand};
use clove_jmespath::cli::{self, CliError, SearchOptions, SearchResult};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "clove-jp")]
#[command(about = "Query JSON documents with JMESPath expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression against JSON input
    Search {
        /// The JMESPath expression
        expression: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,

        /// Make function type errors evaluate to null
        #[arg(long)]
        silent_type_errors: bool,
    },

    /// Print the syntax tree of an expression
    Ast {
        /// The JMESPath expression
        expression: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search {
            expression,
            input,
            pretty,
            syntax_only,
            silent_type_errors,
        } => run_search(expression, input, pretty, syntax_only, silent_type_errors),
        Commands::Ast { expression } => {
            cli::describe_ast(&expression).map(|tree| println!("{tree}"))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_search(
    expression: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
    silent_type_errors: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = SearchOptions {
        expression,
        input,
        syntax_only,
        silent_type_errors,
    };

    match cli::execute_search(&options)? {
        SearchResult::SyntaxValid => println!("Syntax is valid"),
        SearchResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
