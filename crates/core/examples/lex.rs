use std::{fs, path::PathBuf};

use clap::Parser;
use graphql_strip_ignored::{Source, lexer::Lexer};

#[derive(Parser, Debug)]
#[command(name = "lex")]
#[command(about = "Print the token stream of a GraphQL document", long_about = None)]
struct Args {
    /// Path to the GraphQL document
    input: PathBuf,

    /// Also print ignored tokens (whitespace, commas, comments)
    #[arg(long, short)]
    all: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let body = fs::read_to_string(&args.input)?;
    let name = args.input.display().to_string();
    let source = Source::new(body).with_name(name);

    for token in Lexer::new(&source) {
        let token = token?;
        if token.kind.is_ignored() && !args.all {
            continue;
        }
        println!(
            "{:>4}:{:<4} {:<16} {:?}",
            token.line,
            token.column,
            format!("{:?}", token.kind),
            token.raw
        );
    }

    Ok(())
}
