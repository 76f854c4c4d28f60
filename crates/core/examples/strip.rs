use std::{fs, path::PathBuf};

use clap::Parser;
use graphql_strip_ignored::{
    Source, strip_ignored_characters, strip_ignored_characters_rewrite_sourcemap,
    strip_ignored_characters_with_sourcemap,
};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "strip")]
#[command(about = "Strip ignored characters from a GraphQL document", long_about = None)]
struct Args {
    /// Path to the GraphQL document to transform
    input: PathBuf,

    /// Output path for the stripped document (defaults to stdout)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Output path for the sourcemap (defaults to <out>.map if --out is provided)
    #[arg(long)]
    out_sourcemap: Option<PathBuf>,

    /// Existing sourcemap for the input; it is rewritten instead of creating a new one
    #[arg(long)]
    input_sourcemap: Option<PathBuf>,

    /// Document name used in error messages (defaults to the input file name)
    #[arg(long)]
    name: Option<String>,

    /// Log debug events
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let body = fs::read_to_string(&args.input)?;
    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("input file must have a valid filename")?
            .to_string(),
    };
    let source = Source::new(body.as_str()).with_name(name);

    let out_map_path = args.out_sourcemap.clone().or_else(|| {
        args.out
            .as_ref()
            .map(|out| PathBuf::from(format!("{}.map", out.display())))
    });

    let out_code = match (out_map_path, &args.input_sourcemap) {
        (Some(out_map_path), Some(input_map_path)) => {
            let input_map = fs::read_to_string(input_map_path)?;
            let res = strip_ignored_characters_rewrite_sourcemap(&source, &input_map)?;
            fs::write(out_map_path, res.sourcemap)?;
            res.code
        }
        (Some(out_map_path), None) => {
            let res = strip_ignored_characters_with_sourcemap(&source)?;
            fs::write(out_map_path, res.sourcemap)?;
            res.code
        }
        (None, _) => strip_ignored_characters(&source)?,
    };

    match &args.out {
        None => {
            print!("{out_code}");
        }
        Some(out) => {
            fs::write(out, out_code)?;
        }
    }

    Ok(())
}
