use std::{fs, path::PathBuf};

use clap::Parser;
use graphql_strip_ignored::{Source, strip_ignored_characters_with_sourcemap};

#[derive(Parser, Debug)]
#[command(name = "fixtures")]
#[command(about = "Create or validate fixture files", long_about = None)]
struct Args {
    /// Write fixtures instead of validating them
    #[arg(long, short)]
    write: bool,

    /// Path to the fixtures directory (defaults to "./fixtures")
    #[arg(long, default_value = "fixtures")]
    dir: PathBuf,
}

const EXTENSION: &str = "graphql";

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut input_files = Vec::new();
    for entry in fs::read_dir(&args.dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;

        // Skip outputs and anything that is not a document.
        if filename.contains(".out.") || !filename.ends_with(&format!(".{EXTENSION}")) {
            continue;
        }
        input_files.push(path);
    }
    input_files.sort();

    println!(
        "{} fixtures...",
        if args.write { "Creating" } else { "Validating" }
    );
    let mut mismatches = Vec::new();

    for input_path in &input_files {
        let filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;
        let basename = filename
            .strip_suffix(&format!(".{EXTENSION}"))
            .ok_or("filename missing extension")?;

        let body = fs::read_to_string(input_path)?;
        let res = strip_ignored_characters_with_sourcemap(Source::new(body).with_name(filename))?;

        let out_path = args.dir.join(format!("{basename}.out.{EXTENSION}"));
        let out_map_path = args.dir.join(format!("{basename}.out.{EXTENSION}.map"));

        if args.write {
            fs::write(&out_path, &res.code)?;
            fs::write(&out_map_path, &res.sourcemap)?;
            println!(
                "  Created {} and {}",
                out_path.display(),
                out_map_path.display()
            );
            continue;
        }

        if out_path.exists() {
            if res.code.as_bytes() != fs::read(&out_path)? {
                mismatches.push(format!("{filename}: code mismatch"));
            }
        } else {
            mismatches.push(format!(
                "{filename}: missing output file {}",
                out_path.display()
            ));
        }

        // Sourcemaps are optional; they are checked only when present.
        if out_map_path.exists() && res.sourcemap.as_bytes() != fs::read(&out_map_path)? {
            mismatches.push(format!("{filename}: sourcemap mismatch"));
        }

        if !mismatches.iter().any(|m| m.starts_with(filename)) {
            println!("  ✓ {filename}");
        }
    }

    if args.write {
        println!("Done creating {} fixtures.", input_files.len());
        return Ok(());
    }

    if !mismatches.is_empty() {
        eprintln!("\nValidation failed:");
        for mismatch in &mismatches {
            eprintln!("  ✗ {mismatch}");
        }
        return Err(format!("{} validation error(s)", mismatches.len()).into());
    }

    println!(
        "\nAll {} fixtures validated successfully!",
        input_files.len()
    );
    Ok(())
}
