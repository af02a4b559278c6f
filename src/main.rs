use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use oncutf::diagnostics::TracingDiagnostics;
use oncutf::listing::{self, ListOptions};
use oncutf::{
    elide, format_file_size, format_keywords, parse_keywords, truncate_middle, validate_field,
    FileEntry,
};
use std::path::PathBuf;

mod logging;

#[derive(Parser, Debug)]
#[command(name = "oncutf")]
#[command(version, about = "File table formatting and metadata validation for batch renaming")]
struct Cli {
    /// Increase logging verbosity (use together with RUST_LOG for fine control).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render byte counts the way the file table size column does
    Size {
        /// Byte counts (negative values render as 0 B)
        #[arg(required = true, allow_negative_numbers = true)]
        bytes: Vec<i64>,
    },

    /// Shorten text to a maximum number of characters
    Elide {
        text: String,

        /// Maximum length in characters
        #[arg(long)]
        max: usize,

        /// Cut the middle of a filename and keep its extension
        #[arg(long, default_value_t = false)]
        middle: bool,
    },

    /// Validate a metadata value (Title, Artist, Author, Copyright, Description, Keywords)
    Validate {
        field: String,
        value: String,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Clean up a comma separated keyword list
    Keywords { text: String },

    /// Show the entry built for each path
    Inspect {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print entries as JSON objects
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the files of a directory as a table
    List {
        dir: PathBuf,

        #[arg(long, default_value_t = false)]
        recursive: bool,

        /// Follow symlinks during traversal
        #[arg(long, default_value_t = false)]
        follow_symlinks: bool,

        /// Width of the name column
        #[arg(long, default_value_t = 40)]
        width: usize,

        /// Print entries as a JSON array
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.cmd {
        Command::Size { bytes } => {
            for b in bytes {
                println!("|{}| {}", format_file_size(b), b);
            }
            Ok(())
        }

        Command::Elide { text, max, middle } => {
            let out = if middle {
                truncate_middle(&text, max)
            } else {
                elide(&text, max)
            };
            println!("{out}");
            Ok(())
        }

        Command::Validate { field, value, json } => {
            let r = validate_field(&field, &value);
            if json {
                println!("{}", serde_json::to_string(&r)?);
            } else if r.is_valid {
                println!("OK");
            }
            if !r.is_valid {
                bail!("{}", r.message);
            }
            Ok(())
        }

        Command::Keywords { text } => {
            let keywords = parse_keywords(&text);
            for k in &keywords {
                println!("{k}");
            }
            println!("{}", format_keywords(&keywords));
            Ok(())
        }

        Command::Inspect { paths, json } => {
            for p in &paths {
                let entry = FileEntry::from_path_with(p, &TracingDiagnostics);
                if json {
                    println!("{}", entry.to_dict());
                } else {
                    println!("{}", entry.full_path().display());
                    println!("  name:     {}", entry.filename());
                    println!("  ext:      {}", entry.extension());
                    println!("  size:    {}", entry.human_readable_size());
                    println!("  modified: {}", entry.modified().to_rfc3339());
                }
            }
            Ok(())
        }

        Command::List {
            dir,
            recursive,
            follow_symlinks,
            width,
            json,
        } => {
            if width == 0 {
                return Err(anyhow!("--width must be at least 1"));
            }

            tracing::info!(dir = %dir.display(), recursive, follow_symlinks, "listing");

            let opts = ListOptions {
                recursive,
                follow_symlinks,
            };
            let entries = listing::collect_entries(&dir, opts, &TracingDiagnostics)
                .with_context(|| format!("Failed to list {}", dir.display()))?;

            if json {
                let all: Vec<_> = entries.iter().map(FileEntry::to_dict).collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                let total: u64 = entries.iter().map(FileEntry::size).sum();
                for e in &entries {
                    println!("{}", listing::format_row(e, width));
                }
                println!();
                println!(
                    "{} files, {}",
                    entries.len(),
                    oncutf::format_size(total).trim()
                );
            }
            Ok(())
        }
    }
}
