use clap::{Parser, Subcommand};
use maj::logger::Log;
use maj::package::PackageManager;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "maj", about = "The .maj package container CLI")]
struct Cli {
    /// Append log lines to a file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a directory into a .maj package
    Pack {
        /// Source directory (canonicalized before packing)
        directory: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Install a .maj package into a directory
    Install {
        input: PathBuf,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// List package contents
    List {
        input: PathBuf,
    },
    /// Show package metadata
    Info {
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let log = match &cli.log_file {
        Some(path) => Log::to_file(path)?,
        None => Log::to_stderr(),
    };
    let mut pm = PackageManager::with_log(log);

    match cli.command {

        // ── Pack ─────────────────────────────────────────────────────────────
        Commands::Pack { directory, output } => {
            let directory = std::fs::canonicalize(&directory)?;
            let header = pm.create(&directory, &output)?;
            println!("Created: {} ({} bytes)", output.display(), header.file_size);
        }

        // ── Install ──────────────────────────────────────────────────────────
        Commands::Install { input, output_dir } => {
            pm.install(&input, &output_dir)?;
            println!("Installed to: {}", output_dir.display());
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input } => {
            let reader = pm.open(&input)?;
            println!("Package: {}", input.display());
            println!("{:<40} {:>12}", "Name", "Size");
            for entry in &reader.index {
                println!("{:<40} {:>12}", entry.path, entry.size);
            }
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let reader = pm.open(&input)?;
            println!("── .maj package ─────────────────────────────────────────");
            println!("  Path        {}", input.display());
            println!("  File size   {} B", reader.header.file_size);
            println!("  Index size  {} B", reader.header.index_size);
            println!("  Data size   {} B", reader.header.data_size);
            println!("  Files       {}", reader.index.len());
        }
    }

    Ok(())
}
