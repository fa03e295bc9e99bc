use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ngr_convert::{convert_export, ConvertOptions};

#[derive(Parser)]
#[command(name = "ngr-convert")]
#[command(author, version, about = "Convert NGR partnership XML exports to Airtable-ready CSV bundles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an NGR XML export into four CSV files and a ZIP bundle
    Convert {
        /// Path to the NGR XML export
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the CSV files and bundle (defaults to the current directory)
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output path for the ZIP bundle (defaults to ngr_export_<timestamp>.zip)
        #[arg(short, long)]
        bundle: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output_dir,
            bundle,
            verbose,
        } => {
            let options = ConvertOptions {
                input_path: input,
                output_dir,
                bundle_path: bundle,
                verbose,
            };

            convert_export(options)?;
        }
    }

    Ok(())
}
