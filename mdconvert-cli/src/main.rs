//! # md-converter
//!
//! Converts Markdown documents with diagrams and ASCII art into PDF, DOCX
//! or standalone HTML.

mod commands;

use clap::{Parser, Subcommand};
use mdconvert_core::{AsciiMode, OutputFormat, StyleName};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "md-converter")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Conversion is a subcommand; a bare `md-converter input.md -o out.pdf` \
is now written `md-converter convert input.md -o out.pdf`.")]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "mdconvert.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markdown files to PDF, DOCX or HTML
    Convert {
        /// Input files (or directories with --batch)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output path for a single input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: pdf, docx, both or html
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Document style: default, professional or minimal
        #[arg(long)]
        style: Option<StyleName>,

        /// ASCII art handling: image, optimize or preserve
        #[arg(long)]
        ascii_mode: Option<AsciiMode>,

        /// Walk directories for .md, .markdown and .txt files
        #[arg(long)]
        batch: bool,
    },

    /// Show metadata and detected blocks of a document
    Inspect {
        input: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the table of contents HTML of a document
    Toc { input: PathBuf },

    /// Start the HTTP conversion API
    Serve {
        /// Server port (defaults to the configured port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Convert {
            inputs,
            output,
            format,
            style,
            ascii_mode,
            batch,
        } => {
            let opts = commands::ConvertOptions {
                output,
                format,
                style,
                ascii_mode,
                batch,
            };
            commands::convert_files(&cli.config, &inputs, opts)
        }
        Commands::Inspect { input, json } => commands::inspect_document(&cli.config, &input, json),
        Commands::Toc { input } => commands::print_toc(&cli.config, &input),
        Commands::Serve { port } => commands::serve(&cli.config, port).await,
    }
}
