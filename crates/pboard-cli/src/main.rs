//! pboard CLI: inspect, read and write the system pasteboard.

mod commands;
mod config;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pboard_clipboard::{ClipboardHandle, Monitor};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "pboard",
    about = "Read and write the system pasteboard",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how the current clipboard content is classified.
    Info,

    /// Print the clipboard change counter.
    Count,

    /// Write the clipboard payload to stdout or a file.
    Read {
        /// Consider text content.
        #[arg(long)]
        text: bool,
        /// Consider image content.
        #[arg(long)]
        image: bool,
        /// Consider file references.
        #[arg(long)]
        files: bool,
        /// Output file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the clipboard with text (read from stdin when omitted).
    Write { text: Option<String> },

    /// List the declared types of the first clipboard item.
    Formats,

    /// Dump the bytes of one declared type.
    Raw {
        /// Declared type identifier, e.g. `public.html`.
        declared_type: String,
        /// Output file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a line for every clipboard change until interrupted.
    Watch,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let handle = pboard_clipboard::open_handle().context("opening system pasteboard")?;
    let stdout = std::io::stdout();

    match cli.command {
        Commands::Info => commands::info(&handle, &mut stdout.lock())?,
        Commands::Count => commands::count(&handle, &mut stdout.lock())?,
        Commands::Read {
            text,
            image,
            files,
            output,
        } => {
            let filter = commands::filter_from_flags(text, image, files, config.read.filter());
            let mut out = output_writer(output)?;
            commands::read(&handle, &filter, &mut out, &mut std::io::stderr())?;
        }
        Commands::Write { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading text from stdin")?;
                    buf
                }
            };
            commands::write(&handle, &text)?;
        }
        Commands::Formats => commands::formats(&handle, &mut stdout.lock())?,
        Commands::Raw {
            declared_type,
            output,
        } => {
            let mut out = output_writer(output)?;
            commands::raw(&handle, &declared_type, &mut out)?;
        }
        Commands::Watch => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(watch(handle, &config))?;
        }
    }

    Ok(())
}

fn output_writer(path: Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    })
}

async fn watch(handle: ClipboardHandle, config: &Config) -> anyhow::Result<()> {
    let (monitor, mut rx) = Monitor::start(handle, config.watch.interval()).await?;

    loop {
        tokio::select! {
            change = rx.recv() => match change {
                Some(change) => println!("{}", commands::format_change(&change)),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    monitor.close().await?;
    Ok(())
}
