//! # eSTOCK Labels CLI
//!
//! Command-line front-end for barcode label generation.
//!
//! ## Usage
//!
//! ```bash
//! # One 4x2 QR label per article, saved as estock-labels-<date>.pdf
//! estock-labels generate --input articles.json --kind articles
//!
//! # EAN-13 on 2x1 labels, without descriptions
//! estock-labels generate --input items.json --code-type ean13 --label-size 2x1 --no-description
//!
//! # Open the labels in the system viewer for printing
//! estock-labels print --input locations.json --kind locations
//!
//! # Dense A4 text sheet
//! estock-labels sheet --input tasks.json --kind tasks
//!
//! # Show the EAN-13 code for an id
//! estock-labels ean13 ABC123
//!
//! # Render one code to PNG
//! estock-labels preview --code WID-001 --code-type code128 --png code.png
//! ```
//!
//! Set `RUST_LOG=estock_labels=debug` to see which render tier produced
//! each code.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use estock_labels::{
    LabelComposer, LabelConfig, LabelError,
    compose,
    ean13,
    model::{BarcodeItem, LabelSize, RenderOptions, Symbology, adapters},
    output,
    render::{RenderContext, Renderer, SurfaceSlot, canvas, display::DisplayState},
};

/// eSTOCK Labels - barcode label generator
#[derive(Parser, Debug)]
#[command(name = "estock-labels")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose labels and save the PDF
    Generate(BatchArgs),

    /// Compose labels and open them for printing
    Print(BatchArgs),

    /// Export a dense A4 text sheet (no code images)
    Sheet(BatchArgs),

    /// Print the EAN-13 code synthesized from an id
    Ean13 {
        /// Any identifier; empty means "UNKNOWN"
        input: Option<String>,
    },

    /// Render a single code for display
    Preview {
        /// Code to render
        #[arg(long)]
        code: String,

        /// Symbology: qr, code128 or ean13
        #[arg(long, default_value = "qr")]
        code_type: Symbology,

        /// Display size in pixels, WIDTHxHEIGHT
        #[arg(long, default_value = "200x60", value_parser = parse_size)]
        size: (u32, u32),

        /// Save the rendered code as PNG
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Configuration file (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// What the input file contains.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputKind {
    /// Ready-made barcode items
    Items,
    Articles,
    Locations,
    Tasks,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON file with an array of records
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// Record type in the input file
    #[arg(long, value_enum, default_value = "items")]
    kind: InputKind,

    /// Symbology: qr, code128 or ean13
    #[arg(long, default_value = "qr")]
    code_type: Symbology,

    /// Label size: 4x2, 2x1 or 3x1 (anything else means 4x2)
    #[arg(long, default_value = "4x2", value_parser = parse_label_size)]
    label_size: LabelSize,

    /// Leave item names off the labels
    #[arg(long)]
    no_name: bool,

    /// Leave item descriptions off the labels
    #[arg(long)]
    no_description: bool,

    /// Leave the company line off the labels
    #[arg(long)]
    no_company: bool,

    /// Company name for the top line
    #[arg(long, default_value = "eSTOCK")]
    company: String,

    /// Directory to save the PDF in
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl BatchArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            code_type: self.code_type,
            label_size: self.label_size,
            include_name: !self.no_name,
            include_description: !self.no_description,
            include_company_logo: !self.no_company,
            company_name: self.company.clone(),
        }
    }

    fn items(&self) -> Result<Vec<BarcodeItem>, LabelError> {
        let raw = std::fs::read_to_string(&self.input)?;
        let items = match self.kind {
            InputKind::Items => serde_json::from_str(&raw)?,
            InputKind::Articles => adapters::from_articles(&serde_json::from_str::<Vec<adapters::Article>>(&raw)?),
            InputKind::Locations => adapters::from_locations(&serde_json::from_str::<Vec<adapters::Location>>(&raw)?),
            InputKind::Tasks => adapters::from_tasks(&serde_json::from_str::<Vec<adapters::Task>>(&raw)?),
        };
        Ok(items)
    }
}

fn parse_label_size(s: &str) -> Result<LabelSize, String> {
    let size = LabelSize::from_tag_or_default(s);
    if size.as_str() != s.trim() {
        tracing::warn!(requested = s, "unknown label size, using 4x2");
    }
    Ok(size)
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w = w.trim().parse().map_err(|_| format!("bad width in '{}'", s))?;
    let h = h.trim().parse().map_err(|_| format!("bad height in '{}'", s))?;
    Ok((w, h))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            let config = LabelConfig::load_or_default(args.config.as_deref())?;
            let document = compose_batch(&args, config).await?;
            let path = document.save(&args.output_dir, output::today())?;
            println!("Saved {} label(s) to {}", document.page_count, path.display());
        }

        Commands::Print(args) => {
            let config = LabelConfig::load_or_default(args.config.as_deref())?;
            let delay = config.print_cleanup_delay();
            let document = compose_batch(&args, config).await?;
            let handoff = document.print(delay)?;
            println!("Opened {} label(s) for printing", document.page_count);
            handoff.finish().await;
        }

        Commands::Sheet(args) => {
            let items = args.items()?;
            let document = compose::compose_sheet(&items, &args.options(), output::today())?;
            let path = document.save(&args.output_dir, output::today())?;
            if let Some(message) = &document.message {
                println!("{}", message);
            }
            println!("Saved to {}", path.display());
        }

        Commands::Ean13 { input } => {
            println!("{}", ean13::synthesize(input.as_deref()));
        }

        Commands::Preview {
            code,
            code_type,
            size,
            png,
            config,
        } => {
            let config = LabelConfig::load_or_default(config.as_deref())?;
            let renderer = Renderer::new(RenderContext::new(config)?);
            preview(&renderer, &code, code_type, size, png.as_deref()).await?;
        }
    }

    Ok(())
}

async fn compose_batch(
    args: &BatchArgs,
    config: LabelConfig,
) -> Result<estock_labels::LabelDocument, LabelError> {
    let items = args.items()?;
    let composer = LabelComposer::new(Renderer::new(RenderContext::new(config)?));
    let document = composer.compose(&items, &args.options()).await?;

    for failure in &document.failures {
        println!("  placeholder for {}: {}", failure.item_id, failure.message);
    }
    Ok(document)
}

async fn preview(
    renderer: &Renderer,
    code: &str,
    symbology: Symbology,
    size: (u32, u32),
    png: Option<&Path>,
) -> Result<(), LabelError> {
    let mut state = DisplayState::new();
    state
        .generate(renderer, code, symbology, size, &SurfaceSlot::attached())
        .await;
    if let Some(error) = &state.error {
        return Err(LabelError::Composition(error.clone()));
    }

    println!("{}", state.display_code);
    if let Some(url) = &state.fallback_url {
        println!("Remote image: {}", url);
    }

    if let Some(path) = png {
        state.load_remote(renderer.context()).await;
        if let Some(error) = &state.error {
            return Err(LabelError::ExternalServiceUnavailable(error.clone()));
        }
        let Some(image) = &state.image else {
            return Err(LabelError::Composition("nothing to save".into()));
        };
        std::fs::write(path, canvas::encode_png(image)?)?;
        println!("Saved PNG to {}", path.display());
    }

    Ok(())
}
