use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "barcode_factory")]
#[command(about = "A tool for drawing barcodes through the object/renderer factory")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a barcode and its renderer, then write the rendered output
    Draw {
        /// Barcode identifier (code25, code25interleaved, code39, error)
        barcode: Option<String>,

        /// Renderer identifier (image, pdf)
        #[arg(short, long)]
        renderer: Option<String>,

        /// Text to encode
        #[arg(short, long)]
        text: Option<String>,

        /// Barcode option as KEY=VALUE (repeatable, VALUE parsed as JSON when possible)
        #[arg(short = 'p', long = "barcode-param", value_name = "KEY=VALUE")]
        barcode_params: Vec<String>,

        /// Renderer option as KEY=VALUE (repeatable, VALUE parsed as JSON when possible)
        #[arg(short = 'R', long = "renderer-param", value_name = "KEY=VALUE")]
        renderer_params: Vec<String>,

        /// JSON configuration with barcode / barcodeParams / renderer / rendererParams
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path (defaults to barcode.<extension>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Default font for barcode text (1-5 or a font file path)
        #[arg(long)]
        font: Option<String>,

        /// Fail instead of drawing an error barcode
        #[arg(long)]
        strict: bool,

        /// Force overwrite existing output file without warning
        #[arg(short, long)]
        force: bool,
    },

    /// List the registered barcode objects and renderers
    List,
}
