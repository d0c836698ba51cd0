use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{OutputFormat, SideSelection};

/// orderlist — render pre-aggregated order-book sides as depth tables.
#[derive(Parser, Debug)]
#[command(name = "orderlist", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one JSON snapshot to stdout
    Render(RenderArgs),

    /// Live terminal view of newline-delimited JSON snapshots
    View(ViewArgs),
}

/// Number formatting shared by both subcommands.
#[derive(Args, Debug)]
pub struct DecimalArgs {
    /// Fixed decimals for prices (shortest exact form if unset)
    #[arg(long, env = "ORDERLIST_PRICE_DECIMALS")]
    pub price_decimals: Option<usize>,

    /// Fixed decimals for sizes (shortest exact form if unset)
    #[arg(long, env = "ORDERLIST_SIZE_DECIMALS")]
    pub size_decimals: Option<usize>,
}

/// Arguments for the `render` subcommand.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Snapshot file ("-" or omitted for stdin)
    pub input: Option<PathBuf>,

    /// Sides to render
    #[arg(long, value_enum, default_value_t = SideSelection::Both)]
    pub side: SideSelection,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Extra class attached to each rendered list
    #[arg(long, default_value = "")]
    pub class_name: String,

    #[command(flatten)]
    pub decimals: DecimalArgs,
}

/// Arguments for the `view` subcommand.
#[derive(Parser, Debug)]
pub struct ViewArgs {
    /// Snapshot stream, one JSON object per line ("-" or omitted for stdin)
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub decimals: DecimalArgs,
}
