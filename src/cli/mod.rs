//! Command-line parsing for the COVID-19 curve charts.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the alignment/rendering code.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Category;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid19", version, about = "Threshold-aligned COVID-19 curves, served as charts")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file replacing the built-in countries/thresholds/lockdown/correction tables.
    #[arg(long, global = true, env = "COVID19_CONFIG", value_name = "JSON")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTML page and the chart images over HTTP.
    Serve(ServeArgs),
    /// Render one chart to an SVG file.
    Render(RenderArgs),
    /// Print the aligned dataset summary (cutoffs, day zero, lockdown positions).
    Show(ShowArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "COVID19_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Also write every generated chart to `<DIR>/covid-<category>.svg`.
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,
}

/// Category selection shared by `render` and `show`.
#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Which series to chart.
    #[arg(short, long, value_enum, default_value_t = Category::Confirmed)]
    pub category: Category,

    /// Day-zero threshold (defaults to the configured value for the category).
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Output file (defaults to `covid-<category>.svg`).
    #[arg(short, long, value_name = "SVG")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Export the aligned series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}
