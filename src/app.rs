//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initializes logging and loads the chart configuration
//! - serves charts over HTTP, or renders / summarizes one category

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::cli::{Command, RenderArgs, SeriesArgs, ServeArgs, ShowArgs};
use crate::data::{CsseSource, SeriesSource};
use crate::domain::{Category, ChartConfig};
use crate::error::AppError;
use crate::server::AppState;

pub mod pipeline;

/// Entry point for the `covid19` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `covid19` (or `covid19 --addr ...`) to start the server.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    crate::logging::init(cli.verbose)?;
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Serve(args) => handle_serve(args, config),
        Command::Render(args) => handle_render(args, &config),
        Command::Show(args) => handle_show(args, &config),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ChartConfig, AppError> {
    match path {
        Some(path) => {
            let config = ChartConfig::from_json_file(path)?;
            info!(path = %path.display(), countries = config.countries.len(), "loaded chart configuration");
            Ok(config)
        }
        None => Ok(ChartConfig::default()),
    }
}

fn handle_serve(args: ServeArgs, config: ChartConfig) -> Result<(), AppError> {
    if let Some(dir) = &args.save_dir {
        std::fs::create_dir_all(dir).map_err(|source| AppError::Io {
            path: dir.clone(),
            source,
        })?;
    }

    let source: Arc<dyn SeriesSource> = Arc::new(CsseSource::from_env());
    let state = AppState::new(source, config).with_save_dir(args.save_dir);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Server(format!("could not start async runtime: {e}")))?;
    runtime.block_on(crate::server::serve(args.addr, state))
}

fn handle_render(args: RenderArgs, config: &ChartConfig) -> Result<(), AppError> {
    let (category, threshold) = resolve_series(&args.series, config);
    let source = CsseSource::from_env();
    let chart = pipeline::generate_chart(&source, config, category, threshold)?;

    let path = args.out.unwrap_or_else(|| PathBuf::from(chart.file_name()));
    std::fs::write(&path, chart.svg.as_bytes()).map_err(|source| AppError::Io {
        path: path.clone(),
        source,
    })?;
    info!(%category, path = %path.display(), "chart written");
    Ok(())
}

fn handle_show(args: ShowArgs, config: &ChartConfig) -> Result<(), AppError> {
    let (category, threshold) = resolve_series(&args.series, config);
    let source = CsseSource::from_env();
    let dataset = pipeline::build_dataset(&source, config, category, threshold)?;
    let markers = pipeline::lockdown_markers(&dataset, config);

    println!("{}", crate::report::format_dataset_header(&dataset));
    println!(
        "{}",
        crate::report::format_dataset_table(&dataset, &markers, &config.countries)
    );

    if let Some(path) = &args.export {
        crate::io::export::write_aligned_csv(path, &dataset, &config.countries)?;
        info!(path = %path.display(), "aligned series exported");
    }
    Ok(())
}

fn resolve_series(args: &SeriesArgs, config: &ChartConfig) -> (Category, f64) {
    let threshold = args
        .threshold
        .unwrap_or_else(|| config.threshold(args.category));
    (args.category, threshold)
}

/// Rewrite argv so `covid19` defaults to `covid19 serve`.
///
/// Rules:
/// - `covid19`                       -> `covid19 serve`
/// - `covid19 --addr 127.0.0.1:9000` -> `covid19 serve --addr 127.0.0.1:9000`
/// - `covid19 --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "serve" | "render" | "show");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "serve flags".
    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
