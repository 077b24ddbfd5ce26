//! Roofline CLI - render vector and scalar roofline diagrams.

#![allow(clippy::doc_markdown)]

mod error;

use clap::{Parser, ValueEnum};
use error::CliError;
use roofline_core::{DiagramPair, Pipeline, RooflineConfig};
use roofline_terminal::{ColorMode, PlotConfig, RooflinePlot, TerminalWriter, Theme};
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

const FALLBACK_SIZE: (u16, u16) = (100, 32);

#[derive(Parser, Debug)]
#[command(name = "roofline")]
#[command(about = "Roofline diagrams for vectorized and scalar loops from an Advisor survey")]
#[command(version)]
struct Cli {
    /// Survey export (per-loop CSV)
    #[arg(long)]
    survey: PathBuf,

    /// Roofs export (Name, Type, Bandwidth CSV)
    #[arg(long)]
    roofs: PathBuf,

    /// TOML file with [survey], [roofs], [builder] and [plot] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Diagram width in cells (default: terminal width)
    #[arg(long)]
    width: Option<u16>,

    /// Diagram height in cells (default: terminal height)
    #[arg(long)]
    height: Option<u16>,

    /// Colour mode: auto, truecolor, 256, 16 or mono
    #[arg(long, default_value = "auto")]
    color: ColorMode,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Both diagrams drawn in the terminal
    Text,
    /// The diagram descriptions as JSON
    Json,
}

/// The `[plot]` table of a config file; the other tables belong to
/// [`RooflineConfig`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlotSection {
    plot: PlotConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "roofline failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<(RooflineConfig, PlotConfig), CliError> {
    let Some(path) = path else {
        return Ok((RooflineConfig::default(), PlotConfig::default()));
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let core = RooflineConfig::from_toml_str(&text)?;
    let section: PlotSection = toml::from_str(&text).map_err(|source| CliError::PlotConfig {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "loaded configuration");
    Ok((core, section.plot))
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let (config, plots) = load_config(cli.config.as_deref())?;
    let pipeline = Pipeline::new(config)?;
    let diagrams = pipeline.run_paths(&cli.survey, &cli.roofs)?;

    match cli.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &diagrams)?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Text => {
            let theme = Theme::by_name(&plots.theme)
                .ok_or_else(|| CliError::UnknownTheme(plots.theme.clone()))?;
            let size = plot_size(cli.width, cli.height);
            draw(&diagrams, &plots, &theme, size, cli.color, out)
        }
    }
}

/// Explicit size wins, then the terminal's, then a fixed fallback.
fn plot_size(width: Option<u16>, height: Option<u16>) -> (u16, u16) {
    let detected = crossterm::terminal::size().unwrap_or(FALLBACK_SIZE);
    (width.unwrap_or(detected.0), height.unwrap_or(detected.1))
}

fn draw(
    diagrams: &DiagramPair,
    plots: &PlotConfig,
    theme: &Theme,
    (width, height): (u16, u16),
    mode: ColorMode,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut writer = TerminalWriter::new(out, mode);
    for (i, diagram) in diagrams.iter().enumerate() {
        if i > 0 {
            writer.write_blank_line()?;
        }
        let buffer = RooflinePlot::new(diagram, plots.style(diagram.cohort))
            .with_theme(theme.clone())
            .render(width, height)?;
        writer.write_buffer(&buffer)?;
    }
    Ok(())
}
