//! Starfall CLI - headless runs and tooling for the Starfall engine

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{collide, config, simulate};

#[derive(Parser)]
#[command(name = "starfall")]
#[command(about = "Pseudo-3D vector game engine, headless tooling", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted match without a renderer and print a summary
    Simulate {
        /// Number of frames to run
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Path to game config file
        #[arg(long)]
        config: Option<String>,

        /// Random seed, overrides the config
        #[arg(long)]
        seed: Option<u64>,

        /// Print the scene tree after the run
        #[arg(long)]
        tree: bool,
    },

    /// Validate a config file and print the effective settings
    Config {
        /// Path to game config file
        #[arg(long)]
        config: Option<String>,

        /// Output format (toml or json)
        #[arg(long, default_value = "toml", value_parser = parse_format)]
        format: String,
    },

    /// Test a line segment against a polygon
    Collide {
        /// Segment endpoints (comma-separated x1,y1,x2,y2)
        #[arg(long, value_parser = parse_segment)]
        segment: [f64; 4],

        /// Polygon points (semicolon-separated x,y pairs, e.g. "0,0;4,0;0,4")
        #[arg(long, value_parser = parse_polygon)]
        polygon: PolygonArg,
    },
}

/// Parsed `--polygon` value
#[derive(Debug, Clone, PartialEq)]
struct PolygonArg(Vec<[f64; 2]>);

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "toml" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: toml, json", s)),
    }
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {}", part.trim(), e))
        })
        .collect()
}

fn parse_segment(s: &str) -> Result<[f64; 4], String> {
    let values = parse_numbers(s)?;
    match values.as_slice() {
        &[x1, y1, x2, y2] => Ok([x1, y1, x2, y2]),
        _ => Err(format!("expected 4 comma-separated values, got {}", values.len())),
    }
}

fn parse_polygon(s: &str) -> Result<PolygonArg, String> {
    let points = s
        .split(';')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            let values = parse_numbers(p)?;
            match values.as_slice() {
                &[x, y] => Ok([x, y]),
                _ => Err(format!("expected an x,y pair, got '{}'", p.trim())),
            }
        })
        .collect::<Result<Vec<_>, String>>()?;
    if points.len() < 3 {
        return Err(format!("a polygon needs at least 3 points, got {}", points.len()));
    }
    Ok(PolygonArg(points))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Simulate {
            frames,
            config,
            seed,
            tree,
        } => simulate::run(simulate::SimulateArgs {
            frames,
            config,
            seed,
            tree,
        }),
        Commands::Config { config, format } => config::run(config.as_deref(), &format),
        Commands::Collide { segment, polygon } => collide::run(segment, &polygon.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_segment() {
        assert_eq!(parse_segment("1, 2,3,4.5").unwrap(), [1.0, 2.0, 3.0, 4.5]);
        assert!(parse_segment("1,2,3").is_err());
        assert!(parse_segment("1,2,x,4").is_err());
    }

    #[test]
    fn parses_polygon() {
        let poly = parse_polygon("0,0; 4,0; 0,4;").unwrap();
        assert_eq!(poly.0, vec![[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]]);
        assert!(parse_polygon("0,0;4,0").is_err());
        assert!(parse_polygon("0,0,1;4,0;0,4").is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
