use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use pin_palette::{
    ExtractOptions, Palette, PaletteMatch, Resample, extract_palette_bytes_with, parse_hex_list,
    to_hex,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Extract dominant colors from pin photos and score them against a reference.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dominant-color palette of each input image
    Extract {
        /// One or more input image paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },
    /// Score a candidate image against a reference image or palette
    Compare {
        /// Candidate image path
        candidate: PathBuf,

        /// Reference image path
        #[arg(short, long, required_unless_present = "reference_hex", conflicts_with = "reference_hex")]
        reference: Option<PathBuf>,

        /// Comma-separated list of hex colors to use as the reference palette
        #[arg(short = 'c', long)]
        reference_hex: Option<String>,

        #[command(flatten)]
        extract: ExtractArgs,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Number of dominant colors to keep
    #[arg(short = 'k', long, default_value_t = 4)]
    n_colors: usize,

    /// Longest side of the working image
    #[arg(short = 's', long, default_value_t = 100)]
    max_dimension: u32,

    /// Resampling filter used when shrinking
    #[arg(long, value_enum, default_value_t = Resample::Triangle)]
    filter: Resample,
}

impl From<&ExtractArgs> for ExtractOptions {
    fn from(args: &ExtractArgs) -> Self {
        ExtractOptions {
            palette_size: args.n_colors,
            max_dimension: args.max_dimension,
            filter: args.filter,
        }
    }
}

fn palette_of(path: &Path, options: &ExtractOptions) -> Result<Palette> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    extract_palette_bytes_with(&bytes, options)
        .with_context(|| format!("extracting palette from {}", path.display()))
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Extract { inputs, extract } => {
            let options = ExtractOptions::from(extract);
            for input in inputs {
                let palette = palette_of(input, &options)?;
                let hex: Vec<String> = palette.into_iter().map(to_hex).collect();
                print_json(
                    &json!({ "input": input.display().to_string(), "palette": hex }),
                    cli.pretty,
                )?;
            }
        }
        Command::Compare {
            candidate,
            reference,
            reference_hex,
            extract,
        } => {
            let options = ExtractOptions::from(extract);
            let reference = match (reference, reference_hex) {
                (Some(path), _) => palette_of(path, &options)?,
                (None, Some(hex)) => parse_hex_list(hex).context("parsing --reference-hex")?,
                (None, None) => bail!("either --reference or --reference-hex is required"),
            };
            let candidate = palette_of(candidate, &options)?;
            let matched = PaletteMatch::new(&reference, &candidate);
            print_json(&serde_json::to_value(&matched)?, cli.pretty)?;
        }
    }

    Ok(())
}
