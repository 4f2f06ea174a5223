use anyhow::{Context, Result};
use clap::Parser;
use painter_palette::{
    ColorCluster, Dimensions, ExtractorConfig, HttpImageSource, ImageSource, Palette,
    ResizeFilter, extract_palette, try_extract_clusters, try_extract_palette,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print the dominant color palette of one or more images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image file paths or http(s) URLs
    #[arg(required = true)]
    inputs: Vec<String>,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of palette colors
    #[arg(short = 'k', long)]
    num_colors: Option<usize>,

    /// Working resolution, e.g. 1000x1000
    #[arg(long)]
    resize: Option<Dimensions>,

    /// Clustering resolution, e.g. 200x200
    #[arg(short, long)]
    small_size: Option<Dimensions>,

    /// Minimum lightness (exclusive, 0-1)
    #[arg(short, long)]
    brightness: Option<f32>,

    /// Minimum saturation (exclusive, 0-1)
    #[arg(short = 'a', long)]
    saturation: Option<f32>,

    /// Clustering seed
    #[arg(long)]
    seed: Option<u64>,

    /// Use nearest-neighbour resizing instead of bicubic
    #[arg(long)]
    nearest: bool,

    /// HTTP timeout in seconds for URL inputs
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Fail with a non-zero exit code instead of printing an empty palette
    #[arg(long)]
    strict: bool,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,

    /// Include each color's HLS centroid and pixel count (implies --json)
    #[arg(long)]
    clusters: bool,

    /// Log progress
    #[arg(short, long)]
    verbose: bool,

    /// Log every pipeline stage
    #[arg(long)]
    debug: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    input: &'a str,
    palette: Palette,
    #[serde(skip_serializing_if = "Option::is_none")]
    clusters: Option<Vec<ColorCluster>>,
}

impl<'a> Output<'a> {
    fn palette(input: &'a str, palette: Palette) -> Self {
        Self {
            input,
            palette,
            clusters: None,
        }
    }

    fn from_clusters(input: &'a str, clusters: Vec<ColorCluster>) -> Self {
        Self {
            input,
            palette: clusters.iter().map(|c| c.centroid.to_hex()).collect(),
            clusters: Some(clusters),
        }
    }
}

impl Args {
    fn json_output(&self) -> bool {
        self.json || self.clusters
    }

    fn extractor_config(&self) -> Result<ExtractorConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractorConfig::from_json_file(path)?,
            None => ExtractorConfig::default(),
        };

        if let Some(n) = self.num_colors {
            config.num_colors = n;
        }
        if let Some(dims) = self.resize {
            config.resize_dims = dims;
        }
        if let Some(dims) = self.small_size {
            config.small_image_size = dims;
        }
        if let Some(b) = self.brightness {
            config.brightness_threshold = b;
        }
        if let Some(s) = self.saturation {
            config.saturation_threshold = s;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.nearest {
            config.resize_filter = ResizeFilter::Nearest;
        }

        Ok(config)
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter_layer = if args.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else if args.verbose {
        tracing_subscriber::EnvFilter::new("info")
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = args.extractor_config()?;
    if args.strict {
        config.validate().context("invalid configuration")?;
    }
    let source = HttpImageSource::new(Duration::from_secs(args.timeout))?;

    let mut outputs = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        info!(input = %input, "extracting palette");

        let bytes = if is_url(input) {
            source.fetch_image_bytes(input).map_err(anyhow::Error::from)
        } else {
            fs::read(input).with_context(|| format!("unable to read {input}"))
        };

        let output = match (bytes, args.strict) {
            (Ok(bytes), true) if args.clusters => {
                let clusters = try_extract_clusters(&bytes, &config)
                    .with_context(|| format!("palette extraction failed for {input}"))?;
                Output::from_clusters(input, clusters)
            }
            (Ok(bytes), false) if args.clusters => {
                let clusters = try_extract_clusters(&bytes, &config).unwrap_or_else(|e| {
                    warn!(input = %input, error = %e, "palette extraction failed");
                    Vec::new()
                });
                Output::from_clusters(input, clusters)
            }
            (Ok(bytes), true) => Output::palette(
                input,
                try_extract_palette(&bytes, &config)
                    .with_context(|| format!("palette extraction failed for {input}"))?,
            ),
            (Ok(bytes), false) => Output::palette(input, extract_palette(&bytes, &config)),
            (Err(e), true) => return Err(e),
            (Err(e), false) => {
                warn!(input = %input, error = %e, "unable to load input");
                Output::palette(input, Vec::new())
            }
        };

        if !args.json_output() {
            println!("{input}: {}", output.palette.join(" "));
        }
        outputs.push(output);
    }

    if args.json_output() {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use painter_palette::Hls;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::try_parse_from([
            "palette-cli",
            "-k",
            "4",
            "--seed",
            "7",
            "--resize",
            "500x400",
            "-s",
            "64",
            "-b",
            "0.3",
            "--nearest",
            "a.png",
        ])
        .unwrap();

        let config = args.extractor_config().unwrap();
        assert_eq!(config.num_colors, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.resize_dims, Dimensions::new(500, 400));
        assert_eq!(config.small_image_size, Dimensions::square(64));
        assert_eq!(config.brightness_threshold, 0.3);
        assert_eq!(config.resize_filter, ResizeFilter::Nearest);

        let defaults = ExtractorConfig::default();
        assert_eq!(config.saturation_threshold, defaults.saturation_threshold);
        assert_eq!(config.max_iterations, defaults.max_iterations);
    }

    #[test]
    fn test_no_flags_keeps_defaults() {
        let args = Args::try_parse_from(["palette-cli", "a.png", "https://images.example/b.jpg"]).unwrap();

        assert_eq!(args.extractor_config().unwrap(), ExtractorConfig::default());
        assert_eq!(args.timeout, 30);
        assert!(!args.json_output());
        assert!(is_url(&args.inputs[1]));
        assert!(!is_url(&args.inputs[0]));
    }

    #[test]
    fn test_inputs_required() {
        assert!(Args::try_parse_from(["palette-cli", "-k", "3"]).is_err());
    }

    #[test]
    fn test_bad_dimensions_rejected_at_parse() {
        assert!(Args::try_parse_from(["palette-cli", "--resize", "wide", "a.png"]).is_err());
    }

    #[test]
    fn test_clusters_output_implies_json() {
        let args = Args::try_parse_from(["palette-cli", "--clusters", "a.png"]).unwrap();
        assert!(args.json_output());

        let red = Hls::new(0.0, 0.5, 1.0);
        let output = Output::from_clusters(
            "a.png",
            vec![ColorCluster {
                centroid: red,
                population: 12,
            }],
        );
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["palette"][0], "#ff0000");
        assert_eq!(json["clusters"][0]["population"], 12);
        assert_eq!(json["clusters"][0]["centroid"]["saturation"], 1.0);

        let plain = serde_json::to_value(Output::palette("a.png", Vec::new())).unwrap();
        assert!(plain.get("clusters").is_none());
    }
}
