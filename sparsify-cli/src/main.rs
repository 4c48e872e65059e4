use clap::Parser;
use serde::{Deserialize, Serialize};
use sparsify::io::{load_gray_array, save_gray_array};
use sparsify::util::{count_from_signed, distance_from_signed};
use sparsify::{
    Array, Extrema1D, Extrema2D, ExtremaPoolIndices1D, ExtremaPoolIndices2D, PoolRemainder,
    SelectConfig, Selector, Shape, SparsifyResult, TopKAbsolutes1D, TopKAbsolutes2D,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Parser, Debug)]
#[command(author, version, about = "Sparsify CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum RemainderConfig {
    #[default]
    Reject,
    Truncate,
    Partial,
}

impl From<RemainderConfig> for PoolRemainder {
    fn from(value: RemainderConfig) -> Self {
        match value {
            RemainderConfig::Reject => PoolRemainder::Reject,
            RemainderConfig::Truncate => PoolRemainder::Truncate,
            RemainderConfig::Partial => PoolRemainder::Partial,
        }
    }
}

/// Operation and its parameters. Numbers are signed so that negative values
/// reach the library's validation instead of failing as a parse error.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind")]
enum OperationConfig {
    #[serde(rename = "topk_absolutes_1d")]
    TopKAbsolutes1D { k: i64 },
    #[serde(rename = "topk_absolutes_2d")]
    TopKAbsolutes2D { k: i64 },
    #[serde(rename = "extrema_pool_indices_1d")]
    ExtremaPoolIndices1D {
        window: i64,
        #[serde(default)]
        remainder: RemainderConfig,
    },
    #[serde(rename = "extrema_pool_indices_2d")]
    ExtremaPoolIndices2D {
        window: [i64; 2],
        #[serde(default)]
        remainder: RemainderConfig,
    },
    #[serde(rename = "extrema_1d")]
    Extrema1D { min_distance: i64 },
    #[serde(rename = "extrema_2d")]
    Extrema2D { min_distance: [i64; 2] },
}

impl OperationConfig {
    fn build(&self, config: SelectConfig) -> SparsifyResult<Box<dyn Selector>> {
        let selector: Box<dyn Selector> = match *self {
            Self::TopKAbsolutes1D { k } => {
                Box::new(TopKAbsolutes1D::new(count_from_signed(k)?).with_config(config))
            }
            Self::TopKAbsolutes2D { k } => {
                Box::new(TopKAbsolutes2D::new(count_from_signed(k)?).with_config(config))
            }
            Self::ExtremaPoolIndices1D { window, remainder } => Box::new(
                ExtremaPoolIndices1D::new(count_from_signed(window)?)
                    .with_remainder(remainder.into())
                    .with_config(config),
            ),
            Self::ExtremaPoolIndices2D { window, remainder } => Box::new(
                ExtremaPoolIndices2D::new((
                    count_from_signed(window[0])?,
                    count_from_signed(window[1])?,
                ))
                .with_remainder(remainder.into())
                .with_config(config),
            ),
            Self::Extrema1D { min_distance } => {
                Box::new(Extrema1D::new(distance_from_signed(min_distance)?).with_config(config))
            }
            Self::Extrema2D { min_distance } => Box::new(
                Extrema2D::new((
                    distance_from_signed(min_distance[0])?,
                    distance_from_signed(min_distance[1])?,
                ))
                .with_config(config),
            ),
        };
        Ok(selector)
    }
}

#[derive(Debug, Deserialize)]
struct Config {
    input_path: String,
    #[serde(default)]
    output_path: Option<String>,
    #[serde(default)]
    parallel: bool,
    operation: OperationConfig,
}

/// JSON array file: `{ "shape": [B, C, W] | [B, C, H, W], "data": [...] }`.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
struct ArrayFile {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl ArrayFile {
    fn into_array(self) -> SparsifyResult<Array> {
        let shape = Shape::from_dims(&self.shape)?;
        Array::from_vec(self.data, shape)
    }
}

impl From<&Array> for ArrayFile {
    fn from(value: &Array) -> Self {
        Self {
            shape: value.shape().dims(),
            data: value.as_slice().to_vec(),
        }
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_input(path: &Path) -> Result<Array, Box<dyn std::error::Error>> {
    if is_image_path(path) {
        return Ok(load_gray_array(path)?);
    }
    let text = fs::read_to_string(path)?;
    let file: ArrayFile = serde_json::from_str(&text)?;
    Ok(file.into_array()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("sparsify=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.input_path.is_empty() {
        return Err("input_path must be set in the config".into());
    }

    let selector = config.operation.build(SelectConfig {
        parallel: config.parallel,
    })?;
    let input = load_input(Path::new(&config.input_path))?;
    let output = selector.select(input.view())?;

    let kept = output.as_slice().iter().filter(|&&v| v != 0.0).count();
    tracing::info!(
        operation = selector.name(),
        shape = ?input.shape().dims(),
        nonzero = kept,
        "sparsified input"
    );

    match config.output_path {
        Some(path) if is_image_path(Path::new(&path)) => save_gray_array(output.view(), path)?,
        Some(path) => fs::write(path, serde_json::to_string_pretty(&ArrayFile::from(&output))?)?,
        None => println!("{}", serde_json::to_string_pretty(&ArrayFile::from(&output))?),
    }

    Ok(())
}
