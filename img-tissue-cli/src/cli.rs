use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use img_tissue_core::{prelude::GridSize, Scalar};

#[derive(Clone, Debug, Parser)]
#[command(name = "img-tissue", version, author, about)]
#[command(help_template = "\
{name} {version}
{about}
{author}

{usage-heading}
{tab}{usage}

{all-args}
")]
pub struct CliArgs {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Clone, Debug, Args)]
pub struct CommonArgs {
    /// Input image file path
    #[arg(short, long, value_name = "PATH", value_hint(ValueHint::FilePath))]
    pub input: PathBuf,

    /// Output file path (directory for frame sequences)
    #[arg(short, long, value_name = "PATH", value_hint(ValueHint::AnyPath))]
    pub output: PathBuf,

    /// Settings file (YAML or JSON)
    #[arg(long, value_name = "PATH", value_hint(ValueHint::FilePath))]
    pub settings: Option<PathBuf>,

    /// Grid columns, clamped to 2..=20
    #[arg(long, value_name = "NUMBER", value_parser = GridSize::parse_dimension)]
    pub columns: Option<usize>,

    /// Grid rows, clamped to 2..=20
    #[arg(long, value_name = "NUMBER", value_parser = GridSize::parse_dimension)]
    pub rows: Option<usize>,

    /// Accessible title
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Display settings used and debug logs
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum FrameFormat {
    #[default]
    Png,
    Svg,
}

impl FrameFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

#[derive(Clone, Debug, Subcommand)]
pub enum Action {
    /// Produce tissue mesh
    #[command(help_template = "\
{name}
{about}

{usage-heading}
{tab}{usage}

{all-args}
")]
    Mesh {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        format: Format,
    },

    /// Render zoom animation into frame sequence
    #[command(help_template = "\
{name}
{about}

{usage-heading}
{tab}{usage}

{all-args}
")]
    Render {
        #[command(flatten)]
        common: CommonArgs,

        /// Focal point X in image pixels
        #[arg(short, value_name = "NUMBER", allow_negative_numbers = true)]
        x: Scalar,

        /// Focal point Y in image pixels
        #[arg(short, value_name = "NUMBER", allow_negative_numbers = true)]
        y: Scalar,

        /// Single vertex travel duration in milliseconds
        #[arg(long, value_name = "NUMBER")]
        duration: Option<Scalar>,

        /// Frames per second
        #[arg(long, value_name = "INTEGER", default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        fps: u32,

        /// Zoom out instead of in
        #[arg(long)]
        zoom_out: bool,

        /// Frame file format
        #[arg(long, value_name = "FORMAT", default_value_t)]
        frames: FrameFormat,

        /// Image reference written into SVG frames; defaults to input path
        #[arg(long, value_name = "URL")]
        href: Option<String>,
    },
}

impl Action {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::Mesh { common, .. } | Self::Render { common, .. } => common,
        }
    }
}

#[derive(Clone, Debug, Args)]
#[group(required = true)]
pub struct Format {
    /// Produce JSON mesh
    #[arg(long)]
    pub json: bool,

    /// Produce pretty JSON mesh
    #[arg(long)]
    pub json_pretty: bool,

    /// Produce YAML mesh
    #[arg(long)]
    pub yaml: bool,

    /// Produce OBJ mesh
    #[arg(long)]
    pub obj: bool,

    /// Produce PNG mesh visualization
    #[arg(long)]
    pub png: bool,
}
