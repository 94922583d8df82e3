//! Atlas Tool CLI
//!
//! Pack images or rendered numbers into a grid texture atlas.

use atlas_tool::{
    atlas_from_directory, atlas_from_files, atlas_from_font, AtlasConfig, AtlasOutput,
    FontOptions, TextureFormat,
};
use clap::{ArgGroup, Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "atlas-tool")]
#[command(author, version, about = "Pack images or rendered numbers into a grid texture atlas", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["directory", "files", "font"])))]
struct Cli {
    /// Input directory (non-recursive)
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Comma-separated list of input files
    #[arg(short, long, value_delimiter = ',')]
    files: Vec<PathBuf>,

    /// Font file or family name; renders the numbers 0..count
    #[arg(short = 't', long, requires = "count")]
    font: Option<String>,

    /// Element size in pixels (0 = detect from inputs); glyph pixel size with --font
    #[arg(short, long)]
    size: Option<u32>,

    /// Number of glyph elements to render
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Render glyphs in bold
    #[arg(long, requires = "font")]
    bold: bool,

    /// Render glyphs in italics
    #[arg(long, requires = "font")]
    italic: bool,

    /// Drop shadow offset for glyphs, in pixels
    #[arg(long, value_name = "PX", requires = "font")]
    shadow: Option<u32>,

    /// Border around each element in pixels [default: 1]
    #[arg(short, long)]
    border: Option<u32>,

    /// Round the atlas edge up to a multiple of this [default: 4]
    #[arg(long)]
    block_align: Option<u32>,

    /// Output texture path; the sidecar is written next to it as .inc
    #[arg(short, long)]
    output: PathBuf,

    /// Output format
    #[arg(short = 'x', long, value_enum, default_value = "auto")]
    format: FormatArg,

    /// JSON job file with default settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write only the base level (no mip chain)
    #[arg(long)]
    no_mipmaps: bool,

    /// Also write a PNG preview of the uncompressed atlas
    #[arg(long)]
    preview: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Source format for images, RGBA8 for glyphs
    Auto,
    Rgba8,
    Bgra8,
    Bc1,
    Bc2,
    Bc3,
    Bc4,
    Bc5,
}

impl FormatArg {
    fn texture_format(self) -> Option<TextureFormat> {
        match self {
            FormatArg::Auto => None,
            FormatArg::Rgba8 => Some(TextureFormat::Rgba8),
            FormatArg::Bgra8 => Some(TextureFormat::Bgra8),
            FormatArg::Bc1 => Some(TextureFormat::Bc1),
            FormatArg::Bc2 => Some(TextureFormat::Bc2),
            FormatArg::Bc3 => Some(TextureFormat::Bc3),
            FormatArg::Bc4 => Some(TextureFormat::Bc4),
            FormatArg::Bc5 => Some(TextureFormat::Bc5),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    info!("Loading Atlas Tool...");
    let config = build_config(&cli)?;
    debug!("Using configuration: {:?}", config);

    let output = build_atlas(&cli, config)?;

    let written = output.write(&cli.output, cli.preview)?;
    println!(
        "Exported {} atlas ({} bytes, {} mip levels) to {:?}",
        written.format, written.texture_bytes, written.mip_levels, written.texture_path
    );
    println!("  Sidecar: {:?}", written.sidecar_path);
    if let Some(preview) = &written.preview_path {
        println!("  Preview: {:?}", preview);
    }

    Ok(())
}

/// Job file settings (if any) with command line flags layered on top.
fn build_config(cli: &Cli) -> Result<AtlasConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AtlasConfig::from_json_file(path)?,
        None => AtlasConfig::default(),
    };

    // In font mode -s is the glyph size, not the cell size
    if cli.font.is_none() {
        if let Some(size) = cli.size {
            config = config.with_cell_size(size);
        }
    }
    if let Some(border) = cli.border {
        config = config.with_border(border);
    }
    if let Some(align) = cli.block_align {
        config = config.with_block_align(align);
    }
    if let Some(format) = cli.format.texture_format() {
        config = config.with_format(format);
    }
    if cli.no_mipmaps {
        config = config.with_mipmaps(false);
    }

    config.validate()?;
    Ok(config)
}

fn build_atlas(cli: &Cli, config: AtlasConfig) -> Result<AtlasOutput, Box<dyn std::error::Error>> {
    if let Some(family) = &cli.font {
        let count = cli.count.unwrap_or(0);
        if count == 0 {
            return Err("--count must be at least 1 in font mode".into());
        }
        let options = FontOptions::new(family.as_str(), count)
            .with_size(cli.size.unwrap_or(0) as f32)
            .with_style(cli.bold, cli.italic)
            .with_shadow(cli.shadow.unwrap_or(0));
        return Ok(atlas_from_font(options, config)?);
    }

    match &cli.directory {
        Some(dir) => Ok(atlas_from_directory(dir, config)?),
        None => Ok(atlas_from_files(cli.files.iter().cloned(), config)?),
    }
}
