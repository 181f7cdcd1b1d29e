use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use atlaspack::atlas::{Packer, PackerConfig};
use atlaspack::cli::{CliArgs, Command, CompressionLevel, PackArgs};
use atlaspack::config::{CompressConfig, LoadedConfig};
use atlaspack::output::{page_png_filename, save_page_image, write_json};
use atlaspack::sprite::{collect_image_paths, load_images};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // logger may not be initialized yet (e.g. project file failed to load)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();
    let Command::Pack(args) = &cli.command;

    let merged = merge_config_with_args(args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("atlaspack v{}", env!("CARGO_PKG_VERSION"));

    if !merged.output.exists() {
        fs::create_dir_all(&merged.output)?;
    }

    let paths = collect_image_paths(&merged.input)?;
    let images = load_images(&paths)?;
    info!("Loaded {} images", images.len());

    let mut packer = Packer::new(merged.packer);
    let mut names = Vec::with_capacity(images.len());
    for (id, loaded) in (0u64..).zip(&images) {
        packer.add_image(id, &loaded.image);
        names.push(loaded.name.clone());
    }
    drop(images);

    packer.pack().context("packing failed")?;

    let total = packer.pages().len();
    for page in packer.pages() {
        let path = merged
            .output
            .join(page_png_filename(&merged.name, page.index, total));
        save_page_image(page, &path, merged.opaque, merged.compress)?;
        info!("Saved {}", path.display());
    }

    write_json(&packer, &names, &merged.output, &merged.name)?;
    info!("Generated {}.json", merged.name);

    packer.dispose();
    info!("Done!");

    Ok(())
}

/// Merged configuration from CLI args and optional project file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: PathBuf,
    name: String,
    packer: PackerConfig,
    opaque: bool,
    verbose: bool,
    compress: Option<CompressionLevel>,
}

/// Merge project file values with CLI arguments.
/// CLI arguments always take precedence over project values.
fn merge_config_with_args(args: &PackArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load project: {}", config_path.display()))?,
        )
    } else {
        None
    };
    let project = loaded_config
        .as_ref()
        .map(|lc| lc.config.clone())
        .unwrap_or_default();

    let input = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_inputs()
            .context("failed to resolve input files from project")?
    } else {
        Vec::new()
    };

    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let name = args.name.clone().unwrap_or(project.name.clone());

    let packer = PackerConfig {
        max_size: args.max_size.unwrap_or(project.max_size),
        power_of_two: !args.no_pot && project.power_of_two,
        spacing: args.spacing.unwrap_or(project.spacing),
        padding: args.padding.unwrap_or(project.padding),
    };

    let compress = args.compress.or_else(|| {
        project.compress.as_ref().map(|c| match c {
            CompressConfig::Level(n) => CompressionLevel::Level(*n),
            CompressConfig::Max(_) => CompressionLevel::Max,
        })
    });

    Ok(MergedConfig {
        input,
        output,
        name,
        packer,
        opaque: args.opaque || project.opaque,
        verbose: args.verbose,
        compress,
    })
}
