use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use moth_segment_rust_lib::config::Config;
use moth_segment_rust_lib::gui;
use moth_segment_rust_lib::image_io::load_image;
use moth_segment_rust_lib::image_utils::resize_image;
use moth_segment_rust_lib::labeling::LabelSession;
use moth_segment_rust_lib::output::write_outputs;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Symmetry-guided wing and body segmentation of specimen photos")]
struct Args {
    /// Path to the specimen image
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Half-width of the mirror line search window (overwrites config)
    #[clap(short, long)]
    scope: Option<u32>,

    /// Write the effective configuration to this TOML file before starting
    #[clap(long)]
    save_config: Option<String>,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Load configuration, falling back to defaults when the file is absent
    let mut config = if Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        log::warn!("Config file {} not found, using defaults", args.config);
        Config::default()
    };

    // Override config with command-line arguments
    if let Some(input) = args.input {
        config.input_path = input;
    }
    if let Some(output) = args.output {
        config.output_base_dir = output;
    }
    if let Some(scope) = args.scope {
        config.symmetry_scope = scope;
    }

    config.validate()?;

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        log::info!("Saved configuration to {}", path);
    }

    let input = load_image(&config.input_path)
        .with_context(|| format!("Failed to load specimen image {}", config.input_path))?;
    let image = match config.resize_dimensions {
        Some(dimensions) => {
            log::info!("Resizing image to {}x{}", dimensions[0], dimensions[1]);
            resize_image(&input.image, dimensions)
        }
        None => input.image,
    };

    let start_time = Instant::now();
    let session = LabelSession::new(image, &config)?;
    log::info!(
        "Mirror line at x={} (estimated in {:.2} seconds)",
        session.axis().x,
        start_time.elapsed().as_secs_f64()
    );

    let session = gui::run_gui(session, &config)?;

    match session.regions() {
        Some(regions) => {
            let dir = write_outputs(regions, &config.output_base_dir, &input.filename)
                .context("Failed to save segmentation results")?;
            println!("Segmentation saved to {}", dir.display());
        }
        None => log::warn!("No regions were split, nothing saved"),
    }

    Ok(())
}
