//! Birdspot - bird species detection in photos.
//!
//! Builds a labeled bird-photo dataset from Flickr, drives YOLO fine-tuning
//! and ONNX export through the ultralytics CLI, and runs native ONNX
//! inference that writes annotated images and prediction reports.

#![warn(missing_docs)]

pub mod checklist;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod flickr;
pub mod inference;
pub mod interrupt;
pub mod output;
pub mod pipeline;
pub mod scrape;
#[cfg(feature = "serverless")]
pub mod serve;
pub mod trainer;

use clap::Parser;
use cli::{Cli, Command, PredictArgs};
use config::{Config, InferenceDevice, load_default_config, save_default_config};
use constants::{DEFAULT_TARGET_SPECIES, env as env_vars};
use flickr::FlickrClient;
use inference::Detector;
use pipeline::{
    PredictOptions, ProcessCheck, collect_input_files, output_dir_for, process_file,
    should_process,
};
use scrape::ScrapeOptions;
use std::path::PathBuf;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the birdspot CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.predict.verbose, cli.predict.quiet);

    // First Ctrl+C lets loops stop at a safe point; the second one aborts.
    if let Err(e) = ctrlc::set_handler(|| {
        if interrupt::cancelled() {
            std::process::exit(130); // 128 + SIGINT(2)
        }
        interrupt::request_cancel();
        eprintln!("\ninterrupt received, winding down (press Ctrl+C again to abort)");
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    // Load configuration
    let config = load_default_config()?;
    config::validate_config(&config)?;

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, cli.predict.quiet, &config);
    }

    // Default: predict the given images
    // Show help if no inputs provided
    if cli.inputs.is_empty() {
        cli::help::print_smart_help(&config);
        std::process::exit(0);
    }

    predict_files(&cli.inputs, &cli.predict, &config)
}

/// Run predictions on the given inputs with the given options.
fn predict_files(inputs: &[PathBuf], args: &PredictArgs, config: &Config) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    // CLI overrides fall back to the config file
    let mut model = config.model.clone();
    if let Some(path) = &args.model {
        model.path = Some(path.clone());
    }
    if let Some(labels) = &args.labels {
        model.labels = Some(labels.clone());
    }
    if let Some(confidence) = args.confidence {
        model.confidence = confidence;
    }
    if let Some(iou) = args.iou {
        model.iou = iou;
    }

    // Fail on an unloadable model before touching any inputs
    inference::validate_model_path(&model.resolved_path())?;

    println!("Starting predictions...");
    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    info!("Found {} image(s) to process", files.len());

    // Resolve device
    let device = if args.gpu {
        InferenceDevice::Gpu
    } else if args.cpu {
        InferenceDevice::Cpu
    } else {
        config.inference.device
    };

    info!("Loading model: {}", model.resolved_path().display());
    let mut detector = Detector::from_config(&model, device)?;

    let options = PredictOptions {
        output_dir: args.output_dir.clone(),
        force: args.force,
        save_json: args.save_json,
        debug: args.debug,
        progress_enabled: !args.quiet && args.verbose == 0,
    };

    // Create file progress bar
    let file_progress = progress::create_file_progress(files.len(), options.progress_enabled);

    // Process files
    let mut processed = 0;
    let mut skipped = 0;
    let mut errors = 0;
    let mut total_detections = 0;

    for file in &files {
        if interrupt::cancelled() {
            progress::finish_progress(file_progress, "Interrupted");
            return Err(Error::Interrupted);
        }

        let file_output_dir = output_dir_for(file, options.output_dir.as_deref());

        // Check if should process
        match should_process(file, &file_output_dir, options.force) {
            ProcessCheck::SkipExists => {
                info!("Skipping (output exists): {}", file.display());
                skipped += 1;
                progress::inc_progress(file_progress.as_ref());
                continue;
            }
            ProcessCheck::SkipResultArtifact => {
                info!("Skipping (prior result): {}", file.display());
                skipped += 1;
                progress::inc_progress(file_progress.as_ref());
                continue;
            }
            ProcessCheck::Process => {}
        }

        // Process the file
        match process_file(file, &file_output_dir, &mut detector, &options) {
            Ok(result) => {
                processed += 1;
                total_detections += result.detections;
            }
            Err(e) => {
                error!("Failed to process {}: {e}", file.display());
                errors += 1;
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    // Summary
    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {processed} processed, {skipped} skipped, {errors} errors, \
         {total_detections} total detections in {total_duration:.2}s"
    );
    println!(
        "\nCompleted predictions (took {} seconds)",
        total_duration.round()
    );

    if errors > 0 {
        warn!("{errors} file(s) had errors");
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // Build filter string based on verbosity level.
    // ORT logging is suppressed by default because CUDA fallback is expected in auto mode.
    // Use -v to see ORT warnings, -vv for info, -vvv for full trace.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(), // -vvv: no ORT filter, full trace
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command, quiet: bool, config: &Config) -> Result<()> {
    match command {
        Command::Checklist { url, output } => handle_checklist_command(url, output, config),
        Command::Scrape {
            species,
            species_list,
            dataset_dir,
            per_species,
            concurrency,
            retry_rounds,
        } => handle_scrape_command(
            species,
            species_list,
            dataset_dir,
            per_species,
            concurrency,
            retry_rounds,
            quiet,
            config,
        ),
        Command::Verify { dataset_dir } => handle_verify_command(dataset_dir, config),
        Command::Train {
            data,
            epochs,
            batch,
            devices,
            no_cache,
            save_period,
            base_weights,
        } => handle_train_command(
            data,
            epochs,
            batch,
            devices,
            no_cache,
            save_period,
            base_weights,
            config,
        ),
        Command::Export { weights } => handle_export_command(weights, config),
        Command::Config { action } => handle_config_command(action),
    }
}

/// Handle the `checklist` command.
fn handle_checklist_command(
    url: Option<String>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let url = url.unwrap_or_else(|| config.checklist.url.clone());
    let output = output.unwrap_or_else(|| config.checklist.output.clone());

    let runtime = async_runtime()?;
    let client = scrape::build_client()?;

    info!("Fetching checklist from {url}");
    let species = runtime.block_on(checklist::fetch_checklist(&client, &url))?;
    checklist::write_checklist(&output, &species)?;

    println!("Saved {} species to {}", species.len(), output.display());
    Ok(())
}

/// Handle the `scrape` command.
#[allow(clippy::too_many_arguments)]
fn handle_scrape_command(
    species: Vec<String>,
    species_list: Option<PathBuf>,
    dataset_dir: Option<PathBuf>,
    per_species: Option<u32>,
    concurrency: Option<usize>,
    retry_rounds: Option<usize>,
    quiet: bool,
    config: &Config,
) -> Result<()> {
    let api_key = match config.flickr.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => key.to_string(),
        _ => config::require_env(env_vars::FLICKR_API_KEY, "photo API key for image scraping")?,
    };

    let species = resolve_species(species, species_list.as_deref(), config)?;

    let options = ScrapeOptions {
        dataset_dir: dataset_dir.unwrap_or_else(|| config.scrape.dataset_dir.clone()),
        per_species: per_species.unwrap_or(config.flickr.per_species),
        concurrency: concurrency.unwrap_or(config.scrape.concurrent_downloads),
        max_rounds: u32::try_from(retry_rounds.unwrap_or(config.scrape.max_retry_rounds))
            .map_err(|_| Error::ConfigValidation {
                message: "retry_rounds is out of range".to_string(),
            })?,
        licenses: config.flickr.licenses.clone(),
        quiet,
    };

    info!(
        "Scraping {} photos each for {} species into {}",
        options.per_species,
        species.len(),
        options.dataset_dir.display()
    );

    let runtime = async_runtime()?;
    let client = FlickrClient::new(scrape::build_client()?, api_key);
    let summary = runtime.block_on(scrape::run_scrape(&client, &options, &species))?;

    println!(
        "Downloaded {} images for {} species in {} round(s)",
        summary.images_downloaded, summary.species, summary.rounds
    );
    Ok(())
}

/// Species precedence: explicit flags, then a list file, then the compiled
/// checklist when it exists, then the built-in target list.
fn resolve_species(
    species: Vec<String>,
    species_list: Option<&std::path::Path>,
    config: &Config,
) -> Result<Vec<String>> {
    if !species.is_empty() {
        return Ok(species);
    }
    if let Some(path) = species_list {
        return checklist::read_species_file(path);
    }
    if config.checklist.output.exists() {
        info!(
            "Using compiled checklist {}",
            config.checklist.output.display()
        );
        return checklist::read_species_file(&config.checklist.output);
    }
    Ok(DEFAULT_TARGET_SPECIES
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// Handle the `verify` command.
fn handle_verify_command(dataset_dir: Option<PathBuf>, config: &Config) -> Result<()> {
    let dataset_dir = dataset_dir.unwrap_or_else(|| config.scrape.dataset_dir.clone());

    let report = scrape::scan_dataset(&dataset_dir)?;

    for species in &report.species {
        if species.is_clean() {
            println!("  {}: {} images", species.species, species.valid_images);
        } else {
            println!(
                "  {}: {} images, {} defect(s)",
                species.species,
                species.valid_images,
                species.defects.len()
            );
            for defect in &species.defects {
                println!("    {defect}");
            }
        }
    }
    println!(
        "{} species, {} valid images",
        report.species.len(),
        report.total_valid()
    );

    if report.is_clean() {
        Ok(())
    } else {
        Err(Error::DatasetDefective {
            defects: report.total_defects(),
            species: report.defective_species().len(),
        })
    }
}

/// Handle the `train` command.
#[allow(clippy::too_many_arguments)]
fn handle_train_command(
    data: Option<PathBuf>,
    epochs: Option<u32>,
    batch: Option<u32>,
    devices: Option<Vec<u32>>,
    no_cache: bool,
    save_period: Option<u32>,
    base_weights: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let mut trainer_config = config.trainer.clone();
    if let Some(data) = data {
        trainer_config.data = data;
    }
    if let Some(epochs) = epochs {
        trainer_config.epochs = epochs;
    }
    if let Some(batch) = batch {
        trainer_config.batch = batch;
    }
    if let Some(devices) = devices {
        trainer_config.devices = devices;
    }
    if no_cache {
        trainer_config.cache = false;
    }
    if let Some(save_period) = save_period {
        trainer_config.save_period = save_period;
    }
    if let Some(base_weights) = base_weights {
        trainer_config.base_weights = base_weights;
    }

    trainer::run_training(&trainer_config)
}

/// Handle the `export` command.
fn handle_export_command(weights: Option<PathBuf>, config: &Config) -> Result<()> {
    let exported = trainer::run_export(&config.trainer, weights)?;
    println!("Exported model: {}", exported.display());
    Ok(())
}

/// Handle the `config` command.
fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config::config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  birdspot checklist");
                println!("  birdspot scrape");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config::config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn async_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("Failed to create async runtime: {e}"),
    })
}
