//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print help message based on configuration state.
pub fn print_smart_help(config: &Config) {
    if config.model.resolved_path().exists() {
        print_configured_help();
    } else {
        print_first_time_help();
    }
}

/// Print detailed setup guide for first-time users.
pub fn print_first_time_help() {
    println!("No trained model found. Get started with birdspot:");
    println!();
    println!("1. Initialize configuration:");
    println!("   birdspot config init");
    println!();
    println!("2. Compile the species checklist:");
    println!("   birdspot checklist");
    println!();
    println!("3. Download training images:");
    println!("   birdspot scrape");
    println!();
    println!("   Requires FLICKR_API_KEY in the environment (or [flickr] api_key");
    println!("   in the config file).");
    println!();
    println!("4. Annotate the dataset, then train and export the model:");
    println!("   birdspot train");
    println!("   birdspot export");
    println!();
    println!("   Both invoke the ultralytics 'yolo' CLI, which must be installed.");
    println!("   Set PROJECT_DIR to the directory holding data.yaml and runs/.");
    println!();
    println!("5. Run predictions:");
    println!("   birdspot mallard.jpg");
    println!();
    println!("Run 'birdspot -h' for all options.");
}

/// Print brief usage reminder for configured users.
pub fn print_configured_help() {
    println!("Usage: birdspot [IMAGES]... [OPTIONS]");
    println!();
    println!("Example: birdspot mallard.jpg -c 0.5 --save-json");
    println!();
    println!("Run 'birdspot -h' for all options.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_printing_does_not_panic() {
        print_first_time_help();
        print_configured_help();
    }
}
