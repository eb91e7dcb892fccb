//! Configuration loading and management.

mod env;
mod file;
mod types;
mod validate;

pub use env::{optional_env, project_root, require_env};
pub use file::{
    config_dir, config_file_path, load_config_file, load_default_config, save_config,
    save_default_config,
};
pub use types::{
    ChecklistConfig, Config, FlickrConfig, InferenceConfig, InferenceDevice, ModelConfig,
    ScrapeConfig, TrainerConfig,
};
pub use validate::validate_config;
