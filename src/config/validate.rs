//! Configuration validation.

use crate::config::Config;
use crate::constants::confidence;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_thresholds(config)?;
    validate_counts(config)?;
    Ok(())
}

/// Validate detection threshold ranges.
fn validate_thresholds(config: &Config) -> Result<()> {
    let model = &config.model;

    if !(confidence::MIN..=confidence::MAX).contains(&model.confidence) {
        return Err(Error::ConfigValidation {
            message: format!(
                "confidence must be between {} and {}, got {}",
                confidence::MIN,
                confidence::MAX,
                model.confidence
            ),
        });
    }

    if !(confidence::MIN..=confidence::MAX).contains(&model.iou) {
        return Err(Error::ConfigValidation {
            message: format!(
                "iou must be between {} and {}, got {}",
                confidence::MIN,
                confidence::MAX,
                model.iou
            ),
        });
    }

    // Detection models operate on a stride-32 grid
    if model.input_size == 0 || model.input_size % 32 != 0 {
        return Err(Error::ConfigValidation {
            message: format!(
                "input_size must be a positive multiple of 32, got {}",
                model.input_size
            ),
        });
    }

    Ok(())
}

/// Validate counts that must be at least 1.
fn validate_counts(config: &Config) -> Result<()> {
    if config.model.max_detections == 0 {
        return Err(Error::ConfigValidation {
            message: "max_detections must be at least 1".to_string(),
        });
    }

    if config.scrape.concurrent_downloads == 0 {
        return Err(Error::ConfigValidation {
            message: "concurrent_downloads must be at least 1".to_string(),
        });
    }

    if config.scrape.max_retry_rounds == 0 {
        return Err(Error::ConfigValidation {
            message: "max_retry_rounds must be at least 1".to_string(),
        });
    }

    if config.flickr.per_species == 0 {
        return Err(Error::ConfigValidation {
            message: "per_species must be at least 1".to_string(),
        });
    }

    if config.trainer.epochs == 0 || config.trainer.batch == 0 {
        return Err(Error::ConfigValidation {
            message: "trainer epochs and batch must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_confidence() {
        let mut config = Config::default();
        config.model.confidence = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_iou() {
        let mut config = Config::default();
        config.model.iou = -0.1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_input_size_not_multiple_of_32() {
        let mut config = Config::default();
        config.model.input_size = 600;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_concurrent_downloads() {
        let mut config = Config::default();
        config.scrape.concurrent_downloads = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_epochs() {
        let mut config = Config::default();
        config.trainer.epochs = 0;
        assert!(validate_config(&config).is_err());
    }
}
