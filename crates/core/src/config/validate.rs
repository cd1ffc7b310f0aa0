use super::{types::Config, ConfigError, AMOUNT_RANGE};

/// Validate configuration
/// Currently validates:
/// - Required sections exist (enforced by serde)
/// - `promotion.amount` is within 1..=100
/// - cookie, username and the promotion allow-set are not empty
/// - fetch timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let promotion = &config.promotion;

    if !promotion.amount_in_range() {
        return Err(ConfigError::ValidationError(format!(
            "promotion.amount must be within [{}, {}], got {}",
            AMOUNT_RANGE.start(),
            AMOUNT_RANGE.end(),
            promotion.amount
        )));
    }

    if promotion.cookie.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "promotion.cookie cannot be empty".to_string(),
        ));
    }

    // An empty username would match every page body.
    if promotion.username.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "promotion.username cannot be empty".to_string(),
        ));
    }

    if promotion.promotion.is_empty() {
        return Err(ConfigError::ValidationError(
            "promotion.promotion needs at least one label".to_string(),
        ));
    }

    if config.fetcher.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
