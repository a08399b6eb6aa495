//! Configuration validation module
//!
//! Validation rules:
//! - telegram.token non-empty
//! - data.url is http(s)
//! - message.template non-empty
//! - schedule.interval_secs >= 1
//! - scheduled targets unique, message_id >= 1
//! - dispatch.queue_capacity >= 1

use std::collections::HashSet;

use contracts::{RelayConfig, RelayError};

/// Validate a RelayConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &RelayConfig) -> Result<(), RelayError> {
    validate_telegram(config)?;
    validate_data(config)?;
    validate_message(config)?;
    validate_schedule(config)?;
    validate_dispatch(config)?;
    Ok(())
}

fn validate_telegram(config: &RelayConfig) -> Result<(), RelayError> {
    if config.telegram.token.trim().is_empty() {
        return Err(RelayError::config_validation(
            "telegram.token",
            "token must not be empty",
        ));
    }
    Ok(())
}

fn validate_data(config: &RelayConfig) -> Result<(), RelayError> {
    let url = config.data.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(RelayError::config_validation(
            "data.url",
            format!("expected http(s) url, got '{url}'"),
        ));
    }
    Ok(())
}

fn validate_message(config: &RelayConfig) -> Result<(), RelayError> {
    if config.message.template.trim().is_empty() {
        return Err(RelayError::config_validation(
            "message.template",
            "template must not be empty",
        ));
    }
    if config.message.command_prefix.trim().is_empty() {
        return Err(RelayError::config_validation(
            "message.command_prefix",
            "command prefix must not be empty",
        ));
    }
    Ok(())
}

fn validate_schedule(config: &RelayConfig) -> Result<(), RelayError> {
    if config.schedule.interval_secs == 0 {
        return Err(RelayError::config_validation(
            "schedule.interval_secs",
            "interval must be >= 1 second",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, target) in config.schedule.targets.iter().enumerate() {
        if target.message_id < 1 {
            return Err(RelayError::config_validation(
                format!("schedule.targets[{idx}].message_id"),
                format!("message_id must be >= 1, got {}", target.message_id),
            ));
        }
        if !seen.insert((target.chat_id, target.thread_id, target.message_id)) {
            return Err(RelayError::config_validation(
                format!("schedule.targets[{idx}]"),
                "duplicate scheduled target",
            ));
        }
    }
    Ok(())
}

fn validate_dispatch(config: &RelayConfig) -> Result<(), RelayError> {
    if config.dispatch.queue_capacity == 0 {
        return Err(RelayError::config_validation(
            "dispatch.queue_capacity",
            "queue capacity must be >= 1",
        ));
    }
    Ok(())
}
