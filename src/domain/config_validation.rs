//! Configuration validation.
//!
//! Fail-fast checks over the INI settings before any computation runs.

use crate::domain::costs;
use crate::domain::error::NetrankError;
use crate::domain::ranking;
use crate::ports::config_port::ConfigPort;

pub fn validate_costs_config(config: &dyn ConfigPort) -> Result<(), NetrankError> {
    validate_profile(config)?;
    validate_fee(config, "broker_fee")?;
    validate_fee(config, "cess")?;
    validate_windows(config)?;
    Ok(())
}

pub fn validate_ranking_config(config: &dyn ConfigPort) -> Result<(), NetrankError> {
    validate_objective(config)?;
    validate_liquidity_ceiling(config)?;
    Ok(())
}

fn validate_profile(config: &dyn ConfigPort) -> Result<(), NetrankError> {
    let profile = config
        .get_string("costs", "broker_profile")
        .unwrap_or_else(|| costs::DEFAULT_PROFILE.to_string());
    costs::get_profile(&profile)?;
    Ok(())
}

fn validate_fee(config: &dyn ConfigPort, key: &str) -> Result<(), NetrankError> {
    let value = config.get_double("costs", key, 0.0);
    if value < 0.0 {
        return Err(NetrankError::ConfigInvalid {
            section: "costs".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        });
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), NetrankError> {
    let Some(windows) = config.get_string("costs", "holding_windows") else {
        return Ok(());
    };
    parse_windows(&windows).map(|_| ())
}

/// Parse a comma-separated holding-window list into positive day counts.
pub fn parse_windows(input: &str) -> Result<Vec<u32>, NetrankError> {
    let mut windows = Vec::new();
    for token in input.split(',') {
        let window: u32 = token.trim().parse().map_err(|_| NetrankError::ConfigInvalid {
            section: "costs".to_string(),
            key: "holding_windows".to_string(),
            reason: format!("invalid holding window: {}", token.trim()),
        })?;
        if window == 0 {
            return Err(NetrankError::ConfigInvalid {
                section: "costs".to_string(),
                key: "holding_windows".to_string(),
                reason: "holding windows must be positive".to_string(),
            });
        }
        windows.push(window);
    }
    Ok(windows)
}

fn validate_objective(config: &dyn ConfigPort) -> Result<(), NetrankError> {
    let Some(objective) = config.get_string("ranking", "objective") else {
        return Ok(());
    };
    ranking::objective_weights(&objective).map(|_| ())
}

fn validate_liquidity_ceiling(config: &dyn ConfigPort) -> Result<(), NetrankError> {
    match config.get_string("ranking", "liquidity_ceiling") {
        None => Ok(()),
        Some(ceiling) if ceiling == "A" || ceiling == "B" => Ok(()),
        Some(ceiling) => Err(NetrankError::ConfigInvalid {
            section: "ranking".to_string(),
            key: "liquidity_ceiling".to_string(),
            reason: format!("expected A or B, got {ceiling}"),
        }),
    }
}
