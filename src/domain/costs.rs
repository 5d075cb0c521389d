//! Broker cost profiles and round-trip cost resolution.
//!
//! Cost is modeled as two fixed-rate legs (entry + exit), so the
//! round-trip rate is flat across holding windows.

use serde::Serialize;

use super::error::NetrankError;

pub const DEFAULT_PROFILE: &str = "Default";

/// Per-leg broker cost rates for a named profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrokerProfile {
    pub broker_fee: f64,
    pub cess: f64,
}

/// Look up a named broker profile.
pub fn get_profile(name: &str) -> Result<BrokerProfile, NetrankError> {
    match name {
        DEFAULT_PROFILE => Ok(BrokerProfile {
            broker_fee: 0.001,
            cess: 0.0005,
        }),
        _ => Err(NetrankError::UnknownProfile {
            name: name.to_string(),
        }),
    }
}

/// Resolved cost configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostConfig {
    pub broker_profile: String,
    pub broker_fee: f64,
    pub cess: f64,
    pub round_trip_cost_rate: f64,
}

/// Resolve broker costs and compute the round-trip cost rate.
///
/// Overrides replace fee and/or cess independently, and only when
/// `override_enabled` is set.
pub fn resolve_cost_config(
    broker_profile: &str,
    override_enabled: bool,
    broker_fee: Option<f64>,
    cess: Option<f64>,
) -> Result<CostConfig, NetrankError> {
    let profile = get_profile(broker_profile)?;
    let mut resolved_fee = profile.broker_fee;
    let mut resolved_cess = profile.cess;

    if override_enabled {
        if let Some(fee) = broker_fee {
            resolved_fee = fee;
        }
        if let Some(cess) = cess {
            resolved_cess = cess;
        }
    }

    Ok(CostConfig {
        broker_profile: broker_profile.to_string(),
        broker_fee: resolved_fee,
        cess: resolved_cess,
        round_trip_cost_rate: (resolved_fee + resolved_cess) * 2.0,
    })
}
