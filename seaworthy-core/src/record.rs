//! The NetScore output record.

use serde::{Deserialize, Serialize};

/// One scored repository, shaped for newline-delimited JSON output.
///
/// Field names and declaration order are a compatibility surface for
/// downstream consumers; serialization emits them exactly as listed.
/// A failed metric carries `-1` in both its score and latency fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetScoreRecord {
    /// Repository URL as provided on input.
    #[serde(rename = "URL")]
    pub url: String,
    /// Weighted combination of the five metric scores.
    #[serde(rename = "NetScore")]
    pub net_score: f64,
    /// Total evaluation latency in seconds.
    #[serde(rename = "NetScore_Latency")]
    pub net_score_latency: f64,
    /// Ramp-up time score.
    #[serde(rename = "RampUp")]
    pub ramp_up: f64,
    /// Ramp-up evaluation latency in seconds.
    #[serde(rename = "RampUp_Latency")]
    pub ramp_up_latency: f64,
    /// Correctness score.
    #[serde(rename = "Correctness")]
    pub correctness: f64,
    /// Correctness evaluation latency in seconds.
    #[serde(rename = "Correctness_Latency")]
    pub correctness_latency: f64,
    /// Bus factor score.
    #[serde(rename = "BusFactor")]
    pub bus_factor: f64,
    /// Bus factor evaluation latency in seconds.
    #[serde(rename = "BusFactor_Latency")]
    pub bus_factor_latency: f64,
    /// Responsive maintainer score.
    #[serde(rename = "ResponsiveMaintainer")]
    pub responsive_maintainer: f64,
    /// Responsive maintainer evaluation latency in seconds.
    #[serde(rename = "ResponsiveMaintainer_Latency")]
    pub responsive_maintainer_latency: f64,
    /// License compatibility score.
    #[serde(rename = "License")]
    pub license: f64,
    /// License evaluation latency in seconds.
    #[serde(rename = "License_Latency")]
    pub license_latency: f64,
}

impl NetScoreRecord {
    /// Render the record as one compact JSON line.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
