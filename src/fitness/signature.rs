//! Athlete fitness signature (3-parameter capacity model).

use serde::{Deserialize, Serialize};

/// Source of a fitness signature measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureSource {
    /// Calculated from historical data
    Estimated,
    /// Detected from a breakthrough effort
    Breakthrough,
    /// Manually entered by the athlete
    Manual,
}

impl SignatureSource {
    pub fn label(&self) -> &'static str {
        match self {
            SignatureSource::Estimated => "Estimated",
            SignatureSource::Breakthrough => "Breakthrough",
            SignatureSource::Manual => "Manual",
        }
    }
}

impl std::fmt::Display for SignatureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Three-parameter fitness signature.
///
/// Captures an athlete's capacity across the three energy systems the load
/// model tracks:
/// - Threshold Power (TP): sustainable aerobic power in watts
/// - High Intensity Energy (HIE): finite anaerobic work capacity in kJ
/// - Peak Power (PP): instantaneous neuromuscular ceiling in watts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessSignature {
    /// Threshold power in watts
    pub threshold_power: f64,
    /// High-intensity energy in kilojoules
    pub high_intensity_energy: f64,
    /// Peak power in watts
    pub peak_power: f64,
    /// Athlete weight for relative metrics
    pub weight_kg: Option<f64>,
    /// Where this signature came from
    pub source: SignatureSource,
}

impl FitnessSignature {
    /// Create a signature from raw capacity values.
    ///
    /// Negative magnitudes are clamped to zero and peak power is raised to
    /// at least threshold power, so a signature is always internally
    /// consistent.
    pub fn new(threshold_power: f64, high_intensity_energy: f64, peak_power: f64) -> Self {
        let threshold_power = threshold_power.max(0.0);
        Self {
            threshold_power,
            high_intensity_energy: high_intensity_energy.max(0.0),
            peak_power: peak_power.max(threshold_power),
            weight_kg: None,
            source: SignatureSource::Manual,
        }
    }

    /// Estimate a full signature from FTP alone.
    ///
    /// HIE defaults to 0.1 kJ per watt of FTP and PP to twice FTP, the same
    /// starting point used when no breakthrough data exists yet.
    pub fn estimated_from_ftp(ftp: f64) -> Self {
        let ftp = ftp.max(0.0);
        Self {
            threshold_power: ftp,
            high_intensity_energy: ftp * 0.1,
            peak_power: ftp * 2.0,
            weight_kg: None,
            source: SignatureSource::Estimated,
        }
    }

    /// Set the athlete's weight.
    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = (weight_kg > 0.0).then_some(weight_kg);
        self
    }

    /// Set the measurement source.
    pub fn with_source(mut self, source: SignatureSource) -> Self {
        self.source = source;
        self
    }

    /// Threshold power relative to body weight (W/kg).
    pub fn tp_per_kg(&self) -> Option<f64> {
        self.weight_kg.map(|w| self.threshold_power / w)
    }

    /// Peak power relative to body weight (W/kg).
    pub fn pp_per_kg(&self) -> Option<f64> {
        self.weight_kg.map(|w| self.peak_power / w)
    }
}
