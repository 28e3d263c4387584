//! Metric definitions and their row-wise formulas.

use serde::{Deserialize, Serialize};

/// How a metric combines its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Formula {
    /// `a / b`
    Ratio,
    /// `100 * a / b`
    RatioPercent,
    /// `scale * a / b`
    PerCapita { scale: f64 },
    /// `log10(a / b)`
    Log10Ratio,
    /// `log10(a)`
    Log10,
    /// `a`, usually under a cleaner name
    Copy,
}

impl Formula {
    pub fn arity(self) -> usize {
        match self {
            Self::Log10 | Self::Copy => 1,
            Self::Ratio | Self::RatioPercent | Self::PerCapita { .. } | Self::Log10Ratio => 2,
        }
    }

    /// Applies the formula to one row. Inputs outside the formula's domain
    /// give `None`.
    pub fn apply(self, inputs: &[Option<f64>]) -> Option<f64> {
        let a = inputs.first().copied().flatten()?;
        let ratio = || {
            let b = inputs.get(1).copied().flatten()?;
            (a >= 0.0 && b > 0.0).then(|| a / b)
        };
        let value = match self {
            Self::Ratio => ratio()?,
            Self::RatioPercent => ratio()? * 100.0,
            Self::PerCapita { scale } => ratio()? * scale,
            Self::Log10Ratio => ratio().filter(|r| *r > 0.0)?.log10(),
            Self::Log10 => (a > 0.0).then(|| a.log10())?,
            Self::Copy => a,
        };
        value.is_finite().then_some(value)
    }
}

/// A computed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetric {
    pub name: String,
    pub inputs: Vec<String>,
    pub formula: Formula,
    /// Columns dropped once this metric has been computed.
    #[serde(default)]
    pub supersedes: Vec<String>,
}

impl DerivedMetric {
    pub fn new(name: &str, inputs: &[&str], formula: Formula) -> Self {
        Self {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
            formula,
            supersedes: Vec::new(),
        }
    }

    pub fn superseding(mut self, columns: &[&str]) -> Self {
        self.supersedes = columns.iter().map(|s| (*s).to_string()).collect();
        self
    }
}

/// Indicators the dashboard views read by name.
pub fn builtin_metrics() -> Vec<DerivedMetric> {
    vec![
        DerivedMetric::new(
            "population_density",
            &["Total_Population", "Total_Area_km"],
            Formula::Ratio,
        ),
        DerivedMetric::new(
            "road_density",
            &["Roadways_km", "Total_Area_km"],
            Formula::Log10Ratio,
        ),
        DerivedMetric::new(
            "internet_penetration_rate",
            &["Internet_Users_Total", "Total_Population"],
            Formula::RatioPercent,
        ),
        DerivedMetric::new(
            "broadband_fixed_subscriptions_rate",
            &["Broadband_Fixed_Subscriptions_Total", "Total_Population"],
            Formula::PerCapita { scale: 100.0 },
        ),
        DerivedMetric::new(
            "electricity_access_percent",
            &["Electricity_Access [%]"],
            Formula::Copy,
        )
        .superseding(&["Electricity_Access [%]"]),
        DerivedMetric::new(
            "irrigated_land_percent",
            &["Irrigated_Land_km", "Land_Area_km"],
            Formula::RatioPercent,
        ),
    ]
}
