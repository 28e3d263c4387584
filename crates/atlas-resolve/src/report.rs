use std::collections::BTreeMap;

use serde::Serialize;

use crate::resolver::{Resolution, ResolutionMethod};

/// A fuzzy match worth reviewing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyMatch {
    pub canonical: String,
    pub score: f64,
}

/// Per-method tallies of a resolution pass plus the distinct names that
/// were fuzzy-matched or missed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionReport {
    pub counts: BTreeMap<&'static str, usize>,
    pub fuzzy: BTreeMap<String, FuzzyMatch>,
    pub misses: BTreeMap<String, f64>,
}

impl ResolutionReport {
    pub fn record(&mut self, raw: &str, resolution: &Resolution) {
        *self.counts.entry(resolution.method.label()).or_default() += 1;
        match resolution.method {
            ResolutionMethod::Fuzzy { score } => {
                self.fuzzy.insert(
                    raw.trim().to_string(),
                    FuzzyMatch {
                        canonical: resolution.canonical.clone(),
                        score,
                    },
                );
            }
            ResolutionMethod::Miss { best_score } => {
                self.misses.insert(raw.trim().to_string(), best_score);
            }
            _ => {}
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Logs one warning per distinct unmatched name.
    pub fn log_misses(&self) {
        for (raw, best_score) in &self.misses {
            tracing::warn!(name = %raw, best_score, "country name not resolved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CountryResolver;

    #[test]
    fn tallies_methods_and_distinct_misses() {
        let resolver = CountryResolver::with_defaults().unwrap();
        let mut report = ResolutionReport::default();
        for raw in ["Peru", "Burma", "Kosovo", "Kosovo", "", "Argentna"] {
            report.record(raw, &resolver.resolve(raw));
        }
        assert_eq!(report.total(), 6);
        assert_eq!(report.count("exact"), 1);
        assert_eq!(report.count("alias"), 1);
        assert_eq!(report.count("miss"), 2);
        assert_eq!(report.count("empty"), 1);
        assert_eq!(report.misses.len(), 1);
        assert_eq!(report.fuzzy["Argentna"].canonical, "Argentina");
    }
}
