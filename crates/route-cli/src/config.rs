//! Simulator configuration from environment.

use route_core::animator::{
    AnimatorConfig, DEFAULT_RECENTER_EVERY, DEFAULT_SEGMENT_DURATION_MS, DEFAULT_STEPS_PER_SEGMENT,
};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub steps_per_segment: u32,
    pub segment_duration_ms: u64,
    pub recenter_every: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steps_per_segment: DEFAULT_STEPS_PER_SEGMENT,
            segment_duration_ms: DEFAULT_SEGMENT_DURATION_MS,
            recenter_every: DEFAULT_RECENTER_EVERY,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            steps_per_segment: lookup("FLIGHT_STEPS_PER_SEGMENT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.steps_per_segment),
            segment_duration_ms: lookup("FLIGHT_SEGMENT_DURATION_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.segment_duration_ms),
            recenter_every: lookup("FLIGHT_RECENTER_EVERY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.recenter_every),
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        steps_per_segment: Option<u32>,
        segment_duration_ms: Option<u64>,
        recenter_every: Option<u32>,
    ) -> Self {
        if let Some(steps) = steps_per_segment {
            self.steps_per_segment = steps;
        }
        if let Some(ms) = segment_duration_ms {
            self.segment_duration_ms = ms;
        }
        if let Some(every) = recenter_every {
            self.recenter_every = every;
        }
        self
    }

    pub fn animator_config(&self) -> AnimatorConfig {
        AnimatorConfig {
            steps_per_segment: self.steps_per_segment,
            segment_duration_ms: self.segment_duration_ms,
            recenter_every: self.recenter_every,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.animator_config(), AnimatorConfig::default());
    }

    #[test]
    fn lookup_values_are_parsed() {
        let vars: HashMap<&str, &str> = [
            ("FLIGHT_STEPS_PER_SEGMENT", "20"),
            ("FLIGHT_SEGMENT_DURATION_MS", "2000"),
            ("FLIGHT_RECENTER_EVERY", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.steps_per_segment, 20);
        assert_eq!(config.segment_duration_ms, 2_000);
        assert_eq!(config.recenter_every, DEFAULT_RECENTER_EVERY);
    }

    #[test]
    fn overrides_win_over_environment() {
        let config = Config::default().with_overrides(Some(10), None, Some(1));
        assert_eq!(config.steps_per_segment, 10);
        assert_eq!(config.segment_duration_ms, DEFAULT_SEGMENT_DURATION_MS);
        assert_eq!(config.recenter_every, 1);
    }
}
