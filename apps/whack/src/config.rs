use std::{fs, path::Path, time::Duration};

use game_core::{
    controller::DEFAULT_TICK_INTERVAL,
    high_scores::{DEFAULT_CAPACITY, MAX_HIGH_SCORES},
    session::{DEFAULT_ROUND_SECONDS, MAX_ROUND_SECONDS, SEED_HIGH_SCORES},
    ControllerConfig, SessionConfig,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "whack.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub round_seconds: u32,
    pub tick_millis: u64,
    pub seed_high_scores: Vec<u32>,
    pub high_score_capacity: usize,
    pub rng_seed: Option<u64>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            tick_millis: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            seed_high_scores: SEED_HIGH_SCORES.to_vec(),
            high_score_capacity: DEFAULT_CAPACITY,
            rng_seed: None,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    round_seconds: Option<u32>,
    tick_millis: Option<u64>,
    seed_high_scores: Option<Vec<u32>>,
    high_score_capacity: Option<usize>,
    rng_seed: Option<u64>,
    log_filter: Option<String>,
}

impl Settings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            round_seconds: self.round_seconds,
            seed_high_scores: self.seed_high_scores.clone(),
            high_score_capacity: self.high_score_capacity,
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            session: self.session_config(),
            tick_interval: Duration::from_millis(self.tick_millis),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Loads defaults, then the optional TOML file, then `APP__*` overrides.
/// Problems are returned as warnings because logging is not up yet.
pub fn load_settings(path: &Path) -> (Settings, Vec<String>) {
    let mut settings = Settings::default();
    let mut warnings = Vec::new();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw, &mut warnings);
    }
    apply_env(&mut settings, |name| std::env::var(name).ok(), &mut warnings);
    normalize(&mut settings, &mut warnings);

    (settings, warnings)
}

fn apply_file(settings: &mut Settings, raw: &str, warnings: &mut Vec<String>) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warnings.push(format!("ignoring unreadable config file: {err}"));
            return;
        }
    };

    if let Some(v) = file_cfg.round_seconds {
        settings.round_seconds = v;
    }
    if let Some(v) = file_cfg.tick_millis {
        settings.tick_millis = v;
    }
    if let Some(v) = file_cfg.seed_high_scores {
        settings.seed_high_scores = v;
    }
    if let Some(v) = file_cfg.high_score_capacity {
        settings.high_score_capacity = v;
    }
    if file_cfg.rng_seed.is_some() {
        settings.rng_seed = file_cfg.rng_seed;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<String>,
) {
    let mut parsed = |name: &str| -> Option<u64> {
        let raw = lookup(name)?;
        match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(err) => {
                warnings.push(format!("ignoring {name}={raw:?}: {err}"));
                None
            }
        }
    };

    if let Some(v) = parsed("APP__ROUND_SECONDS") {
        settings.round_seconds = u32::try_from(v).unwrap_or(u32::MAX);
    }
    if let Some(v) = parsed("APP__TICK_MILLIS") {
        settings.tick_millis = v;
    }
    if let Some(v) = parsed("APP__RNG_SEED") {
        settings.rng_seed = Some(v);
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        if !v.trim().is_empty() {
            settings.log_filter = v;
        }
    }
}

fn normalize(settings: &mut Settings, warnings: &mut Vec<String>) {
    let defaults = Settings::default();

    if settings.round_seconds == 0 {
        warnings.push("round_seconds must be positive; using default".into());
        settings.round_seconds = defaults.round_seconds;
    }
    if settings.round_seconds > MAX_ROUND_SECONDS {
        warnings.push(format!(
            "round_seconds {} exceeds {MAX_ROUND_SECONDS}; capping",
            settings.round_seconds
        ));
        settings.round_seconds = MAX_ROUND_SECONDS;
    }
    if settings.tick_millis == 0 {
        warnings.push("tick_millis must be positive; using default".into());
        settings.tick_millis = defaults.tick_millis;
    }
    if settings.high_score_capacity == 0 {
        warnings.push("high_score_capacity must be positive; using default".into());
        settings.high_score_capacity = defaults.high_score_capacity;
    }
    if settings.high_score_capacity > MAX_HIGH_SCORES {
        warnings.push(format!(
            "high_score_capacity {} exceeds {MAX_HIGH_SCORES}; capping",
            settings.high_score_capacity
        ));
        settings.high_score_capacity = MAX_HIGH_SCORES;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
