use crate::error::{DeskError, Result};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_FACULTY_ID: &str = "F001";
pub const DEFAULT_LOG_FILTER: &str = "facultyd=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seed for the demo desk loaded at startup and on `desk.reset`.
    pub seed: u64,
    /// Start with the demo desk rather than empty panels.
    pub sample_data: bool,
    pub faculty_id: String,
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            sample_data: true,
            faculty_id: DEFAULT_FACULTY_ID.to_string(),
            log_filter: None,
        }
    }
}

impl Config {
    /// Reads `FACULTYD_*` from the process environment, after a best-effort
    /// `.env` load.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(raw) = non_blank(lookup("FACULTYD_SEED")) {
            cfg.seed = raw
                .parse::<u64>()
                .map_err(|_| DeskError::Config(format!("FACULTYD_SEED must be an unsigned integer, got '{}'", raw)))?;
        }
        if let Some(raw) = non_blank(lookup("FACULTYD_SAMPLE_DATA")) {
            cfg.sample_data = parse_flag(&raw)
                .ok_or_else(|| DeskError::Config(format!("FACULTYD_SAMPLE_DATA must be true/false, got '{}'", raw)))?;
        }
        if let Some(raw) = non_blank(lookup("FACULTYD_FACULTY_ID")) {
            cfg.faculty_id = raw;
        }
        cfg.log_filter = non_blank(lookup("FACULTYD_LOG"));

        Ok(cfg)
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = Config::from_lookup(lookup(&[])).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = Config::from_lookup(lookup(&[
            ("FACULTYD_SEED", " 7 "),
            ("FACULTYD_SAMPLE_DATA", "off"),
            ("FACULTYD_FACULTY_ID", "F123"),
            ("FACULTYD_LOG", "facultyd=debug"),
        ]))
        .expect("config");
        assert_eq!(cfg.seed, 7);
        assert!(!cfg.sample_data);
        assert_eq!(cfg.faculty_id, "F123");
        assert_eq!(cfg.log_filter.as_deref(), Some("facultyd=debug"));
    }

    #[test]
    fn rejects_bad_seed_and_flag() {
        let e = Config::from_lookup(lookup(&[("FACULTYD_SEED", "-1")])).unwrap_err();
        assert!(matches!(e, DeskError::Config(_)));
        let e = Config::from_lookup(lookup(&[("FACULTYD_SAMPLE_DATA", "maybe")])).unwrap_err();
        assert!(e.to_string().contains("FACULTYD_SAMPLE_DATA"));
    }
}
