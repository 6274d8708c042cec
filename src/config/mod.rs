use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::random::DEFAULT_SEED;

#[derive(Debug, Clone)]
pub struct Settings {
    // Generation Settings
    pub count: usize,
    pub workers: usize,
    pub seed: u64,

    // Filesystem Settings
    pub secrets_dir: PathBuf,
    pub output_dir: PathBuf,

    // Logging
    pub log_json: bool,
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            count: get_env_num("JWTGEN_COUNT", 1000),
            workers: get_env_num("JWTGEN_WORKERS", 0),
            seed: get_env_num("JWTGEN_SEED", DEFAULT_SEED),

            secrets_dir: PathBuf::from(get_env("JWTGEN_SECRETS_DIR", "secrets")),
            output_dir: PathBuf::from(get_env("JWTGEN_OUTPUT_DIR", "output")),

            log_json: get_env_bool("JWTGEN_LOG_JSON", false),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

pub static SETTINGS: Lazy<Settings> = Lazy::new(Settings::new);

pub fn get_settings() -> &'static Settings {
    &SETTINGS
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_num<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
