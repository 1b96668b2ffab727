//! Host property store: an rc file overlaid by environment variables.

use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

pub const MAX_ROWS_KEY: &str = "Q_MAX_ROWS";
pub const MAX_ROWS_DEFAULT: usize = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path())
    }

    pub fn load_from(config_path: PathBuf) -> Self {
        let mut map = default_map();

        // Read the rc file if it exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn host(&self) -> Option<String> {
        self.get("Q_SERVER_HOST")
    }

    pub fn port(&self) -> Option<u16> {
        self.get("Q_SERVER_PORT").and_then(|v| v.parse::<u16>().ok())
    }

    pub fn credentials(&self) -> (Option<String>, Option<String>) {
        (self.get("Q_SERVER_USER"), self.get("Q_SERVER_PASSWORD"))
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "Q_SERVER_HOST",
        "Q_SERVER_PORT",
        "Q_SERVER_USER",
        "Q_SERVER_PASSWORD",
        MAX_ROWS_KEY,
    ];

    KEYS.contains(&k) || k.starts_with("QBRIDGE_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("qbridge").join(".qbridgerc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("Q_SERVER_HOST".into(), "localhost".into());
    m.insert("Q_SERVER_PORT".into(), "5000".into());
    m.insert(MAX_ROWS_KEY.into(), MAX_ROWS_DEFAULT.to_string());

    m
}
