//! Configuration loading and the default config file.
//!
//! Defaults apply when the file is absent; a partial file overrides only the
//! keys it names. Config supplies the settings a fresh tournament starts
//! with, the ranking point values, and the API bind address.

use serde::{Deserialize, Serialize};

use crate::models::{PointRules, ScoringMode, Tournament};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Title a fresh tournament starts with.
    pub title: String,
    /// Scoring mode a fresh tournament starts with.
    pub mode: ScoringMode,
    /// Whether drawn results confirm.
    pub allow_draw: bool,
    /// Whether the schedule view is shown by default.
    pub show_schedule: bool,
    pub points: PointRules,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Tournament".to_string(),
            mode: ScoringMode::Score,
            allow_draw: true,
            show_schedule: true,
            points: PointRules::default(),
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 8080 },
        }
    }
}

impl AppConfig {
    /// Load from `path`, which may not exist. Unknown keys are ignored;
    /// missing keys keep their defaults.
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();
        config::Config::builder()
            .set_default("title", defaults.title)?
            .set_default("mode", defaults.mode.label())?
            .set_default("allow_draw", defaults.allow_draw)?
            .set_default("show_schedule", defaults.show_schedule)?
            .set_default("points.win", defaults.points.win as i64)?
            .set_default("points.draw", defaults.points.draw as i64)?
            .set_default("points.loss", defaults.points.loss as i64)?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .add_source(config::File::with_name(path).required(false))
            .build()?
            .try_deserialize()
    }

    /// The tournament a fresh data directory starts with.
    pub fn default_tournament(&self) -> Tournament {
        Tournament::new(&self.title, self.mode, self.allow_draw, self.show_schedule)
    }
}

/// Commented config file written by `rondo init`.
pub fn default_config_toml() -> String {
    let body = toml::to_string_pretty(&AppConfig::default())
        .unwrap_or_else(|_| String::new());
    format!(
        "# rondo configuration\n\
         #\n\
         # Settings here seed a fresh tournament; once a snapshot exists its\n\
         # own settings win. Point values apply to every standings read.\n\n{}",
        body
    )
}
