//! Client configuration at `<config_dir>/ressourcenplaner/cli.toml`:
//!
//! ```toml
//! server = "http://127.0.0.1:8787"
//! shutdown_days = ["2027-01-04"]
//!
//! [[holidays]]
//! date = "2027-03-26"
//! name = "Karfreitag"
//! ```
//!
//! `PLANER_SERVER` overrides the file, `--server` overrides both.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use planer_core::holidays::HolidayCalendar;
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8787";

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtraHoliday {
    pub date: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_server")]
    pub server: String,

    /// Holidays on top of the built-in calendar
    #[serde(default)]
    pub holidays: Vec<ExtraHoliday>,

    #[serde(default)]
    pub shutdown_days: Vec<String>,
}

impl CliConfig {
    fn dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join("ressourcenplaner"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("cli.toml"))
    }

    /// Where the query cache is kept between runs.
    pub fn cache_path() -> Result<PathBuf> {
        Ok(dirs::cache_dir()
            .context("Could not determine cache directory")?
            .join("ressourcenplaner")
            .join("queries.json"))
    }

    pub fn load(server_override: Option<String>) -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = Self::from_builder(
            Config::builder()
                .add_source(File::from(path.clone()).required(false))
                .add_source(Environment::with_prefix("PLANER")),
        )
        .with_context(|| format!("Failed to load {}", path.display()))?;

        if let Some(server) = server_override {
            config.server = server;
        }
        Ok(config)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// The built-in holiday calendar extended with the configured days.
    pub fn calendar(&self) -> Result<HolidayCalendar> {
        let mut calendar = HolidayCalendar::default();

        for holiday in &self.holidays {
            calendar
                .add_holiday(&holiday.date, &holiday.name)
                .with_context(|| format!("Invalid holiday in cli.toml: {}", holiday.name))?;
        }
        for day in &self.shutdown_days {
            calendar
                .add_shutdown_day(day)
                .context("Invalid shutdown day in cli.toml")?;
        }

        Ok(calendar)
    }
}
