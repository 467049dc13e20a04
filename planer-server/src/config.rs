//! Server configuration.
//!
//! Read from an optional TOML file and then from `PLANER_*` environment
//! variables, the latter winning:
//!
//! ```toml
//! tenant_id = "..."
//! client_id = "..."
//! client_secret = "..."
//! sp_site = "contoso.sharepoint.com"
//! sp_site_path = "/sites/planung"
//! bind = "127.0.0.1:8787"
//! # the employee list has a `Vorname` column
//! first_name_column = false
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_BIND: &str = "127.0.0.1:8787";
const DEFAULT_PAGE_SIZE: u32 = 1000;

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Host of the SharePoint site, e.g. `contoso.sharepoint.com`
    #[serde(default)]
    pub sp_site: String,
    /// Server-relative site path, e.g. `/sites/planung`
    #[serde(default)]
    pub sp_site_path: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Rows requested per list page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// The employee list has a `Vorname` column; otherwise first names are
    /// stored in `Title`
    #[serde(default)]
    pub first_name_column: bool,
}

impl ServerConfig {
    /// `$PLANER_CONFIG`, or `ressourcenplaner/server.toml` in the platform
    /// config directory.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("PLANER_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join("ressourcenplaner")
            .join("server.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let config = Self::from_builder(
            Config::builder()
                .add_source(File::from(path.clone()).required(false))
                .add_source(Environment::with_prefix("PLANER").try_parsing(true)),
        )
        .with_context(|| format!("Failed to load configuration (file: {})", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Every credential is required; the error names the variable to set.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("PLANER_TENANT_ID", &self.tenant_id),
            ("PLANER_CLIENT_ID", &self.client_id),
            ("PLANER_CLIENT_SECRET", &self.client_secret),
            ("PLANER_SP_SITE", &self.sp_site),
        ];

        for (var, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("{} is not set (environment or server.toml)", var);
            }
        }

        if self.page_size == 0 {
            anyhow::bail!("PLANER_PAGE_SIZE must be greater than 0");
        }

        self.bind_addr()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind))
    }

    /// `https://{site}{site_path}/_api`
    pub fn api_base(&self) -> String {
        let path = self.sp_site_path.trim_end_matches('/');
        format!("https://{}{}/_api", self.sp_site, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> ServerConfig {
        ServerConfig::from_builder(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(
            r#"
            tenant_id = "t"
            client_id = "c"
            client_secret = "s"
            sp_site = "contoso.sharepoint.com"
            sp_site_path = "/sites/planung/"
            "#,
        );

        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.bind_addr().unwrap().port(), 8787);
        assert_eq!(config.api_base(), "https://contoso.sharepoint.com/sites/planung/_api");
        assert!(!config.first_name_column);
    }

    #[test]
    fn test_first_name_column_flag() {
        let config = parse("first_name_column = true");
        assert!(config.first_name_column);
    }

    #[test]
    fn test_missing_credential_is_named() {
        let config = parse(r#"tenant_id = "t""#);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("PLANER_CLIENT_ID"), "{err}");
    }

    #[test]
    fn test_invalid_bind() {
        let config = parse(
            r#"
            tenant_id = "t"
            client_id = "c"
            client_secret = "s"
            sp_site = "x"
            bind = "nowhere"
            "#,
        );
        assert!(config.validate().is_err());
    }
}
