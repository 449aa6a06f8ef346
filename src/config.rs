//! Configuration management for the annotator server

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_DPI: u32 = 100;
const DEFAULT_MAX_UPLOAD_MB: usize = 256;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root for uploads, page rasters and drawing layers
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Rasterization resolution
    pub dpi: u32,
    /// Request body limit for uploads
    pub max_upload_mb: usize,
}

impl RenderConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            },
            render: RenderConfig {
                dpi: DEFAULT_DPI,
                max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            },
        }
    }
}

impl Config {
    /// Load from the environment; unset or invalid values use the defaults
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port: parse_var("SERVER_PORT", DEFAULT_PORT),
            },
            storage: StorageConfig {
                data_dir: env::var("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            },
            render: RenderConfig {
                dpi: parse_var("RENDER_DPI", DEFAULT_DPI),
                max_upload_mb: parse_var("MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB),
            },
        }
    }
}

/// Read and parse a variable, falling back to `default` when unset or invalid
fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_or(name, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(name: &str, raw: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid {}={:?}, using {}", name, raw, default);
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(config.render.dpi, 100);
        assert_eq!(config.render.max_upload_bytes(), 256 * 1024 * 1024);
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or("RENDER_DPI", "150", 100u32), 150);
        assert_eq!(parse_or("RENDER_DPI", " 72 ", 100u32), 72);
        assert_eq!(parse_or("RENDER_DPI", "lots", 100u32), 100);
        assert_eq!(parse_or("SERVER_PORT", "70000", 5000u16), 5000);
    }
}
