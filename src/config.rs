//! Runtime configuration from the environment (`.env` supported).
//!
//! | variable             | default          |
//! | -------------------- | ---------------- |
//! | `FOURPL_ADDR`        | `127.0.0.1:5000` |
//! | `FOURPL_PLOT_WIDTH`  | `640`            |
//! | `FOURPL_PLOT_HEIGHT` | `480`            |
//! | `FOURPL_SEED`        | unset (entropy)  |
//!
//! Fit constants are not configurable here; they come from `FitConfig::default()`.

use std::str::FromStr;

use crate::domain::FitConfig;
use crate::error::AppError;

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_PLOT_WIDTH: u32 = 640;
pub const DEFAULT_PLOT_HEIGHT: u32 = 480;

/// Upper bound on either image side, to keep one request's buffer small.
const MAX_PLOT_SIDE: u32 = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
    pub plot_width: u32,
    pub plot_height: u32,
    /// When set, every request reuses this noise seed.
    pub seed: Option<u64>,
    pub fit: FitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            plot_width: DEFAULT_PLOT_WIDTH,
            plot_height: DEFAULT_PLOT_HEIGHT,
            seed: None,
            fit: FitConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let addr = get("FOURPL_ADDR").unwrap_or(defaults.addr);
        let plot_width = parse_or("FOURPL_PLOT_WIDTH", get("FOURPL_PLOT_WIDTH"), defaults.plot_width)?;
        let plot_height = parse_or("FOURPL_PLOT_HEIGHT", get("FOURPL_PLOT_HEIGHT"), defaults.plot_height)?;
        let seed = get("FOURPL_SEED")
            .map(|raw| parse_value::<u64>("FOURPL_SEED", &raw))
            .transpose()?;

        for (key, side) in [("FOURPL_PLOT_WIDTH", plot_width), ("FOURPL_PLOT_HEIGHT", plot_height)] {
            if side == 0 || side > MAX_PLOT_SIDE {
                return Err(AppError::new(
                    2,
                    format!("{key} must be between 1 and {MAX_PLOT_SIDE}, got {side}."),
                ));
            }
        }

        Ok(Self {
            addr,
            plot_width,
            plot_height,
            seed,
            fit: defaults.fit,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| AppError::new(2, format!("Invalid {key} '{raw}': {e}")))
}
