//! Machine configuration
//!
//! Everything tunable about a machine lives in [`MachineConfig`]: grid
//! geometry, catalog size, both motion profiles, pay values and the
//! economy. Configs load from JSON or YAML and are validated on load.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sr_core::{GridGeometry, SrError, SrResult};

use crate::paytable::PayTable;
use crate::symbols::SymbolCatalog;
use crate::timing::MotionProfile;

/// Maximum accepted config file size (1MB)
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Credit and bet rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_credit: f64,
    pub default_bet: u32,
    pub min_bet: u32,
    pub max_bet: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_credit: 100_000.0,
            default_bet: 20,
            min_bet: 1,
            max_bet: 999,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Machine identifier, recorded on every trace
    pub name: String,
    pub grid: GridGeometry,
    /// Number of symbols in the catalog
    pub symbol_count: u32,
    pub normal: MotionProfile,
    pub turbo: MotionProfile,
    /// Blur intensity per cell of per-frame travel
    pub blur_gain: f64,
    pub paytable: PayTable,
    pub economy: EconomyConfig,
}

impl MachineConfig {
    /// The 5×3, 15-symbol reference machine
    pub fn standard() -> Self {
        Self {
            name: "slotreel-5x3".into(),
            grid: GridGeometry::standard_5x3(),
            symbol_count: 15,
            normal: MotionProfile::normal(),
            turbo: MotionProfile::turbo(),
            blur_gain: 10.0,
            paytable: PayTable::standard(),
            economy: EconomyConfig::default(),
        }
    }

    pub fn catalog(&self) -> SymbolCatalog {
        SymbolCatalog::numbered(self.symbol_count)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // VALIDATION
    // ═══════════════════════════════════════════════════════════════════════

    pub fn validate(&self) -> SrResult<()> {
        let grid = &self.grid;
        if grid.reels < 3 {
            return Err(invalid(format!("reels must be at least 3, got {}", grid.reels)));
        }
        if grid.rows < 3 {
            return Err(invalid(format!("rows must be at least 3, got {}", grid.rows)));
        }
        if !positive(grid.cell_size) {
            return Err(invalid("cell_size must be positive"));
        }
        if !non_negative(grid.reel_gap) {
            return Err(invalid("reel_gap must not be negative"));
        }
        if grid.extra_cells < 1 {
            return Err(invalid("extra_cells must be at least 1"));
        }
        if self.symbol_count < 2 {
            return Err(invalid("symbol_count must be at least 2"));
        }
        if !non_negative(self.blur_gain) {
            return Err(invalid("blur_gain must not be negative"));
        }

        for (label, profile) in [("normal", &self.normal), ("turbo", &self.turbo)] {
            if profile.spin_time_min_ms == 0 {
                return Err(invalid(format!("{label}: spin_time_min_ms must be positive")));
            }
            if profile.spin_time_min_ms > profile.spin_time_max_ms {
                return Err(invalid(format!(
                    "{label}: spin_time_min_ms ({}) exceeds spin_time_max_ms ({})",
                    profile.spin_time_min_ms, profile.spin_time_max_ms
                )));
            }
            if profile.base_turns == 0 {
                return Err(invalid(format!("{label}: base_turns must be at least 1")));
            }
            if !non_negative(profile.win_pause_ms) || !non_negative(profile.dim_fade_ms) {
                return Err(invalid(format!("{label}: pause and fade must not be negative")));
            }
            if !(0.0..=1.0).contains(&profile.dim_alpha) {
                return Err(invalid(format!("{label}: dim_alpha must be within [0, 1]")));
            }
        }

        if !non_negative(self.paytable.full_row_value) || !non_negative(self.paytable.three_value)
        {
            return Err(invalid("pay values must not be negative"));
        }

        let economy = &self.economy;
        if !non_negative(economy.starting_credit) {
            return Err(invalid("starting_credit must not be negative"));
        }
        if economy.min_bet < 1 {
            return Err(invalid("min_bet must be at least 1"));
        }
        if economy.default_bet < economy.min_bet || economy.default_bet > economy.max_bet {
            return Err(invalid(format!(
                "default_bet {} outside [{}, {}]",
                economy.default_bet, economy.min_bet, economy.max_bet
            )));
        }

        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════

    pub fn from_json_str(json: &str) -> SrResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SrError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> SrResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| SrError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> SrResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SrError::Serialization(e.to_string()))
    }

    pub fn to_yaml(&self) -> SrResult<String> {
        serde_yml::to_string(self).map_err(|e| SrError::Serialization(e.to_string()))
    }

    /// Load and validate a config file, format chosen by extension
    pub fn load(path: &Path) -> SrResult<Self> {
        let format = ConfigFormat::from_extension(path)?;

        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(invalid(format!(
                "config file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)?;
        let config = match format {
            ConfigFormat::Json => Self::from_json_str(&text)?,
            ConfigFormat::Yaml => Self::from_yaml_str(&text)?,
        };
        log::info!("Loaded machine config '{}' from {}", config.name, path.display());
        Ok(config)
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// On-disk config format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_extension(path: &Path) -> SrResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            other => Err(SrError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn invalid(message: impl Into<String>) -> SrError {
    SrError::Config(message.into())
}

// NaN fails both checks
fn positive(value: f64) -> bool {
    value > 0.0
}

fn non_negative(value: f64) -> bool {
    value >= 0.0
}
