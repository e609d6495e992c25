use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::types::MINUTES_PER_DAY;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub grid: GridDefaults,
    #[serde(default)]
    pub input: InputConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Working-day geometry applied to schedules that don't define their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridDefaults {
    /// Opening time, as minutes from midnight.
    pub start_mins: u32,
    /// Closing time, as minutes from midnight.
    pub end_mins: u32,
    /// Slot size, in minutes.
    pub slot_size: u32,
}

impl GridDefaults {
    pub const DEFAULT_START: u32 = 8 * 60;
    pub const DEFAULT_END: u32 = 18 * 60;
    pub const DEFAULT_SLOT_SIZE: u32 = 15;

    /// ## Summary
    /// Checks that the defaults describe a usable working day.
    ///
    /// ## Errors
    /// Returns an error if the slot size is zero, either bound lies past
    /// midnight, or the day closes before it opens.
    pub fn validate(&self) -> CoreResult<()> {
        if self.slot_size == 0 {
            return Err(CoreError::InvalidSlotSize(self.slot_size));
        }
        for mins in [self.start_mins, self.end_mins] {
            if mins > MINUTES_PER_DAY {
                return Err(CoreError::MinutesOutOfRange(mins));
            }
        }
        if self.start_mins > self.end_mins {
            return Err(CoreError::InvalidHours {
                start_mins: self.start_mins,
                end_mins: self.end_mins,
            });
        }
        Ok(())
    }
}

impl Default for GridDefaults {
    fn default() -> Self {
        Self {
            start_mins: Self::DEFAULT_START,
            end_mins: Self::DEFAULT_END,
            slot_size: Self::DEFAULT_SLOT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputConfig {
    /// JSON file holding one query result. The first CLI argument wins over it.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Display schedules on the columns, otherwise on the rows.
    pub schedule_columns: bool,
}

impl Settings {
    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("grid.start_mins", i64::from(GridDefaults::DEFAULT_START))?
            .set_default("grid.end_mins", i64::from(GridDefaults::DEFAULT_END))?
            .set_default("grid.slot_size", i64::from(GridDefaults::DEFAULT_SLOT_SIZE))?
            .set_default("display.schedule_columns", true)?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder.build()?.try_deserialize::<Settings>()?;
        if let Err(e) = settings.grid.validate() {
            tracing::warn!(error = %e, grid = ?settings.grid, "Rejected grid defaults");
            return Err(e.into());
        }
        tracing::debug!(
            level = %settings.logging.level,
            start_mins = settings.grid.start_mins,
            end_mins = settings.grid.end_mins,
            slot_size = settings.grid.slot_size,
            "Settings resolved"
        );
        Ok(settings)
    }

    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables (`VETSCHED_GRID__SLOT_SIZE=30`) take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building, deserializing or validating the configuration fails.
    pub fn load() -> Result<Self> {
        Self::finish(
            Self::builder()?
                // TOML file
                .add_source(config::File::with_name("config.toml").required(false))
                // Env
                .add_source(
                    config::Environment::with_prefix("VETSCHED")
                        .prefix_separator("_")
                        .separator("__")
                        .ignore_empty(true)
                        .try_parsing(true),
                ),
        )
    }

    /// ## Summary
    /// Loads configuration from a TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml(source: &str) -> Result<Self> {
        Self::finish(Self::builder()?.add_source(config::File::from_str(source, FileFormat::Toml)))
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
