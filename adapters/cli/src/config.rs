//! Layered run configuration: command line flags over a TOML file over defaults.

use std::{fs, io, path::Path, path::PathBuf};

use serde::Deserialize;
use sim_garden_core::{
    ParseOptionError, ParsePatternError, Pattern, SimulationOption, TickRate, TickRateError,
    DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_RANDOM_DENSITY, MAX_GRID_EDGE,
};
use sim_garden_world::DEFAULT_SEED;
use thiserror::Error;

/// Default on-screen edge length of one cell in pixels.
pub(crate) const DEFAULT_CELL_SIZE: f32 = 8.0;

/// Errors raised while assembling a [`SimulationConfig`].
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file {path}")]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// The option id is not in the catalog.
    #[error(transparent)]
    Option(#[from] ParseOptionError),
    /// The pattern id is not in the catalog.
    #[error(transparent)]
    Pattern(#[from] ParsePatternError),
    /// The tick rate is outside the range of the selected option.
    #[error("invalid tick rate: {0}")]
    TickRate(#[from] TickRateError),
    /// A grid edge is zero or larger than [`MAX_GRID_EDGE`].
    #[error("grid must be between 1x1 and {max}x{max} cells, got {rows}x{columns}")]
    GridSize {
        /// Requested rows.
        rows: u32,
        /// Requested columns.
        columns: u32,
        /// Largest accepted edge.
        max: u32,
    },
    /// Random density outside `0.0..=1.0`.
    #[error("density must be between 0 and 1, got {0}")]
    Density(f32),
    /// Cell size that is not a positive number of pixels.
    #[error("cell size must be positive, got {0}")]
    CellSize(f32),
}

/// One layer of optional settings, as read from a file or from flags.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigLayer {
    pub(crate) rows: Option<u32>,
    pub(crate) columns: Option<u32>,
    pub(crate) tick_rate: Option<i64>,
    pub(crate) option: Option<String>,
    pub(crate) pattern: Option<String>,
    pub(crate) seed: Option<u64>,
    pub(crate) density: Option<f32>,
    pub(crate) cell_size: Option<f32>,
}

impl ConfigLayer {
    /// Parses a layer from TOML text.
    pub(crate) fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a layer from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Fills every unset value of `self` from `lower`.
    #[must_use]
    pub(crate) fn or(self, lower: Self) -> Self {
        Self {
            rows: self.rows.or(lower.rows),
            columns: self.columns.or(lower.columns),
            tick_rate: self.tick_rate.or(lower.tick_rate),
            option: self.option.or(lower.option),
            pattern: self.pattern.or(lower.pattern),
            seed: self.seed.or(lower.seed),
            density: self.density.or(lower.density),
            cell_size: self.cell_size.or(lower.cell_size),
        }
    }
}

/// Fully resolved settings of a run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SimulationConfig {
    pub(crate) rows: u32,
    pub(crate) columns: u32,
    pub(crate) tick_rate: TickRate,
    pub(crate) option: SimulationOption,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) seed: u64,
    pub(crate) density: f32,
    pub(crate) cell_size: f32,
}

impl SimulationConfig {
    /// Validates a merged layer, filling gaps with defaults.
    pub(crate) fn resolve(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let option = match layer.option {
            Some(id) => id.trim().parse::<SimulationOption>()?,
            None => SimulationOption::default(),
        };
        let pattern = layer
            .pattern
            .map(|id| id.trim().parse::<Pattern>())
            .transpose()?;

        let rows = layer.rows.unwrap_or(DEFAULT_GRID_ROWS);
        let columns = layer.columns.unwrap_or(DEFAULT_GRID_COLUMNS);
        if !(1..=MAX_GRID_EDGE).contains(&rows) || !(1..=MAX_GRID_EDGE).contains(&columns) {
            return Err(ConfigError::GridSize {
                rows,
                columns,
                max: MAX_GRID_EDGE,
            });
        }

        let tick_rate = match layer.tick_rate {
            Some(requested) => TickRate::new(requested, option.family().tick_rate_cap())?,
            None => TickRate::DEFAULT,
        };

        let density = layer.density.unwrap_or(DEFAULT_RANDOM_DENSITY);
        if !(0.0..=1.0).contains(&density) {
            return Err(ConfigError::Density(density));
        }

        let cell_size = layer.cell_size.unwrap_or(DEFAULT_CELL_SIZE);
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::CellSize(cell_size));
        }

        Ok(Self {
            rows,
            columns,
            tick_rate,
            option,
            pattern,
            seed: layer.seed.unwrap_or(DEFAULT_SEED),
            density,
            cell_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_garden_core::Rule;

    fn parse(text: &str) -> ConfigLayer {
        ConfigLayer::from_toml(text, Path::new("test.toml")).expect("valid toml")
    }

    #[test]
    fn empty_layer_resolves_to_defaults() {
        let config = SimulationConfig::resolve(ConfigLayer::default()).expect("defaults are valid");
        assert_eq!(config.rows, DEFAULT_GRID_ROWS);
        assert_eq!(config.columns, DEFAULT_GRID_COLUMNS);
        assert_eq!(config.tick_rate, TickRate::DEFAULT);
        assert_eq!(config.option, SimulationOption::Classic(Rule::Conway));
        assert_eq!(config.pattern, None);
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn flags_override_file_values() {
        let file = parse(
            r#"
            rows = 40
            columns = 60
            option = "classic/seeds"
            tick_rate = 2
            "#,
        );
        let flags = ConfigLayer {
            columns: Some(80),
            tick_rate: Some(4),
            ..ConfigLayer::default()
        };

        let config = SimulationConfig::resolve(flags.or(file)).expect("valid layers");
        assert_eq!(config.rows, 40);
        assert_eq!(config.columns, 80);
        assert_eq!(config.option, SimulationOption::Classic(Rule::Seeds));
        assert_eq!(config.tick_rate.get(), 4);
    }

    #[test]
    fn tick_rate_is_checked_against_the_option_cap() {
        let classic = ConfigLayer {
            tick_rate: Some(500),
            ..ConfigLayer::default()
        };
        assert!(matches!(
            SimulationConfig::resolve(classic.clone()),
            Err(ConfigError::TickRate(TickRateError::AboveCap { requested: 500, cap: 5 }))
        ));

        let ants = ConfigLayer {
            option: Some("ants/langton".to_string()),
            ..classic
        };
        let config = SimulationConfig::resolve(ants).expect("ants allow 500");
        assert_eq!(config.tick_rate.get(), 500);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let option = ConfigLayer {
            option: Some("classic/wireworld".to_string()),
            ..ConfigLayer::default()
        };
        assert!(matches!(
            SimulationConfig::resolve(option),
            Err(ConfigError::Option(_))
        ));

        let pattern = ConfigLayer {
            pattern: Some("spaceship".to_string()),
            ..ConfigLayer::default()
        };
        assert!(matches!(
            SimulationConfig::resolve(pattern),
            Err(ConfigError::Pattern(_))
        ));
    }

    #[test]
    fn degenerate_values_are_rejected() {
        let grid = ConfigLayer {
            rows: Some(0),
            ..ConfigLayer::default()
        };
        assert!(matches!(
            SimulationConfig::resolve(grid),
            Err(ConfigError::GridSize { rows: 0, .. })
        ));

        let density = ConfigLayer {
            density: Some(1.5),
            ..ConfigLayer::default()
        };
        assert!(matches!(
            SimulationConfig::resolve(density),
            Err(ConfigError::Density(_))
        ));

        let cell_size = ConfigLayer {
            cell_size: Some(0.0),
            ..ConfigLayer::default()
        };
        assert!(matches!(
            SimulationConfig::resolve(cell_size),
            Err(ConfigError::CellSize(_))
        ));
    }

    #[test]
    fn unknown_keys_fail_to_parse() {
        let error = ConfigLayer::from_toml("speed = 3", Path::new("bad.toml"))
            .expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }
}
