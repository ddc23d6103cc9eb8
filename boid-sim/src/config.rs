use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use boid_core::DEFAULT_CAPACITY;
use boid_shared::SimulationConfig;

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ticks: Option<u64>,
    pub dt: Option<f32>,
    pub seed: Option<u64>,
    /// Replaces the boid count of every configured flock
    pub boids: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, config: &mut SimulationConfig) {
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(boids) = self.boids {
            for flock in &mut config.flocks {
                flock.count = boids;
            }
        }
    }
}

/// Read a JSON config, or fall back to the defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        log::info!("No config file given, using built-in defaults");
        return Ok(SimulationConfig::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = SimulationConfig::from_json(&json)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Reject configs the simulation cannot run sensibly
pub fn validate(config: &SimulationConfig) -> Result<()> {
    if !config.bounds.is_valid() {
        bail!(
            "Arena bounds must satisfy left < right and top < bottom, got {:?}",
            config.bounds
        );
    }
    if !config.dt.is_finite() || config.dt < 0.0 {
        bail!("dt must be a non-negative number of seconds, got {}", config.dt);
    }
    if config.ticks == 0 {
        bail!("ticks must be at least 1");
    }

    let steering = &config.steering;
    if steering.boundary_margin < 0.0 || steering.dead_zone < 0.0 || steering.inner_range < 0.0 {
        bail!("Steering distances and angles must not be negative: {:?}", steering);
    }

    if config.flocks.is_empty() {
        bail!("At least one flock must be configured");
    }
    let mut names = HashSet::new();
    for flock in &config.flocks {
        if !names.insert(flock.name.as_str()) {
            bail!("Flock name '{}' is used more than once", flock.name);
        }
        if flock.count > DEFAULT_CAPACITY {
            bail!(
                "Flock '{}' asks for {} boids but a flock holds at most {}",
                flock.name,
                flock.count,
                DEFAULT_CAPACITY
            );
        }
        if let Some(spawn) = &flock.spawn {
            if !spawn.is_valid() {
                bail!("Flock '{}' has an empty spawn region {:?}", flock.name, spawn);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boid_shared::{ArenaBounds, FlockConfig};

    #[test]
    fn test_overrides_apply() {
        let mut config = SimulationConfig::default();
        config.flocks.push(FlockConfig {
            name: "second".to_string(),
            ..FlockConfig::default()
        });
        let overrides = Overrides {
            ticks: Some(5),
            dt: Some(0.5),
            seed: None,
            boids: Some(12),
        };

        overrides.apply(&mut config);

        assert_eq!(config.ticks, 5);
        assert_eq!(config.dt, 0.5);
        assert_eq!(config.seed, SimulationConfig::default().seed);
        assert!(config.flocks.iter().all(|flock| flock.count == 12));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&SimulationConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = SimulationConfig {
            bounds: ArenaBounds::new(500.0, 0.0, 100.0, 100.0),
            ..SimulationConfig::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("left < right"));
    }

    #[test]
    fn test_validate_rejects_negative_dt() {
        let config = SimulationConfig {
            dt: -0.1,
            ..SimulationConfig::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_flock() {
        let mut config = SimulationConfig::default();
        config.flocks[0].count = DEFAULT_CAPACITY + 1;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("at most"));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let mut config = SimulationConfig::default();
        config.flocks.push(config.flocks[0].clone());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_config_file_has_context() {
        let err = load_config(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
