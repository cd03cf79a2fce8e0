// --- File: config.rs ---
use crate::constants::{
    DEFAULT_BOID_COUNT, DEFAULT_HEIGHT, DEFAULT_PREDATOR_COUNT, DEFAULT_WIDTH,
};
use crate::error::ConfigError;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A Gaussian bump in the static field. Negative strength repels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotzone {
    pub center: Vec2,
    pub sigma_x: f32,
    pub sigma_y: f32,
    pub strength: f32,
}

impl Hotzone {
    pub fn new(center: Vec2, sigma_x: f32, sigma_y: f32, strength: f32) -> Self {
        Self {
            center,
            sigma_x,
            sigma_y,
            strength,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoidConfig {
    pub perception_radius: f32,
    pub min_separation: f32,
    pub flee_radius: f32,
    pub flee_strength: f32,
    pub max_force: f32,
    pub max_speed: f32,
    pub attraction_strength: f32,
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            perception_radius: 4.0,
            min_separation: 2.0,
            flee_radius: 3.5,
            flee_strength: 5.0,
            max_force: 0.4,
            max_speed: 0.2,
            attraction_strength: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    pub perception_radius: f32,
    pub min_separation: f32,
    pub hunt_radius: f32,
    pub max_force: f32,
    pub max_speed: f32,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            perception_radius: 8.0,
            min_separation: 2.0,
            hunt_radius: 3.0,
            max_force: 0.4,
            max_speed: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: u32,
    pub height: u32,
    pub num_boids: usize,
    pub num_predators: usize,
    pub boid: BoidConfig,
    pub predator: PredatorConfig,
    pub hotzones: Vec<Hotzone>,
    // None seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            num_boids: DEFAULT_BOID_COUNT,
            num_predators: DEFAULT_PREDATOR_COUNT,
            boid: BoidConfig::default(),
            predator: PredatorConfig::default(),
            hotzones: vec![
                // Thin repelling wall along the left edge
                Hotzone::new(Vec2::new(0.0, 50.0), 2.0, 200.0, -0.1),
                Hotzone::new(Vec2::new(75.0, 75.0), 10.0, 10.0, 1.0),
                Hotzone::new(Vec2::new(25.0, 25.0), 10.0, 10.0, 1.0),
            ],
            rng_seed: None,
        }
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every limit before any state is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let boid = &self.boid;
        non_negative("boid.perception_radius", boid.perception_radius)?;
        non_negative("boid.min_separation", boid.min_separation)?;
        non_negative("boid.flee_radius", boid.flee_radius)?;
        non_negative("boid.max_force", boid.max_force)?;
        non_negative("boid.max_speed", boid.max_speed)?;
        finite("boid.flee_strength", boid.flee_strength)?;
        finite("boid.attraction_strength", boid.attraction_strength)?;

        let predator = &self.predator;
        non_negative("predator.perception_radius", predator.perception_radius)?;
        non_negative("predator.min_separation", predator.min_separation)?;
        non_negative("predator.hunt_radius", predator.hunt_radius)?;
        non_negative("predator.max_force", predator.max_force)?;
        non_negative("predator.max_speed", predator.max_speed)?;

        for (index, zone) in self.hotzones.iter().enumerate() {
            if !zone.center.is_finite() {
                return Err(ConfigError::InvalidHotzone {
                    index,
                    reason: "center must be finite",
                });
            }
            if !(zone.sigma_x.is_finite() && zone.sigma_x > 0.0)
                || !(zone.sigma_y.is_finite() && zone.sigma_y > 0.0)
            {
                return Err(ConfigError::InvalidHotzone {
                    index,
                    reason: "sigma_x and sigma_y must be finite and positive",
                });
            }
            if !zone.strength.is_finite() {
                return Err(ConfigError::InvalidHotzone {
                    index,
                    reason: "strength must be finite",
                });
            }
        }
        Ok(())
    }

    /// Cell size of the boid grid: large enough that flee and perception
    /// checks stay within the 3x3 block.
    pub fn boid_cell_size(&self) -> f32 {
        self.boid.perception_radius.max(self.boid.flee_radius)
    }

    pub fn predator_cell_size(&self) -> f32 {
        self.predator.perception_radius
    }

    pub fn domain(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

// --- End of File: config.rs ---
