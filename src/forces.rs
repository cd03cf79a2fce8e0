//! Steering rules for both roles.
//!
//! Every function here is pure: it reads the pre-tick snapshot and returns
//! an acceleration. Nothing is written until the integrator runs.

use crate::agent::Agent;
use crate::config::{BoidConfig, Hotzone, PredatorConfig};
use crate::constants::{COHESION_DAMPING, DISTANCE_EPSILON};
use glam::Vec2;

/// Per-rule accelerations acting on one boid this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoidForces {
    pub alignment: Vec2,
    pub cohesion: Vec2,
    pub separation: Vec2,
    pub flee: Vec2,
    pub attraction: Vec2,
}

impl BoidForces {
    pub fn net(&self) -> Vec2 {
        self.alignment + self.cohesion + self.separation + self.flee + self.attraction
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PredatorForces {
    pub separation: Vec2,
    pub pursuit: Vec2,
}

impl PredatorForces {
    pub fn net(&self) -> Vec2 {
        self.separation + self.pursuit
    }
}

// Zero distance only happens for coincident agents
#[inline]
fn guarded(distance: f32) -> f32 {
    if distance > 0.0 {
        distance
    } else {
        DISTANCE_EPSILON
    }
}

/// `neighbors` are the boid indices within `perception_radius` (from the
/// boid grid). Predators are scanned directly.
pub fn boid_forces(
    boid: &Agent,
    neighbors: &[usize],
    boids: &[Agent],
    predators: &[Agent],
    hotzones: &[Hotzone],
    params: &BoidConfig,
) -> BoidForces {
    let mut forces = BoidForces::default();
    let min_separation_sq = params.min_separation * params.min_separation;

    // --- Alignment, cohesion, separation ---
    let mut center_of_mass = Vec2::ZERO;
    for &j in neighbors {
        let other = &boids[j];
        let away = boid.position - other.position;
        let dist_sq = away.length_squared();

        forces.alignment += other.velocity;
        center_of_mass += other.position;

        if dist_sq < min_separation_sq {
            forces.separation += away / guarded(dist_sq.sqrt());
        }
    }

    if !neighbors.is_empty() {
        let total = neighbors.len() as f32;
        forces.alignment = (forces.alignment / total).clamp_length_max(params.max_force);
        forces.cohesion = ((center_of_mass / total - boid.position) / COHESION_DAMPING)
            .clamp_length_max(params.max_force);
        forces.separation = (forces.separation / total).clamp_length_max(params.max_force);
    }

    // --- Flee ---
    let flee_radius_sq = params.flee_radius * params.flee_radius;
    let mut flee = Vec2::ZERO;
    for predator in predators {
        let away = boid.position - predator.position;
        let dist_sq = away.length_squared();
        if dist_sq < flee_radius_sq {
            flee += away / guarded(dist_sq.sqrt());
        }
    }
    // Unit direction times strength; deliberately not clamped to max_force
    if flee.length_squared() > 0.0 {
        forces.flee = flee.normalize() * params.flee_strength;
    }

    // --- Attraction ---
    forces.attraction = (field_gradient(boid.position, hotzones) * params.attraction_strength)
        .clamp_length_max(params.max_force);

    forces
}

/// Gradient of the summed hotzone Gaussians at `position`, i.e. the
/// direction of steepest ascent (toward attractors, away from repellers).
pub fn field_gradient(position: Vec2, hotzones: &[Hotzone]) -> Vec2 {
    let mut gradient = Vec2::ZERO;
    for zone in hotzones {
        let inv_sigma_x_sq = 1.0 / (zone.sigma_x * zone.sigma_x);
        let inv_sigma_y_sq = 1.0 / (zone.sigma_y * zone.sigma_y);
        let d = position - zone.center;
        let exponent = -(d.x * d.x * inv_sigma_x_sq / 2.0 + d.y * d.y * inv_sigma_y_sq / 2.0);
        let gaussian_value = zone.strength * exponent.exp();
        gradient += gaussian_value * Vec2::new(-d.x * inv_sigma_x_sq, -d.y * inv_sigma_y_sq);
    }
    gradient
}

/// `neighbors` are the other predators within the predator perception radius;
/// boids are scanned directly.
pub fn predator_forces(
    predator: &Agent,
    neighbors: &[usize],
    predators: &[Agent],
    boids: &[Agent],
    params: &PredatorConfig,
) -> PredatorForces {
    let mut forces = PredatorForces::default();

    // --- Separation among predators ---
    let min_separation_sq = params.min_separation * params.min_separation;
    let mut crowded = 0usize;
    for &j in neighbors {
        let away = predator.position - predators[j].position;
        let dist_sq = away.length_squared();
        if dist_sq < min_separation_sq {
            forces.separation += away / guarded(dist_sq.sqrt());
            crowded += 1;
        }
    }
    if crowded > 0 {
        forces.separation =
            (forces.separation / crowded as f32).clamp_length_max(params.max_force);
    }

    // --- Pursuit ---
    let perception_sq = params.perception_radius * params.perception_radius;
    let mut tracked = 0usize;
    for boid in boids {
        let toward = boid.position - predator.position;
        if toward.length_squared() < perception_sq {
            forces.pursuit += toward;
            tracked += 1;
        }
    }
    if tracked > 0 {
        forces.pursuit = (forces.pursuit / tracked as f32).clamp_length_max(params.max_force);
    }

    forces
}
