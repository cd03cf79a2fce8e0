// --- File: simulation.rs ---
use crate::agent::Agent;
use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::field::{FieldRaster, FieldSample, generate_field};
use crate::forces::{boid_forces, predator_forces};
use crate::integrator::integrate;
use crate::predation::{CatchEvent, compact, mark_captures, record_catch};
use crate::spatial::SpatialGrid;
use crate::utils::{random_position, random_velocity};
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

pub type SimRng = StdRng;

/// What happened during one `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub tick: u64,
    pub caught: usize,
    pub boids_remaining: usize,
}

/// Borrowed, read-only view for the renderer. Boid indices are only valid
/// for this tick; predation re-indexes survivors.
#[derive(Debug, Clone, Copy)]
pub struct SimulationSnapshot<'a> {
    pub boids: &'a [Agent],
    pub predators: &'a [Agent],
    pub field_samples: &'a [FieldSample],
    pub tick: u64,
    pub catch_history: &'a [CatchEvent],
}

impl<'a> SimulationSnapshot<'a> {
    // Raw instance-buffer bytes: [position.x, position.y, velocity.x, velocity.y] per agent
    pub fn boid_instances(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.boids)
    }

    pub fn predator_instances(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.predators)
    }
}

/// One flock plus its predators on a toroidal plane.
///
/// The host owns this value and calls [`SimulationState::step`] once per
/// frame; `step` is not reentrant. Changing population sizes means building
/// a new state.
#[derive(Debug)]
pub struct SimulationState {
    config: SimulationConfig,
    domain: Vec2,
    rng: SimRng,
    boids: Vec<Agent>,
    predators: Vec<Agent>,
    field: FieldRaster,
    tick: u64,
    catch_history: Vec<CatchEvent>,
    // OPTIMIZATION: Buffers for reuse in the step loop
    boid_grid: SpatialGrid,
    predator_grid: SpatialGrid,
    next_boids: Vec<Agent>,
    next_predators: Vec<Agent>,
    capture_flags: Vec<bool>,
    // Capacity of each worker's neighbour scratch buffer
    neighbor_capacity: usize,
}

impl SimulationState {
    /// Validates `config`, computes the field and scatters both populations
    /// uniformly over the domain.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Self::seeded_rng(&config);
        let (boids, predators) = Self::spawn_populations(&mut rng, &config);
        Ok(Self::assemble(config, rng, boids, predators))
    }

    /// Like [`SimulationState::new`] but with hand-placed agents. Population
    /// sizes come from the vectors, not from `num_boids`/`num_predators`.
    /// Positions are expected inside the domain.
    pub fn with_agents(
        config: SimulationConfig,
        boids: Vec<Agent>,
        predators: Vec<Agent>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = Self::seeded_rng(&config);
        Ok(Self::assemble(config, rng, boids, predators))
    }

    fn seeded_rng(config: &SimulationConfig) -> SimRng {
        match config.rng_seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => {
                let seed: u64 = rand::random();
                log::debug!("No rng_seed configured, using {seed:#018x}");
                SimRng::seed_from_u64(seed)
            }
        }
    }

    fn spawn_populations(
        rng: &mut SimRng,
        config: &SimulationConfig,
    ) -> (Vec<Agent>, Vec<Agent>) {
        let domain = config.domain();
        let boids = (0..config.num_boids)
            .map(|_| {
                Agent::new(
                    random_position(rng, domain),
                    random_velocity(rng, config.boid.max_speed),
                )
            })
            .collect();
        let predators = (0..config.num_predators)
            .map(|_| {
                Agent::new(
                    random_position(rng, domain),
                    random_velocity(rng, config.predator.max_speed),
                )
            })
            .collect();
        (boids, predators)
    }

    fn assemble(
        config: SimulationConfig,
        rng: SimRng,
        boids: Vec<Agent>,
        predators: Vec<Agent>,
    ) -> Self {
        let field = generate_field(config.width, config.height, &config.hotzones);
        let neighbor_capacity = boids.len().max(predators.len());
        log::info!(
            "Simulation {}x{}: {} boids, {} predators, {} hotzones",
            config.width,
            config.height,
            boids.len(),
            predators.len(),
            config.hotzones.len()
        );

        Self {
            domain: config.domain(),
            rng,
            next_boids: Vec::with_capacity(boids.len()),
            next_predators: Vec::with_capacity(predators.len()),
            capture_flags: Vec::with_capacity(boids.len()),
            boids,
            predators,
            field,
            tick: 0,
            catch_history: Vec::new(),
            boid_grid: SpatialGrid::default(),
            predator_grid: SpatialGrid::default(),
            neighbor_capacity,
            config,
        }
    }

    /// Advances one tick of length `dt`.
    ///
    /// Boids move first, each from the pre-tick snapshot. Predators then
    /// steer toward the updated flock, and every boid within hunt radius of
    /// a predator's pre-move position is removed.
    pub fn step(&mut self, dt: f32) -> StepReport {
        debug_assert!(dt.is_finite(), "non-finite dt {dt}");
        self.tick += 1;
        let domain = self.domain;

        // --- Boid phase ---
        self.boid_grid.rebuild(
            &self.boids,
            domain.x,
            domain.y,
            self.config.boid_cell_size(),
        );
        {
            let boids = &self.boids;
            let predators = &self.predators;
            let grid = &self.boid_grid;
            let params = &self.config.boid;
            let hotzones = &self.config.hotzones;
            let capacity = self.neighbor_capacity;
            boids
                .par_iter()
                .enumerate()
                .map_init(
                    || Vec::with_capacity(capacity),
                    |neighbors, (i, boid)| {
                        grid.query_into(i, params.perception_radius, neighbors);
                        let forces = boid_forces(
                            boid,
                            neighbors.as_slice(),
                            boids,
                            predators,
                            hotzones,
                            params,
                        );
                        integrate(boid, forces.net(), dt, params.max_speed, domain)
                    },
                )
                .collect_into_vec(&mut self.next_boids);
        }
        std::mem::swap(&mut self.boids, &mut self.next_boids);

        // --- Predator phase (sees the committed boid layer) ---
        self.predator_grid.rebuild(
            &self.predators,
            domain.x,
            domain.y,
            self.config.predator_cell_size(),
        );
        {
            let predators = &self.predators;
            let boids = &self.boids;
            let grid = &self.predator_grid;
            let params = &self.config.predator;
            let capacity = self.neighbor_capacity;
            predators
                .par_iter()
                .enumerate()
                .map_init(
                    || Vec::with_capacity(capacity),
                    |neighbors, (p, predator)| {
                        grid.query_into(p, params.perception_radius, neighbors);
                        let forces = predator_forces(
                            predator,
                            neighbors.as_slice(),
                            predators,
                            boids,
                            params,
                        );
                        integrate(predator, forces.net(), dt, params.max_speed, domain)
                    },
                )
                .collect_into_vec(&mut self.next_predators);
        }
        // Captures are judged against where each predator stood before moving
        mark_captures(
            &self.boids,
            &self.predators,
            self.config.predator.hunt_radius,
            &mut self.capture_flags,
        );
        std::mem::swap(&mut self.predators, &mut self.next_predators);

        // --- Predation ---
        let caught = compact(&mut self.boids, &self.capture_flags);
        if let Some(event) = record_catch(&mut self.catch_history, self.tick, caught) {
            log::debug!(
                "Tick {}: {} boids caught ({} total, {} left)",
                event.tick,
                event.count,
                event.cumulative,
                self.boids.len()
            );
        }
        log::trace!(
            "Tick {} done: {} boids, {} predators",
            self.tick,
            self.boids.len(),
            self.predators.len()
        );

        StepReport {
            tick: self.tick,
            caught,
            boids_remaining: self.boids.len(),
        }
    }

    /// Re-scatters the configured populations and clears tick counter and
    /// catch history. The field is kept; it depends only on configuration.
    pub fn restart(&mut self) {
        let (boids, predators) = Self::spawn_populations(&mut self.rng, &self.config);
        self.neighbor_capacity = boids.len().max(predators.len());
        self.boids = boids;
        self.predators = predators;
        self.tick = 0;
        self.catch_history.clear();
        log::info!(
            "Restarted with {} boids and {} predators",
            self.boids.len(),
            self.predators.len()
        );
    }

    pub fn snapshot(&self) -> SimulationSnapshot<'_> {
        SimulationSnapshot {
            boids: &self.boids,
            predators: &self.predators,
            field_samples: self.field.samples(),
            tick: self.tick,
            catch_history: &self.catch_history,
        }
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn boids(&self) -> &[Agent] {
        &self.boids
    }

    #[inline]
    pub fn predators(&self) -> &[Agent] {
        &self.predators
    }

    #[inline]
    pub fn field(&self) -> &FieldRaster {
        &self.field
    }

    #[inline]
    pub fn catch_history(&self) -> &[CatchEvent] {
        &self.catch_history
    }

    pub fn total_caught(&self) -> usize {
        self.catch_history.last().map_or(0, |event| event.cumulative)
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Hotzone;

    fn seeded(seed: u64) -> SimulationConfig {
        SimulationConfig {
            num_boids: 120,
            num_predators: 2,
            rng_seed: Some(seed),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn construction_scatters_agents_inside_the_domain() {
        let state = SimulationState::new(seeded(1)).unwrap();
        assert_eq!(state.tick(), 0);
        assert_eq!(state.boids().len(), 120);
        assert_eq!(state.predators().len(), 2);
        assert!(state.catch_history().is_empty());
        for boid in state.boids() {
            assert!(boid.position.x >= 0.0 && boid.position.x < 100.0);
            assert!(boid.position.y >= 0.0 && boid.position.y < 100.0);
            assert!(boid.speed() <= 0.2 + 1e-6);
        }
        for predator in state.predators() {
            assert!(predator.speed() <= 0.3 + 1e-6);
        }
        assert_eq!(state.field().samples().len(), 10_000);
    }

    #[test]
    fn invalid_config_builds_nothing() {
        let mut config = seeded(1);
        config.boid.perception_radius = -1.0;
        assert!(SimulationState::new(config.clone()).is_err());
        assert!(SimulationState::with_agents(config, Vec::new(), Vec::new()).is_err());
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = SimulationState::new(seeded(42)).unwrap();
        let mut b = SimulationState::new(seeded(42)).unwrap();
        for _ in 0..25 {
            assert_eq!(a.step(1.0), b.step(1.0));
        }
        assert_eq!(a.boids(), b.boids());
        assert_eq!(a.predators(), b.predators());
        assert_eq!(a.catch_history(), b.catch_history());
    }

    #[test]
    fn step_advances_tick_and_reports() {
        let mut state = SimulationState::new(seeded(5)).unwrap();
        let report = state.step(1.0);
        assert_eq!(report.tick, 1);
        assert_eq!(state.tick(), 1);
        assert_eq!(report.boids_remaining, state.boids().len());
        assert_eq!(report.caught, 120 - state.boids().len());
    }

    #[test]
    fn boids_update_from_the_pre_tick_snapshot() {
        // Two boids facing each other: each must see the other's old state
        let mut config = seeded(0);
        config.hotzones.clear();
        config.boid.min_separation = 0.0;
        let boids = vec![
            Agent::new(Vec2::new(40.0, 50.0), Vec2::new(0.1, 0.0)),
            Agent::new(Vec2::new(42.0, 50.0), Vec2::new(-0.1, 0.0)),
        ];
        let mut state = SimulationState::with_agents(config, boids, Vec::new()).unwrap();
        state.step(1.0);
        let [left, right] = [state.boids()[0], state.boids()[1]];
        assert_eq!(left.velocity.x, -right.velocity.x);
        assert_eq!(left.position.x - 40.0, 42.0 - right.position.x);
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut config = seeded(9);
        config.hotzones = vec![Hotzone::new(Vec2::new(50.0, 50.0), 8.0, 8.0, 1.0)];
        let mut state = SimulationState::new(config).unwrap();
        state.step(1.0);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.boids, state.boids());
        assert_eq!(snapshot.predators.len(), 2);
        assert_eq!(snapshot.field_samples.len(), 10_000);
        assert_eq!(snapshot.boid_instances().len(), state.boids().len() * 16);
        assert_eq!(snapshot.predator_instances().len(), 2 * 16);
    }

    #[test]
    fn restart_resets_counters_and_populations() {
        let mut config = seeded(11);
        config.predator.hunt_radius = 30.0;
        let mut state = SimulationState::new(config).unwrap();
        state.step(1.0);
        assert!(state.total_caught() > 0);
        state.restart();
        assert_eq!(state.tick(), 0);
        assert_eq!(state.total_caught(), 0);
        assert!(state.catch_history().is_empty());
        assert_eq!(state.boids().len(), 120);
        assert_eq!(state.predators().len(), 2);
    }
}
// --- End of File: simulation.rs ---
