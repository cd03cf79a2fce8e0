// --- File: constants.rs ---
// --- Global Simulation Constants ---

// Domain defaults, in world units (one world unit == one field raster cell)
pub const DEFAULT_WIDTH: u32 = 100;
pub const DEFAULT_HEIGHT: u32 = 100;
pub const DEFAULT_BOID_COUNT: usize = 500;
pub const DEFAULT_PREDATOR_COUNT: usize = 3;

// One tick unit. Hosts step once per animation frame with this delta.
pub const FIXED_TIMESTEP: f32 = 1.0;

// Cohesion steers toward the local centre of mass, damped by this constant.
// Not configurable.
pub const COHESION_DAMPING: f32 = 100.0;

// Floor applied to a pairwise distance before dividing by it (coincident agents)
pub const DISTANCE_EPSILON: f32 = 0.001;

// --- End of File: constants.rs ---
