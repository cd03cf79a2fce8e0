//! Physical state shared by boids and predators.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Position and velocity of one agent. Both roles use this shape; the rule
/// set applied to it depends on which collection it lives in.
///
/// `repr(C)` so a slice of agents can be handed to a renderer as-is.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Agent {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
