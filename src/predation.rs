//! Capture marking, boid compaction and the catch time series.

use crate::agent::Agent;
use rayon::prelude::*;
use serde::Serialize;

/// Appended once per tick in which at least one boid was caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatchEvent {
    pub tick: u64,
    pub count: usize,
    // Running sum of `count` over the whole history
    pub cumulative: usize,
}

/// Sets `flags[b]` when boid `b` is strictly within `hunt_radius` of any
/// predator. A boid in reach of several predators is flagged once.
pub fn mark_captures(
    boids: &[Agent],
    predators: &[Agent],
    hunt_radius: f32,
    flags: &mut Vec<bool>,
) {
    if predators.is_empty() {
        flags.clear();
        flags.resize(boids.len(), false);
        return;
    }
    let hunt_radius_sq = hunt_radius * hunt_radius;
    boids
        .par_iter()
        .map(|boid| {
            predators.iter().any(|predator| {
                (boid.position - predator.position).length_squared() < hunt_radius_sq
            })
        })
        .collect_into_vec(flags);
}

/// Drops every flagged boid, keeping survivors in their original order.
/// Returns how many were removed.
pub fn compact(boids: &mut Vec<Agent>, flags: &[bool]) -> usize {
    debug_assert_eq!(boids.len(), flags.len(), "capture flags out of sync with boids");
    let before = boids.len();
    let mut flags = flags.iter();
    boids.retain(|_| !flags.next().copied().unwrap_or(false));
    before - boids.len()
}

/// Appends an event for `count > 0`; a tick without catches leaves the
/// history untouched.
pub fn record_catch(
    history: &mut Vec<CatchEvent>,
    tick: u64,
    count: usize,
) -> Option<CatchEvent> {
    if count == 0 {
        return None;
    }
    let previous = history.last().map_or(0, |event| event.cumulative);
    let event = CatchEvent {
        tick,
        count,
        cumulative: previous + count,
    };
    history.push(event);
    Some(event)
}
