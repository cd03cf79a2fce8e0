use crate::agent::Agent;
use glam::Vec2;

// Semi-implicit Euler: velocity first (then speed clamp), position from the
// new velocity, then toroidal wrap.
#[inline]
pub fn integrate(
    agent: &Agent,
    acceleration: Vec2,
    dt: f32,
    max_speed: f32,
    domain: Vec2,
) -> Agent {
    let velocity = (agent.velocity + acceleration * dt).clamp_length_max(max_speed);
    let position = wrap(agent.position + velocity * dt, domain);
    Agent { position, velocity }
}

// A single correction per axis; assumes |velocity * dt| < domain.
// The second check also catches `-tiny + width` rounding up to `width`.
#[inline]
pub fn wrap(mut position: Vec2, domain: Vec2) -> Vec2 {
    if position.x < 0.0 {
        position.x += domain.x;
    }
    if position.x >= domain.x {
        position.x -= domain.x;
    }
    if position.y < 0.0 {
        position.y += domain.y;
    }
    if position.y >= domain.y {
        position.y -= domain.y;
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DOMAIN: Vec2 = Vec2::new(100.0, 50.0);

    #[test]
    fn velocity_is_updated_before_position() {
        let agent = Agent::new(Vec2::new(10.0, 10.0), Vec2::new(0.1, 0.0));
        let next = integrate(&agent, Vec2::new(0.1, 0.2), 1.0, 10.0, DOMAIN);
        assert_relative_eq!(next.velocity.x, 0.2);
        assert_relative_eq!(next.velocity.y, 0.2);
        assert_relative_eq!(next.position.x, 10.2);
        assert_relative_eq!(next.position.y, 10.2);
    }

    #[test]
    fn speed_is_clamped() {
        let agent = Agent::new(Vec2::new(10.0, 10.0), Vec2::new(3.0, 0.0));
        let next = integrate(&agent, Vec2::new(0.0, 4.0), 1.0, 1.0, DOMAIN);
        assert_relative_eq!(next.velocity.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(next.velocity.x, 0.6, epsilon = 1e-6);
        assert_relative_eq!(next.position.y, 10.8, epsilon = 1e-5);
    }

    #[test]
    fn dt_scales_both_updates() {
        let agent = Agent::new(Vec2::new(10.0, 10.0), Vec2::ZERO);
        let next = integrate(&agent, Vec2::new(1.0, 0.0), 0.5, 10.0, DOMAIN);
        assert_relative_eq!(next.velocity.x, 0.5);
        assert_relative_eq!(next.position.x, 10.25);
    }

    #[test]
    fn positions_wrap_across_every_edge() {
        assert_eq!(wrap(Vec2::new(-1.0, 20.0), DOMAIN), Vec2::new(99.0, 20.0));
        assert_eq!(wrap(Vec2::new(101.0, 20.0), DOMAIN), Vec2::new(1.0, 20.0));
        assert_eq!(wrap(Vec2::new(20.0, -2.0), DOMAIN), Vec2::new(20.0, 48.0));
        assert_eq!(wrap(Vec2::new(20.0, 52.0), DOMAIN), Vec2::new(20.0, 2.0));
        assert_eq!(wrap(Vec2::new(100.0, 50.0), DOMAIN), Vec2::ZERO);
    }

    #[test]
    fn tiny_negative_never_lands_on_the_far_edge() {
        let wrapped = wrap(Vec2::new(-1e-9, -1e-9), DOMAIN);
        assert!(wrapped.x >= 0.0 && wrapped.x < DOMAIN.x);
        assert!(wrapped.y >= 0.0 && wrapped.y < DOMAIN.y);
    }
}
