use glam::Vec2;
use rand::Rng;

// --- Helper Functions ---

// Uniform point in [0, domain.x) x [0, domain.y)
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, domain: Vec2) -> Vec2 {
    Vec2::new(
        rng.gen_range(0.0..domain.x.max(f32::MIN_POSITIVE)),
        rng.gen_range(0.0..domain.y.max(f32::MIN_POSITIVE)),
    )
}

// Each component uniform in [-max_speed, max_speed], then clamped so the
// magnitude never starts above the role's speed limit.
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, max_speed: f32) -> Vec2 {
    if max_speed <= 0.0 {
        return Vec2::ZERO;
    }
    let velocity = Vec2::new(
        rng.gen_range(-max_speed..=max_speed),
        rng.gen_range(-max_speed..=max_speed),
    );
    velocity.clamp_length_max(max_speed)
}
