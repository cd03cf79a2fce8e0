//! Static attraction/repulsion field built from Gaussian hotzones.
//!
//! The raster is computed once when a simulation is created and never
//! changes afterwards. Boids do not sample the raster; they follow the
//! analytic gradient of the same Gaussians (see `forces`). The raster exists
//! for the renderer.

use crate::config::Hotzone;
use serde::Serialize;

/// One raster cell in plotting form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSample {
    pub x: u32,
    pub y: u32,
    pub value: f32,
}

/// Dense `width * height` scalar grid, row-major (`y * width + x`), plus the
/// equivalent sample list.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRaster {
    width: u32,
    height: u32,
    values: Vec<f32>,
    samples: Vec<FieldSample>,
    normalized: bool,
}

impl FieldRaster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn samples(&self) -> &[FieldSample] {
        &self.samples
    }

    /// False when the raw contributions summed to <= 0 and the raster was
    /// left as-is.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            self.values
                .get(y as usize * self.width as usize + x as usize)
                .copied()
        } else {
            None
        }
    }
}

/// Sum of `strength * exp(-(dx^2 / 2sx^2 + dy^2 / 2sy^2))` over all hotzones,
/// evaluated at integer cell coordinates and normalized to unit sum when the
/// total is positive.
pub fn generate_field(width: u32, height: u32, hotzones: &[Hotzone]) -> FieldRaster {
    // (cx, cy, strength, 1 / 2sx^2, 1 / 2sy^2)
    let params: Vec<(f64, f64, f64, f64, f64)> = hotzones
        .iter()
        .map(|zone| {
            let sx = zone.sigma_x as f64;
            let sy = zone.sigma_y as f64;
            (
                zone.center.x as f64,
                zone.center.y as f64,
                zone.strength as f64,
                1.0 / (2.0 * sx * sx),
                1.0 / (2.0 * sy * sy),
            )
        })
        .collect();

    let cell_count = width as usize * height as usize;
    let mut raw = vec![0.0f64; cell_count];
    for y in 0..height {
        for x in 0..width {
            let mut value = 0.0;
            for &(cx, cy, strength, inv_x, inv_y) in &params {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                value += strength * (-(dx * dx * inv_x + dy * dy * inv_y)).exp();
            }
            raw[y as usize * width as usize + x as usize] = value;
        }
    }

    let total: f64 = raw.iter().sum();
    let normalized = total > 0.0;
    if normalized {
        let inv_total = 1.0 / total;
        raw.iter_mut().for_each(|value| *value *= inv_total);
    } else {
        log::warn!(
            "Field over {}x{} with {} hotzones sums to {:.6}; leaving it unnormalized",
            width,
            height,
            hotzones.len(),
            total
        );
    }

    let values: Vec<f32> = raw.iter().map(|&value| value as f32).collect();
    let samples = values
        .iter()
        .enumerate()
        .map(|(index, &value)| FieldSample {
            x: (index % width as usize) as u32,
            y: (index / width as usize) as u32,
            value,
        })
        .collect();

    FieldRaster {
        width,
        height,
        values,
        samples,
        normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    const FIELD_SUM_TOLERANCE: f64 = 1e-6;

    fn sum(raster: &FieldRaster) -> f64 {
        raster.values().iter().map(|&v| v as f64).sum()
    }

    #[test]
    fn positive_field_sums_to_one() {
        let zones = [
            Hotzone::new(Vec2::new(0.0, 50.0), 2.0, 200.0, -0.1),
            Hotzone::new(Vec2::new(75.0, 75.0), 10.0, 10.0, 1.0),
            Hotzone::new(Vec2::new(25.0, 25.0), 10.0, 10.0, 1.0),
        ];
        let raster = generate_field(100, 100, &zones);
        assert!(raster.is_normalized());
        assert_eq!(raster.values().len(), 10_000);
        assert!((sum(&raster) - 1.0).abs() < FIELD_SUM_TOLERANCE);
    }

    #[test]
    fn peak_sits_on_the_hotzone_center() {
        let zones = [Hotzone::new(Vec2::new(6.0, 3.0), 1.5, 1.5, 2.0)];
        let raster = generate_field(12, 8, &zones);
        let peak = raster
            .samples()
            .iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
            .unwrap();
        assert_eq!((peak.x, peak.y), (6, 3));
        assert_eq!(raster.get(6, 3), Some(peak.value));
    }

    #[test]
    fn cancelling_field_is_left_unnormalized() {
        let zones = [
            Hotzone::new(Vec2::new(5.0, 5.0), 2.0, 2.0, 1.0),
            Hotzone::new(Vec2::new(5.0, 5.0), 2.0, 2.0, -1.0),
        ];
        let raster = generate_field(10, 10, &zones);
        assert!(!raster.is_normalized());
        assert!(raster.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn repelling_only_field_keeps_raw_values() {
        let zones = [Hotzone::new(Vec2::new(0.0, 0.0), 1.0, 1.0, -3.0)];
        let raster = generate_field(4, 4, &zones);
        assert!(!raster.is_normalized());
        assert_relative_eq!(raster.get(0, 0).unwrap(), -3.0);
        assert_relative_eq!(
            raster.get(1, 0).unwrap(),
            -3.0 * (-0.5f32).exp(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn no_hotzones_gives_zero_raster() {
        let raster = generate_field(3, 2, &[]);
        assert!(!raster.is_normalized());
        assert_eq!(raster.values(), &[0.0f32; 6]);
        assert_eq!(raster.samples().len(), 6);
        assert_eq!(raster.samples()[4], FieldSample { x: 1, y: 1, value: 0.0 });
        assert_eq!(raster.get(3, 0), None);
    }
}
