//! Radius along a branch as a function of the curve parameter.

use crate::error::{GeometryError, InvalidMeshParams};

/// Maps the curve parameter `t` in `[0, 1]` to a tube radius.
///
/// Implemented for closures so tests and callers can supply arbitrary
/// profiles; the tube builder rejects any profile that is not strictly
/// positive at every sampled `t`.
pub trait RadiusProfile {
    fn radius_at(&self, t: f32) -> f32;
}

impl<F> RadiusProfile for F
where
    F: Fn(f32) -> f32,
{
    fn radius_at(&self, t: f32) -> f32 {
        self(t)
    }
}

/// Linear taper from `base_thickness` at the root to
/// `base_thickness * taper` at the tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTaper {
    base_thickness: f32,
    taper: f32,
}

impl LinearTaper {
    pub fn new(base_thickness: f32, taper: f32) -> Result<Self, GeometryError> {
        if !(base_thickness.is_finite() && base_thickness > 0.0) {
            return Err(InvalidMeshParams::NonPositiveThickness(base_thickness).into());
        }
        if !(taper > 0.0 && taper <= 1.0) {
            return Err(InvalidMeshParams::TaperOutOfRange(taper).into());
        }
        Ok(Self {
            base_thickness,
            taper,
        })
    }

    pub fn base_thickness(&self) -> f32 {
        self.base_thickness
    }

    pub fn taper(&self) -> f32 {
        self.taper
    }

    pub fn tip_radius(&self) -> f32 {
        self.base_thickness * self.taper
    }
}

impl RadiusProfile for LinearTaper {
    fn radius_at(&self, t: f32) -> f32 {
        self.base_thickness * (1.0 - t.clamp(0.0, 1.0) * (1.0 - self.taper))
    }
}
