use bevy::prelude::*;

use crate::tuning::TrackTuning;

/// The circular circuit: a road ring bounded by an outer and an inner wall.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Track {
    center: Vec2,
    outer_radius: f32,
    inner_radius: f32,
    wall_thickness: f32,
}

impl Track {
    /// Build the track, rejecting geometry with `inner_radius >= outer_radius`.
    pub fn from_tuning(tuning: &TrackTuning) -> Result<Self, String> {
        if tuning.inner_radius <= 0.0 {
            return Err(format!(
                "inner_radius must be positive, got {}",
                tuning.inner_radius
            ));
        }
        if tuning.inner_radius >= tuning.outer_radius {
            return Err(format!(
                "inner_radius ({}) must be smaller than outer_radius ({})",
                tuning.inner_radius, tuning.outer_radius
            ));
        }
        if tuning.wall_thickness < 0.0 {
            return Err(format!(
                "wall_thickness must not be negative, got {}",
                tuning.wall_thickness
            ));
        }
        Ok(Self {
            center: Vec2::from_array(tuning.center),
            outer_radius: tuning.outer_radius,
            inner_radius: tuning.inner_radius,
            wall_thickness: tuning.wall_thickness,
        })
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    pub fn wall_thickness(&self) -> f32 {
        self.wall_thickness
    }

    pub fn centerline_radius(&self) -> f32 {
        (self.outer_radius + self.inner_radius) * 0.5
    }

    /// True when `point` is past the outer wall or inside the inner wall.
    /// Both boundary circles count as drivable.
    pub fn collision(&self, point: Vec2) -> bool {
        let d = point.distance(self.center);
        d > self.outer_radius + self.wall_thickness || d < self.inner_radius
    }

    /// Radii of the filled discs, back to front: outer wall, road, inner wall, infield.
    pub fn layer_radii(&self) -> [f32; 4] {
        [
            self.outer_radius + self.wall_thickness,
            self.outer_radius,
            self.inner_radius,
            (self.inner_radius - self.wall_thickness).max(0.0),
        ]
    }
}

/// Thin ring mesh for the painted centre line.
pub fn create_centerline_mesh(track: &Track, line_width: f32) -> Mesh {
    let radius = track.centerline_radius();
    Annulus::new(radius - line_width * 0.5, radius + line_width * 0.5).into()
}
