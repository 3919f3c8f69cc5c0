use bevy::prelude::*;

/// A rubber streak left on the asphalt while drifting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TireMark {
    pub position: Vec2,
    /// Heading of the car when the mark was laid, in degrees.
    pub angle: f32,
    pub life: u32,
    max_life: u32,
}

impl TireMark {
    pub fn new(position: Vec2, angle: f32, life: u32) -> Self {
        Self {
            position,
            angle,
            life,
            max_life: life,
        }
    }

    /// Take one tick off the mark. Returns `false` once it has expired.
    pub fn age(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// Remaining life as a fraction, used as the draw alpha.
    pub fn fade(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }
}
