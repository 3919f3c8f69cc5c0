use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Reference table compiled into the binary.
const BUNDLED_TUNING: &str = include_str!("../assets/tuning.toml");

/// Every constant the simulation and the window need, grouped by concern.
///
/// Missing sections or fields fall back to the reference values, so a table
/// only has to name what it changes.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Tuning {
    #[serde(default)]
    pub window: WindowTuning,
    #[serde(default)]
    pub track: TrackTuning,
    #[serde(default)]
    pub car: CarTuning,
    #[serde(default)]
    pub drift: DriftTuning,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowTuning {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub tick_hz: f64,
    pub hud_font_size: f32,
}

impl Default for WindowTuning {
    fn default() -> Self {
        Self {
            title: "Dual Tire Drift Track".to_string(),
            width: 1200,
            height: 800,
            tick_hz: 60.0,
            hud_font_size: 28.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct TrackTuning {
    pub center: [f32; 2],
    pub outer_radius: f32,
    pub inner_radius: f32,
    pub wall_thickness: f32,
}

impl Default for TrackTuning {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            outer_radius: 450.0,
            inner_radius: 250.0,
            wall_thickness: 20.0,
        }
    }
}

/// Per-tick car constants. Speeds are in pixels per tick.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct CarTuning {
    pub spawn_position: [f32; 2],
    /// Degrees, counter-clockwise from +x.
    pub spawn_heading: f32,
    pub engine_force: f32,
    pub brake_factor: f32,
    pub max_speed: f32,
    /// Degrees per tick at full speed.
    pub turn_rate: f32,
    pub friction: f32,
    pub steer_min_speed: f32,
    pub bounce_factor: f32,
    pub size: [f32; 2],
}

impl Default for CarTuning {
    fn default() -> Self {
        Self {
            spawn_position: [400.0, 0.0],
            spawn_heading: 90.0,
            engine_force: 0.35,
            brake_factor: 0.92,
            max_speed: 12.0,
            turn_rate: 3.2,
            friction: 0.965,
            steer_min_speed: 0.4,
            bounce_factor: -0.5,
            size: [36.0, 18.0],
        }
    }
}

impl CarTuning {
    pub fn spawn_position_vec2(&self) -> Vec2 {
        Vec2::from_array(self.spawn_position)
    }

    pub fn size_vec2(&self) -> Vec2 {
        Vec2::from_array(self.size)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct DriftTuning {
    pub min_speed: f32,
    pub angle_threshold: f32,
    pub cooldown_secs: f32,
    pub bonus: u32,
    /// Ticks a tire mark stays on the asphalt.
    pub mark_life: u32,
    pub mark_size: [f32; 2],
}

impl Default for DriftTuning {
    fn default() -> Self {
        Self {
            min_speed: 3.0,
            angle_threshold: 25.0,
            cooldown_secs: 1.0,
            bonus: 10,
            mark_life: 200,
            mark_size: [12.0, 4.0],
        }
    }
}

impl DriftTuning {
    pub fn mark_size_vec2(&self) -> Vec2 {
        Vec2::from_array(self.mark_size)
    }
}

impl Tuning {
    /// Parse and validate the table shipped with the game.
    pub fn bundled() -> Result<Self, String> {
        Self::from_toml_str(BUNDLED_TUNING)
    }

    /// Parse a tuning table from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        let tuning: Tuning =
            toml::from_str(text).map_err(|e| format!("Failed to parse tuning: {}", e))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the constraints the simulation relies on.
    pub fn validate(&self) -> Result<(), String> {
        if let Some((name, value)) = self.non_finite_field() {
            return Err(format!("{name} must be a finite number, got {value}"));
        }
        crate::track::Track::from_tuning(&self.track)?;

        let car = &self.car;
        if car.max_speed <= 0.0 {
            return Err(format!("max_speed must be positive, got {}", car.max_speed));
        }
        if !(0.0..=1.0).contains(&car.friction) {
            return Err(format!("friction must be within 0..=1, got {}", car.friction));
        }
        if !(0.0..=1.0).contains(&car.brake_factor) {
            return Err(format!(
                "brake_factor must be within 0..=1, got {}",
                car.brake_factor
            ));
        }
        if car.size.iter().any(|&side| side <= 0.0) {
            return Err(format!("car size must be positive, got {:?}", car.size));
        }
        if self.drift.mark_life == 0 {
            return Err("mark_life must be at least one tick".to_string());
        }
        if self.drift.cooldown_secs < 0.0 {
            return Err(format!(
                "cooldown_secs must not be negative, got {}",
                self.drift.cooldown_secs
            ));
        }
        if self.window.hud_font_size <= 0.0 {
            return Err(format!(
                "hud_font_size must be positive, got {}",
                self.window.hud_font_size
            ));
        }
        if self.window.tick_hz <= 0.0 {
            return Err(format!("tick_hz must be positive, got {}", self.window.tick_hz));
        }
        Ok(())
    }

    /// First float field holding `inf` or `nan`, which TOML happily parses.
    fn non_finite_field(&self) -> Option<(&'static str, f64)> {
        let (window, track, car, drift) = (&self.window, &self.track, &self.car, &self.drift);
        let fields: [(&'static str, f64); 24] = [
            ("tick_hz", window.tick_hz),
            ("hud_font_size", window.hud_font_size.into()),
            ("track center x", track.center[0].into()),
            ("track center y", track.center[1].into()),
            ("outer_radius", track.outer_radius.into()),
            ("inner_radius", track.inner_radius.into()),
            ("wall_thickness", track.wall_thickness.into()),
            ("spawn_position x", car.spawn_position[0].into()),
            ("spawn_position y", car.spawn_position[1].into()),
            ("spawn_heading", car.spawn_heading.into()),
            ("engine_force", car.engine_force.into()),
            ("brake_factor", car.brake_factor.into()),
            ("max_speed", car.max_speed.into()),
            ("turn_rate", car.turn_rate.into()),
            ("friction", car.friction.into()),
            ("steer_min_speed", car.steer_min_speed.into()),
            ("bounce_factor", car.bounce_factor.into()),
            ("car size x", car.size[0].into()),
            ("car size y", car.size[1].into()),
            ("min_speed", drift.min_speed.into()),
            ("angle_threshold", drift.angle_threshold.into()),
            ("cooldown_secs", drift.cooldown_secs.into()),
            ("mark_size x", drift.mark_size[0].into()),
            ("mark_size y", drift.mark_size[1].into()),
        ];
        fields.into_iter().find(|(_, value)| !value.is_finite())
    }
}
