use std::time::Duration;

use bevy::prelude::*;

use crate::controls::CarInput;
use crate::tire_mark::TireMark;
use crate::track::Track;
use crate::tuning::{CarTuning, DriftTuning};

/// Kinematic state of the player's car.
///
/// Units are per tick: `velocity` is added to `position` once per
/// [`Car::update`]. `heading` is in degrees, counter-clockwise from +x.
#[derive(Component, Debug, Clone)]
pub struct Car {
    pub position: Vec2,
    pub velocity: Vec2,
    pub heading: f32,
    pub tuning: CarTuning,
    pub drift: DriftTuning,
    pub tire_marks: Vec<TireMark>,
    /// Clock value of the last drift that paid out.
    pub last_scored_drift: Option<Duration>,
    initial: CarTuning,
}

impl Car {
    pub fn new(tuning: CarTuning, drift: DriftTuning) -> Self {
        Self {
            position: tuning.spawn_position_vec2(),
            velocity: Vec2::ZERO,
            heading: tuning.spawn_heading,
            tuning,
            drift,
            tire_marks: Vec::new(),
            last_scored_drift: None,
            initial: tuning,
        }
    }

    /// Put the car back on the grid. The score cooldown is left running.
    pub fn reset(&mut self) {
        self.tuning = self.initial;
        self.position = self.tuning.spawn_position_vec2();
        self.velocity = Vec2::ZERO;
        self.heading = self.tuning.spawn_heading;
        self.tire_marks.clear();
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading.to_radians())
    }

    /// Position and heading as a rigid transform from car space to world space.
    pub fn pose(&self) -> Isometry2d {
        Isometry2d::new(self.position, Rot2::degrees(self.heading))
    }

    /// Unsigned angle between the direction of travel and the heading, in `0..=180` degrees.
    pub fn slip_angle(&self) -> f32 {
        let travel = self.velocity.y.atan2(self.velocity.x).to_degrees();
        ((travel - self.heading + 180.0).rem_euclid(360.0) - 180.0).abs()
    }

    /// Advance one tick and return the drift bonus earned, if any.
    ///
    /// `now` is the simulation clock; it only gates how often a drift pays out.
    pub fn update(&mut self, input: CarInput, track: &Track, now: Duration) -> u32 {
        let speed = self.speed();

        if input.throttle {
            self.velocity += self.forward() * self.tuning.engine_force;
        }
        if input.brake {
            self.velocity *= self.tuning.brake_factor;
        }

        if speed > self.tuning.steer_min_speed {
            let steer = self.tuning.turn_rate * (speed / self.tuning.max_speed);
            if input.left {
                self.heading += steer;
            }
            if input.right {
                self.heading -= steer;
            }
        }

        self.velocity = self.velocity.clamp_length_max(self.tuning.max_speed);
        self.velocity *= self.tuning.friction;
        self.position += self.velocity;

        if track.collision(self.position) {
            self.velocity *= self.tuning.bounce_factor;
            self.position += self.velocity;
        }

        let drifting =
            speed > self.drift.min_speed && self.slip_angle() > self.drift.angle_threshold;
        let points = if drifting {
            self.lay_tire_marks();
            self.score_drift(now)
        } else {
            0
        };

        self.tire_marks.retain_mut(TireMark::age);

        points
    }

    fn lay_tire_marks(&mut self) {
        let size = self.tuning.size_vec2();
        let rotation = Rot2::degrees(self.heading);
        for side in [1.0, -1.0] {
            let offset = rotation * Vec2::new(-size.x / 2.0, side * size.y / 4.0);
            self.tire_marks.push(TireMark::new(
                self.position + offset,
                self.heading,
                self.drift.mark_life,
            ));
        }
    }

    fn score_drift(&mut self, now: Duration) -> u32 {
        // A cooldown too large for a Duration never elapses.
        let cooldown = Duration::try_from_secs_f32(self.drift.cooldown_secs.max(0.0))
            .unwrap_or(Duration::MAX);
        let ready = self
            .last_scored_drift
            .is_none_or(|last| now.saturating_sub(last) >= cooldown);
        if !ready {
            return 0;
        }
        self.last_scored_drift = Some(now);
        self.drift.bonus
    }
}

/// Car outline in car space, nose along +x: a pentagon with a pointed front.
pub fn body_outline(size: Vec2) -> [Vec2; 5] {
    let (w, h) = (size.x, size.y);
    [
        Vec2::new(w / 2.0, 0.0),
        Vec2::new(w / 4.0, h / 2.0),
        Vec2::new(-w / 2.0, h / 2.0),
        Vec2::new(-w / 2.0, -h / 2.0),
        Vec2::new(w / 4.0, -h / 2.0),
    ]
}

/// Filled mesh of [`body_outline`], fanned from the nose.
pub fn create_body_mesh(size: Vec2) -> Mesh {
    let positions: Vec<[f32; 3]> = body_outline(size)
        .iter()
        .map(|p| [p.x, p.y, 0.0])
        .collect();
    let indices = vec![0, 1, 2, 0, 2, 3, 0, 3, 4];

    let mut mesh = Mesh::new(
        bevy::mesh::PrimitiveTopology::TriangleList,
        bevy::asset::RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(bevy::mesh::Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::TrackTuning;

    fn track() -> Track {
        Track::from_tuning(&TrackTuning::default()).unwrap()
    }

    fn car() -> Car {
        Car::new(CarTuning::default(), DriftTuning::default())
    }

    /// A car sliding sideways: moving along +x while pointing along +y.
    fn sliding_car() -> Car {
        let mut car = car();
        car.velocity = Vec2::new(6.0, 0.0);
        car
    }

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn speed_never_exceeds_max_after_clamp() {
        let track = track();
        let mut car = car();
        car.velocity = Vec2::new(0.0, 50.0);
        let inputs = [
            CarInput::throttle(),
            CarInput {
                throttle: true,
                left: true,
                ..default()
            },
            CarInput {
                throttle: true,
                right: true,
                ..default()
            },
            CarInput {
                brake: true,
                ..default()
            },
        ];
        for tick in 0..600 {
            car.update(inputs[(tick / 37) % inputs.len()], &track, secs(tick as f32 / 60.0));
            assert!(
                car.speed() <= car.tuning.max_speed + 1e-4,
                "tick {tick}: speed {}",
                car.speed()
            );
        }
    }

    #[test]
    fn throttle_from_rest_drives_straight_along_heading() {
        let track = track();
        let mut car = car();
        let start = car.position;
        let mut previous_speed = 0.0;

        for tick in 0..40 {
            let points = car.update(CarInput::throttle(), &track, secs(tick as f32 / 60.0));
            assert_eq!(points, 0);
            assert!(car.speed() > previous_speed, "tick {tick}");
            assert!(car.speed() <= car.tuning.max_speed);
            previous_speed = car.speed();
        }

        assert!((car.position.x - start.x).abs() < 1e-3);
        assert!(car.position.y > start.y + 100.0);
        assert!(car.tire_marks.is_empty());
        assert_eq!(car.heading, 90.0);
    }

    #[test]
    fn no_steering_below_minimum_speed() {
        let track = track();
        let mut car = car();
        car.update(
            CarInput {
                left: true,
                ..default()
            },
            &track,
            Duration::ZERO,
        );
        assert_eq!(car.heading, 90.0);
    }

    #[test]
    fn steering_scales_with_speed() {
        let track = track();
        let mut car = car();
        car.velocity = Vec2::new(0.0, 6.0);
        car.update(
            CarInput {
                left: true,
                ..default()
            },
            &track,
            Duration::ZERO,
        );
        // turn_rate * (6 / 12)
        assert!((car.heading - 91.6).abs() < 1e-4);

        car.velocity = Vec2::new(0.0, 6.0);
        car.update(
            CarInput {
                right: true,
                ..default()
            },
            &track,
            Duration::ZERO,
        );
        assert!((car.heading - 90.0).abs() < 1e-4);
    }

    #[test]
    fn brake_scales_velocity_down() {
        let track = track();
        let mut car = car();
        car.velocity = Vec2::new(0.0, 10.0);
        car.update(
            CarInput {
                brake: true,
                ..default()
            },
            &track,
            Duration::ZERO,
        );
        assert!((car.speed() - 10.0 * 0.92 * 0.965).abs() < 1e-4);
    }

    #[test]
    fn wall_hit_bounces_back() {
        let track = track();
        let mut car = car();
        car.position = Vec2::new(466.0, 0.0);
        car.velocity = Vec2::new(5.0, 0.0);
        car.update(CarInput::default(), &track, Duration::ZERO);

        assert!(car.velocity.x < 0.0);
        assert!((car.velocity.x + 5.0 * 0.965 * 0.5).abs() < 1e-4);
        assert!(!track.collision(car.position));
    }

    #[test]
    fn slip_angle_wraps_to_half_turn() {
        let mut car = car();
        car.heading = 350.0;
        car.velocity = Vec2::new(1.0, 0.0);
        assert!((car.slip_angle() - 10.0).abs() < 1e-3);

        car.heading = -170.0;
        assert!((car.slip_angle() - 170.0).abs() < 1e-3);
    }

    #[test]
    fn drift_lays_two_marks_per_tick() {
        let track = track();
        let mut car = sliding_car();
        let points = car.update(CarInput::default(), &track, Duration::ZERO);
        assert_eq!(points, 10);
        assert_eq!(car.tire_marks.len(), 2);

        // Rear wheels sit behind the car centre relative to its heading.
        for mark in &car.tire_marks {
            let local = car.pose().inverse().transform_point(mark.position);
            assert!((local.x + 18.0).abs() < 1e-3);
            assert!((local.y.abs() - 4.5).abs() < 1e-3);
            assert_eq!(mark.life, 199);
        }
    }

    #[test]
    fn drift_score_is_rate_limited_by_cooldown() {
        let track = track();
        let mut car = sliding_car();
        assert_eq!(car.update(CarInput::default(), &track, secs(0.0)), 10);

        car.velocity = Vec2::new(6.0, 0.0);
        assert_eq!(car.update(CarInput::default(), &track, secs(0.5)), 0);
        assert_eq!(car.tire_marks.len(), 4);

        car.velocity = Vec2::new(6.0, 0.0);
        assert_eq!(car.update(CarInput::default(), &track, secs(0.99)), 0);

        car.velocity = Vec2::new(6.0, 0.0);
        assert_eq!(car.update(CarInput::default(), &track, secs(1.0)), 10);
        assert_eq!(car.last_scored_drift, Some(secs(1.0)));
    }

    #[test]
    fn unbounded_cooldown_pays_out_once_without_panicking() {
        let track = track();
        let mut car = sliding_car();
        car.drift.cooldown_secs = f32::INFINITY;
        assert_eq!(car.update(CarInput::default(), &track, secs(0.0)), 10);

        car.velocity = Vec2::new(6.0, 0.0);
        assert_eq!(car.update(CarInput::default(), &track, secs(1000.0)), 0);
    }

    #[test]
    fn slow_slide_is_not_a_drift() {
        let track = track();
        let mut car = car();
        car.velocity = Vec2::new(2.5, 0.0);
        assert_eq!(car.update(CarInput::default(), &track, Duration::ZERO), 0);
        assert!(car.tire_marks.is_empty());
    }

    #[test]
    fn tire_marks_vanish_exactly_at_end_of_life() {
        let track = track();
        let mut car = sliding_car();
        car.update(CarInput::default(), &track, Duration::ZERO);
        car.velocity = Vec2::ZERO;

        for _ in 0..198 {
            car.update(CarInput::default(), &track, Duration::ZERO);
        }
        assert_eq!(car.tire_marks.len(), 2);
        assert!(car.tire_marks.iter().all(|mark| mark.life == 1));

        car.update(CarInput::default(), &track, Duration::ZERO);
        assert!(car.tire_marks.is_empty());
    }

    #[test]
    fn reset_restores_spawn_state() {
        let track = track();
        let mut car = sliding_car();
        car.update(CarInput::default(), &track, Duration::ZERO);
        car.heading = 12.0;
        car.tuning.max_speed = 99.0;
        assert!(!car.tire_marks.is_empty());

        car.reset();
        assert_eq!(car.position, Vec2::new(400.0, 0.0));
        assert_eq!(car.velocity, Vec2::ZERO);
        assert_eq!(car.heading, 90.0);
        assert_eq!(car.tuning, CarTuning::default());
        assert!(car.tire_marks.is_empty());
        assert_eq!(car.last_scored_drift, Some(Duration::ZERO));
    }

    #[test]
    fn pose_places_outline_around_position() {
        let mut car = car();
        car.position = Vec2::new(10.0, 20.0);
        let nose = car.pose().transform_point(body_outline(car.tuning.size_vec2())[0]);
        // Heading 90 puts the nose straight up.
        assert!((nose - Vec2::new(10.0, 38.0)).length() < 1e-3);
    }
}
