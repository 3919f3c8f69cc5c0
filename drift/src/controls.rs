use bevy::prelude::*;

pub const THROTTLE_KEY: KeyCode = KeyCode::KeyW;
pub const BRAKE_KEY: KeyCode = KeyCode::KeyS;
pub const STEER_LEFT_KEY: KeyCode = KeyCode::KeyA;
pub const STEER_RIGHT_KEY: KeyCode = KeyCode::KeyD;
pub const RESET_KEY: KeyCode = KeyCode::KeyR;

/// Driver input sampled once per tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CarInput {
    pub throttle: bool,
    pub brake: bool,
    pub left: bool,
    pub right: bool,
}

impl CarInput {
    pub fn from_keys(keyboard: &ButtonInput<KeyCode>) -> Self {
        Self {
            throttle: keyboard.pressed(THROTTLE_KEY),
            brake: keyboard.pressed(BRAKE_KEY),
            left: keyboard.pressed(STEER_LEFT_KEY),
            right: keyboard.pressed(STEER_RIGHT_KEY),
        }
    }

    pub fn throttle() -> Self {
        Self {
            throttle: true,
            ..default()
        }
    }
}

pub fn reset_requested(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.pressed(RESET_KEY)
}
