use bevy::{prelude::*, window::WindowCloseRequested};

use crate::car::Car;
use crate::controls::{self, CarInput};
use crate::track::Track;
use crate::tuning::Tuning;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopState {
    #[default]
    Running,
    Terminated,
}

/// Drift points collected since start-up or the last reset.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DriftScore(pub u32);

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickSystems {
    Input,
    Physics,
}

/// Simulation and loop control. Needs `ButtonInput<KeyCode>` and the
/// `WindowCloseRequested` message, both provided by `DefaultPlugins`.
pub struct DriftGamePlugin {
    tuning: Tuning,
    track: Track,
}

impl DriftGamePlugin {
    pub fn new(tuning: Tuning) -> Result<Self, String> {
        tuning.validate()?;
        let track = Track::from_tuning(&tuning.track)?;
        Ok(Self { tuning, track })
    }
}

impl Plugin for DriftGamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<LoopState>()
            .insert_resource(self.tuning.clone())
            .insert_resource(self.track)
            .init_resource::<DriftScore>()
            .insert_resource(Time::<Fixed>::from_hz(self.tuning.window.tick_hz))
            .add_systems(Startup, spawn_car)
            .configure_sets(
                FixedUpdate,
                (TickSystems::Input, TickSystems::Physics)
                    .chain()
                    .run_if(in_state(LoopState::Running)),
            )
            .add_systems(
                FixedUpdate,
                (
                    reset_on_key.in_set(TickSystems::Input),
                    drive_car.in_set(TickSystems::Physics),
                ),
            )
            .add_systems(Update, watch_for_quit.run_if(in_state(LoopState::Running)))
            .add_systems(OnEnter(LoopState::Terminated), shut_down);
    }
}

fn spawn_car(mut commands: Commands, tuning: Res<Tuning>, track: Res<Track>) {
    let car = Car::new(tuning.car, tuning.drift);
    info!(
        "Circuit ready: center {}, road {}..{}, wall {}, {} Hz",
        track.center(),
        track.inner_radius(),
        track.outer_radius(),
        track.wall_thickness(),
        tuning.window.tick_hz
    );
    commands.spawn((car, Transform::default(), Visibility::default()));
}

fn reset_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut score: ResMut<DriftScore>,
    mut cars: Query<&mut Car>,
) {
    if !controls::reset_requested(&keyboard) {
        return;
    }
    for mut car in &mut cars {
        car.reset();
    }
    if score.0 > 0 {
        info!("Reset, discarding {} drift points", score.0);
        score.0 = 0;
    }
}

fn drive_car(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    track: Res<Track>,
    mut score: ResMut<DriftScore>,
    mut cars: Query<&mut Car>,
) {
    let input = CarInput::from_keys(&keyboard);
    for mut car in &mut cars {
        let points = car.update(input, &track, time.elapsed());
        if points > 0 {
            score.0 += points;
            debug!("Drift bonus +{points}, score {}", score.0);
        }
    }
}

fn watch_for_quit(
    mut close_requests: MessageReader<WindowCloseRequested>,
    mut next_state: ResMut<NextState<LoopState>>,
) {
    if close_requests.read().next().is_some() {
        next_state.set(LoopState::Terminated);
    }
}

fn shut_down(score: Res<DriftScore>, mut exit: MessageWriter<AppExit>) {
    info!("Final drift score: {}", score.0);
    exit.write(AppExit::Success);
}
