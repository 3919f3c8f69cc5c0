use bevy::{prelude::*, window::PresentMode};

use drift::hud::HudPlugin;
use drift::render::DriftRenderPlugin;
use drift::{DriftGamePlugin, Tuning};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tuning = Tuning::bundled()?;
    let game = DriftGamePlugin::new(tuning.clone())?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: tuning.window.title.clone(),
                resolution: (tuning.window.width, tuning.window.height).into(),
                present_mode: PresentMode::AutoVsync,
                resizable: false,
                ..default()
            }),
            // Closing goes through LoopState::Terminated so the final score is logged.
            close_when_requested: false,
            ..default()
        }))
        .add_plugins((game, DriftRenderPlugin, HudPlugin))
        .run();

    Ok(())
}
