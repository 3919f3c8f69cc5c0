use bevy::prelude::*;

use crate::game::DriftScore;
use crate::tuning::Tuning;

const HUD_TEXT: Color = Color::srgb(230.0 / 255.0, 230.0 / 255.0, 230.0 / 255.0);

/// Controls reminder and running score in the top-left corner.
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, update_hud.run_if(resource_changed::<DriftScore>));
    }
}

#[derive(Component)]
struct HudText;

pub fn hud_line(score: u32) -> String {
    format!("WASD Drive | R Reset | Drift Score: {score}")
}

fn setup_hud(mut commands: Commands, score: Res<DriftScore>, tuning: Res<Tuning>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(20.0),
            left: Val::Px(20.0),
            ..default()
        },
        Text::new(hud_line(score.0)),
        TextFont {
            font_size: tuning.window.hud_font_size,
            ..default()
        },
        TextColor(HUD_TEXT),
        HudText,
    ));
}

fn update_hud(score: Res<DriftScore>, mut query: Query<&mut Text, With<HudText>>) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    text.0 = hud_line(score.0);
}
