use bevy::prelude::*;

use crate::car::{self, Car};
use crate::tire_mark::TireMark;
use crate::track::{self, Track};
use crate::tuning::Tuning;

pub const BACKGROUND: Color = Color::srgb(30.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0);
const ROAD: Color = Color::srgb(70.0 / 255.0, 70.0 / 255.0, 70.0 / 255.0);
const WALL: Color = Color::srgb(20.0 / 255.0, 20.0 / 255.0, 20.0 / 255.0);
const LINE: Color = Color::srgb(220.0 / 255.0, 220.0 / 255.0, 220.0 / 255.0);
const CAR_COLOR: Color = Color::srgb(220.0 / 255.0, 60.0 / 255.0, 60.0 / 255.0);
const RUBBER: Color = Color::srgb(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0);

const CENTERLINE_WIDTH: f32 = 3.0;

// Draw order, back to front.
const TRACK_Z: f32 = 0.0;
const CENTERLINE_Z: f32 = 0.5;
const TIRE_MARK_Z: f32 = 1.0;
const CAR_Z: f32 = 2.0;

/// Draws the circuit, the car and its tire marks.
pub struct DriftRenderPlugin;

impl Plugin for DriftRenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND))
            .add_systems(Startup, (setup_camera, setup_track))
            .add_systems(
                Update,
                (attach_car_body, sync_car_transform, draw_tire_marks).chain(),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn setup_track(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    track: Res<Track>,
) {
    let center = track.center();
    let colors = [WALL, ROAD, WALL, ROAD];

    for (layer, (radius, color)) in track.layer_radii().into_iter().zip(colors).enumerate() {
        commands.spawn((
            Mesh2d(meshes.add(Circle::new(radius))),
            MeshMaterial2d(materials.add(color)),
            Transform::from_xyz(center.x, center.y, TRACK_Z + layer as f32 * 0.1),
        ));
    }

    commands.spawn((
        Mesh2d(meshes.add(track::create_centerline_mesh(&track, CENTERLINE_WIDTH))),
        MeshMaterial2d(materials.add(LINE)),
        Transform::from_xyz(center.x, center.y, CENTERLINE_Z),
    ));
}

/// Give a freshly spawned car its pentagon body.
fn attach_car_body(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    new_cars: Query<(Entity, &Car), Added<Car>>,
) {
    for (entity, car) in &new_cars {
        commands.entity(entity).insert((
            Mesh2d(meshes.add(car::create_body_mesh(car.tuning.size_vec2()))),
            MeshMaterial2d(materials.add(CAR_COLOR)),
        ));
    }
}

fn sync_car_transform(mut cars: Query<(&Car, &mut Transform)>) {
    for (car, mut transform) in &mut cars {
        *transform = pose_transform(car.pose(), CAR_Z);
    }
}

fn pose_transform(pose: Isometry2d, z: f32) -> Transform {
    Transform::from_xyz(pose.translation.x, pose.translation.y, z)
        .with_rotation(Quat::from_rotation_z(pose.rotation.as_radians()))
}

/// Slot in the pool of sprites used to show tire marks.
#[derive(Component)]
struct TireMarkSprite(usize);

fn mark_transform(mark: &TireMark) -> Transform {
    pose_transform(
        Isometry2d::new(mark.position, Rot2::degrees(mark.angle)),
        TIRE_MARK_Z,
    )
}

fn mark_color(mark: &TireMark) -> Color {
    RUBBER.with_alpha(mark.fade())
}

/// Show every live tire mark, growing the sprite pool when the trail gets longer
/// and hiding the slots it no longer needs.
fn draw_tire_marks(
    mut commands: Commands,
    tuning: Res<Tuning>,
    cars: Query<&Car>,
    mut sprites: Query<(&TireMarkSprite, &mut Transform, &mut Sprite, &mut Visibility), Without<Car>>,
) {
    let marks: Vec<&TireMark> = cars.iter().flat_map(|car| car.tire_marks.iter()).collect();

    let mut pooled = 0;
    for (slot, mut transform, mut sprite, mut visibility) in &mut sprites {
        pooled = pooled.max(slot.0 + 1);
        match marks.get(slot.0) {
            Some(mark) => {
                *transform = mark_transform(mark);
                sprite.color = mark_color(mark);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }

    let size = tuning.drift.mark_size_vec2();
    for (index, mark) in marks.iter().enumerate().skip(pooled) {
        commands.spawn((
            TireMarkSprite(index),
            Sprite::from_color(mark_color(mark), size),
            mark_transform(mark),
        ));
    }
}
