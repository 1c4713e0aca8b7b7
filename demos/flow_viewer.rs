//! `flow_viewer`: an animated flow field next to a static island map.
//!
//! Run with:
//!   cargo run --example flow_viewer

use bevy::prelude::*;
use bevy_symbios_flow::{
    FlowField, FractalConfig, SymbiosFlowPlugin, TerrainShader,
    async_gen::{FieldReady, PendingField},
};

const TEX_SIZE: u32 = 384;
const SPACING: f32 = TEX_SIZE as f32 + 20.0;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "bevy_symbios_flow viewer".into(),
                resolution: ((SPACING * 2.0 + 40.0) as u32, (TEX_SIZE + 80)).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(SymbiosFlowPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, show_ready_fields)
        .run();
}

fn setup(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    commands.spawn(Camera2d);

    match FlowField::new(FractalConfig::default(), 7, TEX_SIZE, TEX_SIZE, &mut images) {
        Ok(field) => {
            let image = field.image().clone();
            commands.spawn((
                field,
                Sprite {
                    image,
                    custom_size: Some(Vec2::splat(TEX_SIZE as f32)),
                    ..default()
                },
                Transform::from_translation(Vec3::new(-SPACING * 0.5, 0.0, 0.0)),
            ));
        }
        Err(e) => error!("could not build flow field: {e}"),
    }

    commands.spawn(PendingField::terrain(
        FractalConfig::island(),
        TerrainShader::default(),
        7,
        TEX_SIZE,
        TEX_SIZE,
    ));
}

fn show_ready_fields(mut commands: Commands, ready: Query<(Entity, &FieldReady), Added<FieldReady>>) {
    for (entity, field) in &ready {
        commands.entity(entity).insert((
            Sprite {
                image: field.0.clone(),
                custom_size: Some(Vec2::splat(TEX_SIZE as f32)),
                ..default()
            },
            Transform::from_translation(Vec3::new(SPACING * 0.5, 0.0, 0.0)),
        ));
    }
}
