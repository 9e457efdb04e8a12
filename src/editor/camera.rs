use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;

#[derive(Component)]
pub struct EditorCamera;

/// The camera stays at the origin with unit scale so one world unit equals one logical pixel.
pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        EditorCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
        // Layer 0 = page and masks, Layer 1 = editor gizmos
        RenderLayers::from_layers(&[0, 1]),
    ));
}
