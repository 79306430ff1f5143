use bevy::prelude::*;

/// Sprite showing the trail texture
#[derive(Component)]
pub struct TrailSprite;
