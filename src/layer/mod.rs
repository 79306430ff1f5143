pub mod components;
pub mod logic;
pub mod resources;
mod systems;

use crate::layer::resources::WindOverlay;
use crate::layer::systems::*;
use bevy::prelude::*;

pub struct WindLayerPlugin;

impl Plugin for WindLayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_overlay).add_systems(
            Update,
            (handle_keys, track_resize, settle_resize, render_overlay)
                .chain()
                .run_if(resource_exists::<WindOverlay>),
        );
    }
}
