pub mod config;
pub mod layer;

use crate::config::ViewerConfig;
use crate::layer::WindLayerPlugin;
use bevy::app::App;
#[cfg(debug_assertions)]
use bevy::diagnostic::LogDiagnosticsPlugin;
use bevy::prelude::*;

/// Wind trails over a plate carrée view. Expects a [`ViewerConfig`] resource,
/// falls back to defaults when none is inserted.
pub struct WindTrailPlugin;

impl Plugin for WindTrailPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerConfig>().add_plugins(WindLayerPlugin);

        #[cfg(debug_assertions)]
        {
            app.add_plugins(LogDiagnosticsPlugin::default());
        }
    }
}
