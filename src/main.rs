// disable console on windows for release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bevy::DefaultPlugins;
use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use windtrail::WindTrailPlugin;
use windtrail::config::{CONFIG_PATH, ViewerConfig};

fn main() {
    let config = ViewerConfig::load_or_default(CONFIG_PATH);
    let window = &config.window;

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.03, 0.05, 0.09)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title.clone(),
                resolution: WindowResolution::new(window.width, window.height),
                present_mode: PresentMode::AutoVsync,
                resize_constraints: WindowResizeConstraints {
                    min_width: 320.0,
                    min_height: 200.0,
                    ..default()
                },
                ..default()
            }),
            ..default()
        }))
        .insert_resource(config)
        .add_plugins(WindTrailPlugin)
        .run();
}
