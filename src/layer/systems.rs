use super::components::TrailSprite;
use super::logic::{ResizeDebounce, level_index, pixel_size, step_density};
use super::resources::{PendingResize, WindCatalog, WindOverlay};
use crate::config::ViewerConfig;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::{PrimaryWindow, WindowResized};
use windfield::canvas::{PixelCanvas, TrailCanvas};
use windfield::catalog::FieldCatalog;
use windfield::context::{SimulationContext, TickOutcome};
use windfield::field::FieldPayload;
use windfield::layer::{OverlayLayer, WindLayer};
use windfield::projection::Equirectangular;

fn extent(size: (u32, u32)) -> Extent3d {
    Extent3d {
        width: size.0,
        height: size.1,
        depth_or_array_layers: 1,
    }
}

fn trail_image(size: (u32, u32)) -> Image {
    Image::new_fill(
        extent(size),
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

fn load_catalog(config: &ViewerConfig) -> FieldCatalog {
    let mut catalog = FieldCatalog::new();
    for entry in &config.fields {
        match entry.read_payload() {
            Ok(payload) => catalog.insert(entry.level.clone(), entry.step, payload),
            Err(err) => warn!("skipping wind field: {}", err),
        }
    }
    catalog
}

fn show_field(context: &mut SimulationContext, catalog: &FieldCatalog, payload: Option<FieldPayload>) {
    let Some(payload) = payload else {
        return;
    };
    match context.load_field(payload) {
        Ok(()) => {
            if let Some((level, step)) = catalog.current() {
                info!("showing level {} step {}", level, step);
            }
        }
        Err(err) => warn!("keeping previous wind field: {}", err),
    }
}

pub fn setup_overlay(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    config: Res<ViewerConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        warn!("no primary window, wind overlay disabled");
        return;
    };
    let size = pixel_size(window.width(), window.height());

    let catalog = load_catalog(&config);
    let mut context = SimulationContext::new(config.wind.clone());
    show_field(&mut context, &catalog, catalog.current_payload().cloned());

    let projector = Equirectangular::new(config.view, size);
    let mut layer = WindLayer::new(context, PixelCanvas::new(size.0, size.1));
    layer.attach(&projector);

    let image = images.add(trail_image(size));
    commands.spawn(Camera2d);
    commands.spawn((
        Sprite {
            image: image.clone(),
            custom_size: Some(Vec2::new(size.0 as f32, size.1 as f32)),
            ..default()
        },
        TrailSprite,
    ));

    info!("wind overlay ready at {}x{} with {} levels", size.0, size.1, catalog.levels().count());
    commands.insert_resource(WindOverlay { layer, projector, image });
    commands.insert_resource(WindCatalog { inner: catalog });
    commands.insert_resource(PendingResize {
        debounce: ResizeDebounce::new(config.resize_settle_secs),
    });
}

pub fn handle_keys(keys: Res<ButtonInput<KeyCode>>, mut overlay: ResMut<WindOverlay>, mut catalog: ResMut<WindCatalog>) {
    let context = overlay.layer.context_mut();
    let catalog = &mut catalog.inner;

    if keys.just_pressed(KeyCode::Space) {
        if context.is_running() {
            context.pause();
            info!("paused");
        } else {
            context.start();
            info!("resumed");
        }
    }

    for key in keys.get_just_pressed() {
        if let Some(index) = level_index(*key) {
            let payload = catalog.select_level(index).cloned();
            show_field(context, catalog, payload);
        }
    }

    if keys.just_pressed(KeyCode::BracketRight) {
        let payload = catalog.next_step().cloned();
        show_field(context, catalog, payload);
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        let payload = catalog.prev_step().cloned();
        show_field(context, catalog, payload);
    }

    let steps = keys.just_pressed(KeyCode::Equal) as i32 - keys.just_pressed(KeyCode::Minus) as i32;
    if steps != 0 {
        let density = step_density(context.density(), steps);
        context.set_density(density);
        info!("density {:.5} particles/px, {} particles", density, context.pool().len());
    }
}

pub fn track_resize(
    mut resized: MessageReader<WindowResized>,
    time: Res<Time>,
    mut pending: ResMut<PendingResize>,
    mut overlay: ResMut<WindOverlay>,
) {
    for event in resized.read() {
        let size = pixel_size(event.width, event.height);
        if pending.debounce.note(size, time.elapsed_secs_f64()) {
            overlay.layer.move_start();
        }
        overlay.layer.resize(size);
    }
}

pub fn settle_resize(
    time: Res<Time>,
    mut pending: ResMut<PendingResize>,
    mut overlay: ResMut<WindOverlay>,
    mut sprites: Query<&mut Sprite, With<TrailSprite>>,
) {
    let Some(size) = pending.debounce.settled(time.elapsed_secs_f64()) else {
        return;
    };
    let overlay = &mut *overlay;
    overlay.projector.set_size(size);
    overlay.layer.move_end(&overlay.projector);
    for mut sprite in &mut sprites {
        sprite.custom_size = Some(Vec2::new(size.0 as f32, size.1 as f32));
    }
    debug!("overlay resized to {}x{}", size.0, size.1);
}

pub fn render_overlay(mut overlay: ResMut<WindOverlay>, mut images: ResMut<Assets<Image>>) {
    let overlay = &mut *overlay;
    let TickOutcome::Rendered(stats) = overlay.layer.render_tick(&overlay.projector) else {
        return;
    };

    let frames = overlay.layer.context().frames();
    if frames % 600 == 0 {
        debug!(
            "frame {}: {} particles, {} drawn, {} skipped, {} reseeded",
            frames,
            stats.particles,
            stats.drawn,
            stats.skipped(),
            stats.reseeded
        );
    }

    let canvas = overlay.layer.canvas();
    let Some(image) = images.get_mut(&overlay.image) else {
        return;
    };
    let size = canvas.size();
    if (image.width(), image.height()) != size {
        image.resize(extent(size));
    }
    if let Some(data) = image.data.as_mut() {
        canvas.write_straight_rgba(data);
    }
}
