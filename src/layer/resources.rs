use super::logic::ResizeDebounce;
use bevy::prelude::*;
use windfield::canvas::PixelCanvas;
use windfield::catalog::FieldCatalog;
use windfield::layer::WindLayer;
use windfield::projection::Equirectangular;

/// The wind overlay and the texture it is shown through
#[derive(Resource)]
pub struct WindOverlay {
    pub layer: WindLayer<PixelCanvas>,
    pub projector: Equirectangular,
    pub image: Handle<Image>,
}

/// Bevy-compatible field catalog resource
#[derive(Resource, Default)]
pub struct WindCatalog {
    pub inner: FieldCatalog,
}

#[derive(Resource)]
pub struct PendingResize {
    pub debounce: ResizeDebounce,
}
