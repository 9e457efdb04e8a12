//! The page sprite and its placement inside the window.

use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;
use image::RgbaImage;

use crate::constants::{PAGE_PADDING, SIDE_PANEL_WIDTH, TOOLBAR_HEIGHT};

use super::coordinator::CurrentRaster;
use super::session::EditorSession;

/// Marker for the sprite showing the rendered page
#[derive(Component)]
pub struct PageSurface;

/// Convert an RGBA raster into a bevy texture.
pub fn rgba_to_image(raster: &RgbaImage) -> Image {
    Image::new(
        Extent3d {
            width: raster.width().max(1),
            height: raster.height().max(1),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        if raster.width() == 0 || raster.height() == 0 {
            vec![255; 4]
        } else {
            raster.as_raw().clone()
        },
        TextureFormat::Rgba8UnormSrgb,
        default(),
    )
}

/// Window region left for the page once panels are laid out, as (top-left, size) in
/// logical pixels.
pub fn available_area(window_size: Vec2, fullscreen: bool) -> (Vec2, Vec2) {
    let (min, max) = if fullscreen {
        (Vec2::ZERO, window_size)
    } else {
        (
            Vec2::new(0.0, TOOLBAR_HEIGHT),
            Vec2::new(window_size.x - SIDE_PANEL_WIDTH, window_size.y),
        )
    };
    let padding = if fullscreen { 0.0 } else { PAGE_PADDING };
    let min = min + Vec2::splat(padding);
    let size = (max - Vec2::splat(padding) - min).max(Vec2::ZERO);
    (min, size)
}

/// Largest size with the given aspect ratio (width / height) that fits in `area`.
pub fn fit_to_area(aspect_ratio: f32, area: Vec2) -> Vec2 {
    if aspect_ratio <= 0.0 || area.x <= 0.0 || area.y <= 0.0 {
        return Vec2::ZERO;
    }
    let width = area.x.min(area.y * aspect_ratio);
    Vec2::new(width, width / aspect_ratio)
}

pub fn spawn_page_surface(mut commands: Commands) {
    commands.spawn((
        Sprite::default(),
        PageSurface,
        Transform::from_translation(Vec3::ZERO),
        Visibility::Hidden,
    ));
}

/// Upload the current raster to the page sprite
pub fn update_surface_image(
    raster: Res<CurrentRaster>,
    mut images: ResMut<Assets<Image>>,
    mut surface: Query<(&mut Sprite, &mut Visibility), With<PageSurface>>,
) {
    let Ok((mut sprite, mut visibility)) = surface.single_mut() else {
        return;
    };

    match &raster.0 {
        Some(page) => {
            sprite.image = images.add(rgba_to_image(&page.image));
            *visibility = Visibility::Inherited;
        }
        None => {
            sprite.image = Handle::default();
            *visibility = Visibility::Hidden;
        }
    }
}

/// Size and center the page sprite in the area not covered by panels
pub fn layout_page_surface(
    window_query: Query<&Window, With<PrimaryWindow>>,
    session: Res<EditorSession>,
    raster: Res<CurrentRaster>,
    mut surface: Query<(&mut Sprite, &mut Transform), With<PageSurface>>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((mut sprite, mut transform)) = surface.single_mut() else {
        return;
    };
    let Some(page) = &raster.0 else {
        return;
    };

    let window_size = Vec2::new(window.width(), window.height());
    let (area_min, area_size) = available_area(window_size, session.fullscreen);
    let size = fit_to_area(page.aspect_ratio(), area_size);
    let center = area_min + area_size / 2.0;

    // Camera sits at the origin: world = viewport offset from window center, y up
    let world = Vec2::new(center.x - window_size.x / 2.0, window_size.y / 2.0 - center.y);

    if sprite.custom_size != Some(size) {
        sprite.custom_size = Some(size);
    }
    if transform.translation.truncate() != world {
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_page_into_tall_area() {
        let size = fit_to_area(2.0, Vec2::new(400.0, 1000.0));
        assert_eq!(size, Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_fit_tall_page_into_wide_area() {
        let size = fit_to_area(0.5, Vec2::new(1000.0, 400.0));
        assert_eq!(size, Vec2::new(200.0, 400.0));
    }

    #[test]
    fn test_fit_degenerate_inputs() {
        assert_eq!(fit_to_area(0.0, Vec2::new(10.0, 10.0)), Vec2::ZERO);
        assert_eq!(fit_to_area(1.0, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_fullscreen_uses_whole_window() {
        let window = Vec2::new(1920.0, 1080.0);
        assert_eq!(available_area(window, true), (Vec2::ZERO, window));

        let (min, size) = available_area(window, false);
        assert_eq!(min, Vec2::new(PAGE_PADDING, TOOLBAR_HEIGHT + PAGE_PADDING));
        assert_eq!(size.x, 1920.0 - SIDE_PANEL_WIDTH - 2.0 * PAGE_PADDING);
    }

    #[test]
    fn test_rgba_to_image_keeps_dimensions() {
        let image = rgba_to_image(&RgbaImage::new(30, 10));
        assert_eq!(image.width(), 30);
        assert_eq!(image.height(), 10);
    }
}
