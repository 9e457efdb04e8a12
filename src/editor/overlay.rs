//! Sprites presenting masks on top of the page surface.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

use crate::document::{EditorSession, PageSurface, rgba_to_image};
use crate::editor::coords::percent_rect_to_canvas_pixels;
use crate::editor::tools::EditorMode;
use crate::export::parse_hex_color;
use crate::masks::{EdgeSnapshot, FillType, Mask, MaskId, MaskStore};

/// Sprite mirroring one mask on the current page
#[derive(Component)]
pub struct MaskSprite(pub MaskId);

/// Color shown for clone masks still waiting for their snapshot
const PENDING_SNAPSHOT_COLOR: Color = Color::srgba(0.6, 0.6, 0.6, 0.85);

/// Uploaded snapshot textures, keyed by mask and invalidated when the snapshot changes
#[derive(Default)]
pub struct SnapshotTextures {
    textures: HashMap<MaskId, (Arc<EdgeSnapshot>, Handle<Image>)>,
}

impl SnapshotTextures {
    fn handle_for(
        &mut self,
        id: MaskId,
        snapshot: &Arc<EdgeSnapshot>,
        images: &mut Assets<Image>,
    ) -> Handle<Image> {
        if let Some((cached, handle)) = self.textures.get(&id)
            && Arc::ptr_eq(cached, snapshot)
        {
            return handle.clone();
        }
        let handle = images.add(rgba_to_image(&snapshot.strip));
        self.textures.insert(id, (snapshot.clone(), handle.clone()));
        handle
    }

    fn retain(&mut self, keep: impl Fn(MaskId) -> bool) {
        self.textures.retain(|id, _| keep(*id));
    }
}

/// How a mask is painted: flat color or a stretched snapshot strip.
enum MaskPaint {
    Solid(Color),
    Texture(Arc<EdgeSnapshot>),
}

fn paint_for(mask: &Mask) -> MaskPaint {
    match (mask.fill_type, &mask.image_snapshot) {
        (FillType::Solid, _) => {
            let [r, g, b] = parse_hex_color(&mask.color);
            MaskPaint::Solid(Color::srgb_u8(r, g, b))
        }
        (_, Some(snapshot)) => MaskPaint::Texture(snapshot.clone()),
        (_, None) => MaskPaint::Solid(PENDING_SNAPSHOT_COLOR),
    }
}

/// Keep one sprite per visible mask, positioned over the page sprite
#[allow(clippy::type_complexity)]
pub fn sync_mask_sprites(
    mut commands: Commands,
    session: Res<EditorSession>,
    store: Res<MaskStore>,
    mut images: ResMut<Assets<Image>>,
    surface: Query<(&Sprite, &Transform, &Visibility), (With<PageSurface>, Without<MaskSprite>)>,
    mut sprites: Query<(Entity, &MaskSprite, &mut Sprite, &mut Transform), Without<PageSurface>>,
    mut textures: Local<SnapshotTextures>,
) {
    let page_shown = surface
        .single()
        .ok()
        .filter(|(_, _, visibility)| **visibility != Visibility::Hidden)
        .and_then(|(sprite, transform, _)| sprite.custom_size.map(|size| (size, *transform)));

    let visible: Vec<&Mask> = match page_shown {
        Some(_) if session.mode == EditorMode::Mask && session.document.is_some() => {
            store.list_for_page(session.current_page)
        }
        _ => Vec::new(),
    };

    let mut existing: HashMap<MaskId, Entity> = HashMap::new();
    for (entity, marker, _, _) in sprites.iter() {
        if visible.iter().any(|m| m.id == marker.0) {
            existing.insert(marker.0, entity);
        } else {
            commands.entity(entity).despawn();
        }
    }
    textures.retain(|id| store.get(id).is_some());

    let Some((page_size, page_transform)) = page_shown else {
        return;
    };
    let page_top_left =
        page_transform.translation.truncate() + Vec2::new(-page_size.x, page_size.y) / 2.0;

    for (index, mask) in visible.iter().enumerate() {
        let rect = percent_rect_to_canvas_pixels(&mask.rect(), page_size.x, page_size.y);
        let size = Vec2::new(rect.w, rect.h);
        let center = page_top_left + Vec2::new(rect.x + rect.w / 2.0, -(rect.y + rect.h / 2.0));
        let z = page_transform.translation.z + 1.0 + index as f32 * 0.001;

        let mut sprite = Sprite {
            custom_size: Some(size),
            ..default()
        };
        match paint_for(mask) {
            MaskPaint::Solid(color) => sprite.color = color,
            MaskPaint::Texture(snapshot) => {
                sprite.image = textures.handle_for(mask.id, &snapshot, &mut images);
            }
        }
        let transform = Transform::from_translation(center.extend(z));

        match existing.get(&mask.id).and_then(|e| sprites.get_mut(*e).ok()) {
            Some((_, _, mut current_sprite, mut current_transform)) => {
                if current_sprite.custom_size != sprite.custom_size
                    || current_sprite.color != sprite.color
                    || current_sprite.image != sprite.image
                {
                    *current_sprite = sprite;
                }
                if *current_transform != transform {
                    *current_transform = transform;
                }
            }
            None => {
                commands.spawn((sprite, transform, MaskSprite(mask.id)));
            }
        }
    }
}
