//! Backfills edge snapshots for clone-filled masks after a render.

use image::RgbaImage;
use std::sync::Arc;

use bevy::prelude::*;

use crate::editor::sampler::capture_edge_snapshot;
use crate::masks::{MaskId, MaskStore};

/// Captures strips for every clone mask on `page` that lacks one. Returns the number of
/// snapshots written. Masks that already have a snapshot are left alone, so running this
/// repeatedly against the same raster writes nothing after the first pass.
pub fn reconcile_snapshots(store: &mut MaskStore, page: usize, raster: &RgbaImage) -> usize {
    let pending: Vec<MaskId> = store
        .list_for_page(page)
        .into_iter()
        .filter(|m| m.needs_snapshot())
        .map(|m| m.id)
        .collect();

    let mut written = 0;
    for id in pending {
        let Some(snapshot) = store
            .get(id)
            .and_then(|mask| capture_edge_snapshot(raster, mask))
        else {
            continue;
        };
        if store.set_snapshot(id, Some(Arc::new(snapshot))) {
            written += 1;
        }
    }

    if written > 0 {
        debug!("Captured {} edge snapshots on page {}", written, page + 1);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::coords::PercentRect;
    use crate::masks::{FillType, Mask};
    use image::Rgba;

    fn raster() -> RgbaImage {
        RgbaImage::from_pixel(50, 50, Rgba([200, 100, 50, 255]))
    }

    fn add(store: &mut MaskStore, fill_type: FillType, page: Option<usize>) -> MaskId {
        let id = store.allocate_id();
        let mut mask = Mask::solid(id, PercentRect::new(20.0, 20.0, 20.0, 20.0), "#000000", page);
        mask.fill_type = fill_type;
        store.add(mask);
        id
    }

    #[test]
    fn test_backfills_clone_masks_on_page() {
        let mut store = MaskStore::default();
        let solid = add(&mut store, FillType::Solid, Some(0));
        let here = add(&mut store, FillType::CloneTop, Some(0));
        let global = add(&mut store, FillType::CloneLeft, None);
        let elsewhere = add(&mut store, FillType::CloneRight, Some(1));

        assert_eq!(reconcile_snapshots(&mut store, 0, &raster()), 2);
        assert!(store.get(solid).unwrap().image_snapshot.is_none());
        assert!(store.get(here).unwrap().image_snapshot.is_some());
        assert!(store.get(global).unwrap().image_snapshot.is_some());
        assert!(store.get(elsewhere).unwrap().image_snapshot.is_none());
    }

    #[test]
    fn test_second_pass_writes_nothing() {
        let mut store = MaskStore::default();
        add(&mut store, FillType::CloneBottom, Some(0));
        assert_eq!(reconcile_snapshots(&mut store, 0, &raster()), 1);
        assert_eq!(reconcile_snapshots(&mut store, 0, &raster()), 0);
    }

    #[test]
    fn test_global_clone_recaptured_on_new_page() {
        let mut store = MaskStore::default();
        let id = add(&mut store, FillType::CloneTop, None);
        let red = RgbaImage::from_pixel(50, 50, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 255, 255]));

        assert_eq!(reconcile_snapshots(&mut store, 0, &red), 1);
        store.invalidate_global_snapshots();
        assert_eq!(reconcile_snapshots(&mut store, 1, &blue), 1);

        let snapshot = store.get(id).unwrap().image_snapshot.clone().unwrap();
        assert_eq!(*snapshot.strip.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_failed_capture_is_left_pending() {
        let mut store = MaskStore::default();
        let id = store.allocate_id();
        let mut mask = Mask::solid(id, PercentRect::new(150.0, 10.0, 5.0, 5.0), "#000000", None);
        mask.fill_type = FillType::CloneTop;
        store.add(mask);

        assert_eq!(reconcile_snapshots(&mut store, 0, &raster()), 0);
        assert!(store.get(id).unwrap().needs_snapshot());
    }
}
