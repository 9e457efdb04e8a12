//! Unit tests for the mask store and crop margins.

use std::sync::Arc;

use image::{Rgba, RgbaImage};

use super::*;
use crate::editor::coords::PercentRect;

fn snapshot() -> Arc<EdgeSnapshot> {
    Arc::new(EdgeSnapshot {
        direction: EdgeDirection::Top,
        strip: RgbaImage::from_pixel(4, 1, Rgba([10, 20, 30, 255])),
    })
}

fn mask_on(store: &mut MaskStore, page: Option<usize>) -> MaskId {
    let id = store.allocate_id();
    store.add(Mask::solid(
        id,
        PercentRect::new(10.0, 10.0, 20.0, 20.0),
        "#112233",
        page,
    ));
    id
}

fn clone_mask(store: &mut MaskStore) -> MaskId {
    let id = mask_on(store, Some(0));
    let mut mask = store.get(id).cloned().unwrap();
    mask.fill_type = FillType::CloneTop;
    store.update(mask);
    store.set_snapshot(id, Some(snapshot()));
    id
}

#[test]
fn test_allocate_id_is_monotonic() {
    let mut store = MaskStore::default();
    let a = store.allocate_id();
    let b = store.allocate_id();
    assert!(b > a);
}

#[test]
fn test_add_keeps_allocator_ahead() {
    let mut store = MaskStore::default();
    store.add(Mask::solid(MaskId(41), PercentRect::default(), "#000000", None));
    assert_eq!(store.allocate_id(), MaskId(42));
}

#[test]
fn test_update_geometry_clears_snapshot() {
    let mut store = MaskStore::default();
    let id = clone_mask(&mut store);
    assert!(store.get(id).unwrap().image_snapshot.is_some());

    let mut moved = store.get(id).cloned().unwrap();
    moved.x += 1.0;
    assert!(store.update(moved));
    assert!(store.get(id).unwrap().image_snapshot.is_none());
}

#[test]
fn test_update_fill_type_clears_snapshot() {
    let mut store = MaskStore::default();
    let id = clone_mask(&mut store);

    let mut changed = store.get(id).cloned().unwrap();
    changed.fill_type = FillType::CloneLeft;
    store.update(changed);
    assert!(store.get(id).unwrap().image_snapshot.is_none());
}

#[test]
fn test_update_scope_clears_snapshot() {
    let mut store = MaskStore::default();
    let id = clone_mask(&mut store);

    let mut changed = store.get(id).cloned().unwrap();
    changed.page_index = None;
    store.update(changed);
    assert!(store.get(id).unwrap().image_snapshot.is_none());
}

#[test]
fn test_update_color_keeps_snapshot() {
    let mut store = MaskStore::default();
    let id = clone_mask(&mut store);

    let mut changed = store.get(id).cloned().unwrap();
    changed.color = "#FF0000".to_string();
    store.update(changed);
    let stored = store.get(id).unwrap();
    assert_eq!(stored.color, "#FF0000");
    assert!(stored.image_snapshot.is_some());
}

#[test]
fn test_update_unknown_id_returns_false() {
    let mut store = MaskStore::default();
    mask_on(&mut store, None);
    let stray = Mask::solid(MaskId(99), PercentRect::default(), "#000000", None);
    assert!(!store.update(stray));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_remove() {
    let mut store = MaskStore::default();
    let a = mask_on(&mut store, None);
    let b = mask_on(&mut store, Some(1));
    assert!(store.remove(a));
    assert!(!store.remove(a));
    assert_eq!(store.len(), 1);
    assert!(store.get(b).is_some());
}

#[test]
fn test_list_for_page_filters_and_keeps_order() {
    let mut store = MaskStore::default();
    let global_a = mask_on(&mut store, None);
    let page_one = mask_on(&mut store, Some(1));
    let page_two = mask_on(&mut store, Some(2));
    let global_b = mask_on(&mut store, None);

    let ids: Vec<MaskId> = store.list_for_page(1).iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![global_a, page_one, global_b]);

    let ids: Vec<MaskId> = store.list_for_page(2).iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![global_a, page_two, global_b]);

    let ids: Vec<MaskId> = store.list_for_page(7).iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![global_a, global_b]);
}

#[test]
fn test_scope_toggle_to_global_shows_on_other_pages() {
    // Three-page document, mask drawn on the first page then made global
    let mut store = MaskStore::default();
    let id = mask_on(&mut store, Some(0));
    assert!(store.list_for_page(1).is_empty());

    let mut global = store.get(id).cloned().unwrap();
    global.page_index = None;
    store.update(global);

    assert!(store.list_for_page(1).iter().any(|m| m.id == id));
    assert!(store.list_for_page(2).iter().any(|m| m.id == id));
}

#[test]
fn test_clear_keeps_counting() {
    let mut store = MaskStore::default();
    let first = mask_on(&mut store, None);
    store.clear();
    assert!(store.is_empty());
    assert!(store.allocate_id() > first);
}

#[test]
fn test_fill_type_serializes_kebab_case() {
    assert_eq!(
        serde_json::to_string(&FillType::CloneBottom).unwrap(),
        "\"clone-bottom\""
    );
    let parsed: FillType = serde_json::from_str("\"solid\"").unwrap();
    assert_eq!(parsed, FillType::Solid);
}

#[test]
fn test_needs_snapshot_only_for_clone_fills() {
    let mut mask = Mask::default();
    assert!(!mask.needs_snapshot());
    mask.fill_type = FillType::CloneRight;
    assert!(mask.needs_snapshot());
    mask.image_snapshot = Some(snapshot());
    assert!(!mask.needs_snapshot());
}

#[test]
fn test_page_change_drops_only_global_snapshots() {
    let mut store = MaskStore::default();
    let scoped = clone_mask(&mut store);
    let global = mask_on(&mut store, None);
    let mut mask = store.get(global).cloned().unwrap();
    mask.fill_type = FillType::CloneLeft;
    store.update(mask);
    store.set_snapshot(global, Some(snapshot()));

    assert_eq!(store.invalidate_global_snapshots(), 1);
    assert!(store.get(global).unwrap().needs_snapshot());
    assert!(store.get(scoped).unwrap().image_snapshot.is_some());
    assert_eq!(store.invalidate_global_snapshots(), 0);
}

#[test]
fn test_kept_area_from_margins() {
    let margins = CropMargins::clamped(10.0, 20.0, 5.0, 15.0);
    assert_eq!(margins.kept_area(), PercentRect::new(5.0, 10.0, 80.0, 70.0));
}

#[test]
fn test_kept_area_without_margins_is_full_page() {
    let kept = CropMargins::default().kept_area();
    assert_eq!(kept, PercentRect::new(0.0, 0.0, 100.0, 100.0));
}

#[test]
fn test_margin_pair_clamp() {
    let mut margins = CropMargins::default();
    margins.set_edge(MarginEdge::Bottom, 40.0);
    let stored = margins.set_edge(MarginEdge::Top, 60.0);
    assert_eq!(stored, 50.0);
    assert_eq!(margins.top, 50.0);
    assert_eq!(margins.bottom, 40.0);
}

#[test]
fn test_margin_clamp_checks_only_edited_pair() {
    let mut margins = CropMargins::default();
    margins.set_edge(MarginEdge::Left, 45.0);
    margins.set_edge(MarginEdge::Right, 45.0);
    margins.set_edge(MarginEdge::Top, 80.0);
    assert_eq!(margins.top, 80.0);
    assert_eq!(margins.left, 45.0);
}

#[test]
fn test_margin_clamps_range() {
    let mut margins = CropMargins::default();
    assert_eq!(margins.set_edge(MarginEdge::Left, -5.0), 0.0);
    assert_eq!(margins.set_edge(MarginEdge::Left, 150.0), 90.0);
    assert_eq!(margins.set_edge(MarginEdge::Right, f32::NAN), 0.0);
}

#[test]
fn test_clamped_constructor_applies_in_order() {
    let margins = CropMargins::clamped(70.0, 70.0, 5.0, 5.0);
    assert_eq!(margins.top, 70.0);
    assert_eq!(margins.bottom, 20.0);
    assert_eq!(margins.left, 5.0);
    assert!(!margins.is_zero());
    assert!(CropMargins::default().is_zero());
}
