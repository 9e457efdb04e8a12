use std::sync::Arc;

use bevy::prelude::*;

use super::{EdgeSnapshot, Mask, MaskId};

/// Ordered collection of every mask in the session.
///
/// Insertion order doubles as paint order: later masks are drawn above earlier ones.
#[derive(Resource, Debug, Default)]
pub struct MaskStore {
    masks: Vec<Mask>,
    next_id: u64,
}

impl MaskStore {
    pub fn allocate_id(&mut self) -> MaskId {
        let id = MaskId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add(&mut self, mask: Mask) {
        // Keep the allocator ahead of ids that were assigned elsewhere
        self.next_id = self.next_id.max(mask.id.0 + 1);
        debug!("Added mask {:?} (page {:?})", mask.id, mask.page_index);
        self.masks.push(mask);
    }

    /// Replaces the mask with the same id. Returns false if no such mask exists.
    ///
    /// The stored snapshot is dropped when geometry, fill type or scope changed.
    pub fn update(&mut self, mut mask: Mask) -> bool {
        let Some(slot) = self.masks.iter_mut().find(|m| m.id == mask.id) else {
            debug!("Ignoring update for unknown mask {:?}", mask.id);
            return false;
        };

        if slot.snapshot_inputs_differ(&mask) {
            mask.image_snapshot = None;
        }
        *slot = mask;
        true
    }

    /// Stores a captured strip without touching anything else.
    pub fn set_snapshot(&mut self, id: MaskId, snapshot: Option<Arc<EdgeSnapshot>>) -> bool {
        match self.masks.iter_mut().find(|m| m.id == id) {
            Some(mask) => {
                mask.image_snapshot = snapshot;
                true
            }
            None => false,
        }
    }

    /// Drops the strips of global clone masks so they are recaptured from the page now
    /// on screen. Page-scoped masks only ever show on the page they were captured from.
    /// Returns the number of snapshots dropped.
    pub fn invalidate_global_snapshots(&mut self) -> usize {
        let mut dropped = 0;
        for mask in self
            .masks
            .iter_mut()
            .filter(|m| m.is_global() && m.image_snapshot.is_some())
        {
            mask.image_snapshot = None;
            dropped += 1;
        }
        dropped
    }

    pub fn remove(&mut self, id: MaskId) -> bool {
        let before = self.masks.len();
        self.masks.retain(|m| m.id != id);
        let removed = self.masks.len() != before;
        if removed {
            debug!("Removed mask {:?}", id);
        }
        removed
    }

    pub fn get(&self, id: MaskId) -> Option<&Mask> {
        self.masks.iter().find(|m| m.id == id)
    }

    /// Global masks plus masks scoped to `page`, in insertion order.
    pub fn list_for_page(&self, page: usize) -> Vec<&Mask> {
        self.masks.iter().filter(|m| m.applies_to_page(page)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mask> {
        self.masks.iter()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Drops every mask. Ids keep counting up.
    pub fn clear(&mut self) {
        debug!("Cleared {} masks", self.masks.len());
        self.masks.clear();
    }
}
