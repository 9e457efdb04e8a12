//! Render bookkeeping: which render is current and what raster is on screen.

use std::sync::Arc;

use bevy::prelude::*;
use image::RgbaImage;

/// What a render depends on; a change in any field calls for a new render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderKey {
    pub document_generation: u64,
    pub page: usize,
    pub fullscreen: bool,
}

/// A render request handed to a background task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    pub id: u64,
    pub key: RenderKey,
    pub target_width: u32,
}

/// Tracks render requests and accepts only the most recent result.
#[derive(Resource, Debug, Default)]
pub struct RenderCoordinator {
    next_ticket: u64,
    latest: Option<RenderTicket>,
    in_flight: bool,
    generation: u64,
}

impl RenderCoordinator {
    /// Whether `key` differs from what was last requested.
    pub fn needs_render(&self, key: RenderKey) -> bool {
        self.latest.is_none_or(|ticket| ticket.key != key)
    }

    /// Issues a ticket for `key`, superseding any render still running.
    pub fn request(&mut self, key: RenderKey, target_width: u32) -> RenderTicket {
        self.next_ticket += 1;
        let ticket = RenderTicket {
            id: self.next_ticket,
            key,
            target_width,
        };
        self.latest = Some(ticket);
        self.in_flight = true;
        ticket
    }

    /// Accepts a finished render. Returns the new render generation, or `None` if the
    /// ticket was superseded.
    pub fn complete(&mut self, ticket_id: u64) -> Option<u64> {
        if !self.is_latest(ticket_id) {
            return None;
        }
        self.in_flight = false;
        self.generation += 1;
        Some(self.generation)
    }

    /// Records a failed render. Returns false if the ticket was superseded.
    pub fn fail(&mut self, ticket_id: u64) -> bool {
        if !self.is_latest(ticket_id) {
            return false;
        }
        self.in_flight = false;
        true
    }

    pub fn is_rendering(&self) -> bool {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forgets the last request so the next key always renders.
    pub fn invalidate(&mut self) {
        self.latest = None;
        self.in_flight = false;
    }

    fn is_latest(&self, ticket_id: u64) -> bool {
        self.latest.is_some_and(|t| t.id == ticket_id)
    }
}

/// A rendered page and the render it came from
#[derive(Debug, Clone)]
pub struct PageRaster {
    pub image: Arc<RgbaImage>,
    pub page: usize,
    pub document_generation: u64,
    pub generation: u64,
}

impl PageRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.image.height() == 0 {
            return 1.0;
        }
        self.image.width() as f32 / self.image.height() as f32
    }
}

/// The raster currently shown on the page surface
#[derive(Resource, Debug, Default)]
pub struct CurrentRaster(pub Option<PageRaster>);

impl CurrentRaster {
    /// The raster if it shows `page` of the given document.
    pub fn for_page(&self, document_generation: u64, page: usize) -> Option<&PageRaster> {
        self.0
            .as_ref()
            .filter(|r| r.page == page && r.document_generation == document_generation)
    }
}
