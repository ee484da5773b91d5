// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Display scaling of the logical card.
//!
//! The card keeps its logical size; only the scale used to show it changes
//! with the space available in the canvas panel.

use crate::config::CanvasSize;

/// Display scale and on-screen size, captured so they can be put back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

/// Maps the logical card to the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    canvas: CanvasSize,
    min_scale: f64,
    padding: f64,
    scale: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(canvas: CanvasSize, min_scale: f64, padding: f64) -> Self {
        Self {
            canvas,
            min_scale,
            padding,
            scale: 1.0,
            width: canvas.width,
            height: canvas.height,
        }
    }

    /// Uniform scale fitting the card into a container, never above 1 and
    /// never below the configured minimum.
    pub fn fit_scale(&self, container_width: f64, container_height: f64) -> f64 {
        let available_width = (container_width - self.padding).max(1.0);
        let available_height = (container_height - self.padding).max(1.0);
        let scale = (available_width / self.canvas.width)
            .min(available_height / self.canvas.height)
            .min(1.0);
        scale.max(self.min_scale)
    }

    /// Refit to a container. Idempotent; returns true when the scale changed.
    pub fn fit(&mut self, container_width: f64, container_height: f64) -> bool {
        let scale = self.fit_scale(container_width, container_height);
        let changed = scale != self.scale;
        self.apply_scale(scale);
        changed
    }

    fn apply_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.width = self.canvas.width * scale;
        self.height = self.canvas.height * scale;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// On-screen size of the card.
    pub fn display_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            scale: self.scale,
            width: self.width,
            height: self.height,
        }
    }

    pub fn restore(&mut self, snapshot: ViewportSnapshot) {
        self.scale = snapshot.scale;
        self.width = snapshot.width;
        self.height = snapshot.height;
    }

    /// Show the card at its logical size (scale 1).
    pub fn set_logical(&mut self) {
        self.apply_scale(1.0);
    }
}

/// Holds the viewport at logical size and restores the previous display
/// state when dropped, whatever happens while it is alive.
pub struct LogicalViewGuard<'a> {
    viewport: &'a mut Viewport,
    saved: ViewportSnapshot,
}

impl<'a> LogicalViewGuard<'a> {
    pub fn enter(viewport: &'a mut Viewport) -> Self {
        let saved = viewport.snapshot();
        viewport.set_logical();
        Self { viewport, saved }
    }

    pub fn viewport(&self) -> &Viewport {
        self.viewport
    }
}

impl Drop for LogicalViewGuard<'_> {
    fn drop(&mut self) {
        self.viewport.restore(self.saved);
    }
}
