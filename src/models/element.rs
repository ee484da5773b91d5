// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene element data structures.
//!
//! This module defines placed image elements, the overlay text elements
//! and the factory that gives new elements their default placement.

use crate::config::CanvasSize;
use crate::io::media::LoadedImage;
use crate::models::catalog::AssetRef;
use crate::util::geometry::{BoundBox, Placement};
use kurbo::{Point, Size};
use std::sync::Arc;

/// Identity of a placed element. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An image placed on the card.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub asset: AssetRef,
    pub image: Arc<LoadedImage>,
    pub placement: Placement,
    /// Whether pointer interaction may select and move the element.
    pub draggable: bool,
}

impl Element {
    /// Natural (unscaled) image size.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.image.width), f64::from(self.image.height))
    }

    pub fn bound_box(&self) -> BoundBox {
        self.placement.bound_box(self.size())
    }

    /// Move and scale the element so it fills `bound`.
    pub fn set_bound_box(&mut self, bound: &BoundBox) {
        self.placement = self.placement.fitted_to(self.size(), bound);
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bound_box().contains(point)
    }

    /// Mirror along the vertical axis.
    pub fn flip_horizontal(&mut self) {
        self.placement.scale_x = -self.placement.scale_x;
    }

    /// Mirror along the horizontal axis.
    pub fn flip_vertical(&mut self) {
        self.placement.scale_y = -self.placement.scale_y;
    }
}

/// Creates elements with their default placement.
#[derive(Debug, Clone)]
pub struct ElementFactory {
    next_id: u64,
    canvas: CanvasSize,
    max_initial_size: f64,
}

impl ElementFactory {
    pub fn new(canvas: CanvasSize, max_initial_size: f64) -> Self {
        Self {
            next_id: 1,
            canvas,
            max_initial_size,
        }
    }

    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// A draggable element offset from the card centre, shrunk so neither
    /// side exceeds the initial size limit.
    pub fn create(&mut self, asset: AssetRef, image: Arc<LoadedImage>) -> Element {
        let width = f64::from(image.width);
        let height = f64::from(image.height);
        let scale = (self.max_initial_size / width)
            .min(self.max_initial_size / height)
            .min(1.0);
        let offset = self.max_initial_size / 2.0;

        Element {
            id: self.allocate_id(),
            asset,
            image,
            placement: Placement {
                x: self.canvas.width / 2.0 - offset,
                y: self.canvas.height / 2.0 - offset,
                scale_x: scale,
                scale_y: scale,
                rotation: 0.0,
            },
            draggable: true,
        }
    }

    /// A non-interactive element stretched over the whole card.
    pub fn background(&mut self, asset: AssetRef, image: Arc<LoadedImage>) -> Element {
        let placement = Placement {
            scale_x: self.canvas.width / f64::from(image.width),
            scale_y: self.canvas.height / f64::from(image.height),
            ..Placement::default()
        };
        Element {
            id: self.allocate_id(),
            asset,
            image,
            placement,
            draggable: false,
        }
    }
}

/// Which overlay text an element carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Number,
}

/// Centred, non-interactive overlay text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub role: TextRole,
    pub content: String,
    /// Top of the text line.
    pub y: f64,
    /// Width of the box the text is centred in; starts at x = 0.
    pub width: f64,
    pub font_size: f64,
    pub color: [u8; 4],
}

/// Height of the title band at the foot of the card.
const TITLE_BAND_HEIGHT: f64 = 90.0;

impl TextElement {
    pub fn title(canvas: CanvasSize) -> Self {
        Self {
            role: TextRole::Title,
            content: String::new(),
            y: canvas.height - TITLE_BAND_HEIGHT + 10.0,
            width: canvas.width,
            font_size: 36.0,
            color: [0x17, 0x17, 0x11, 0xff],
        }
    }

    pub fn number(canvas: CanvasSize) -> Self {
        Self {
            role: TextRole::Number,
            content: String::new(),
            y: 55.0,
            width: canvas.width,
            font_size: 32.0,
            color: [0x11, 0x11, 0x11, 0xff],
        }
    }
}
