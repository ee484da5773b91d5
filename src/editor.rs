// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Card editing state and operations.
//!
//! The [`Editor`] owns the scene, the selection, the viewport and the
//! in-progress pointer gesture. The UI only ever changes the card through
//! its methods. At most one element is selected; the manipulation handles
//! are always bound to that element.

use crate::config::ComposerConfig;
use crate::error::ExportError;
use crate::io::export::{encode_png, export_file_name, ExportedImage, SceneRasterizer};
use crate::io::media::{LoadPurpose, LoadedAsset, LoadedImage};
use crate::models::catalog::AssetRef;
use crate::models::element::{Element, ElementFactory, ElementId, TextRole};
use crate::models::scene::Scene;
use crate::util::geometry::{
    constrain_box, handle_at, resize_box, rotate_box, Anchor, BoundBox,
};
use crate::util::viewport::{LogicalViewGuard, Viewport};
use kurbo::Point;
use std::sync::Arc;

/// Toolbar operations on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    DeleteSelected,
    ClearAll,
    FlipHorizontal,
    FlipVertical,
    BringToFront,
    SendToBack,
    MoveUp,
    MoveDown,
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Move { id: ElementId, last: Point },
    Resize { id: ElementId, anchor: Anchor },
    Rotate { id: ElementId },
}

/// Main editing controller.
pub struct Editor {
    config: ComposerConfig,
    scene: Scene,
    factory: ElementFactory,
    viewport: Viewport,
    rasterizer: SceneRasterizer,
    selected: Option<ElementId>,
    gesture: Option<Gesture>,
}

impl Editor {
    pub fn new(config: ComposerConfig, rasterizer: SceneRasterizer) -> Self {
        let canvas = config.canvas;
        Self {
            scene: Scene::new(canvas),
            factory: ElementFactory::new(canvas, config.max_initial_size),
            viewport: Viewport::new(canvas, config.min_display_scale, config.container_padding),
            rasterizer,
            selected: None,
            gesture: None,
            config,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Whether exported cards will include the title and number text.
    pub fn exports_text(&self) -> bool {
        self.rasterizer.has_font()
    }

    /// Refit the display scale to the canvas panel size.
    pub fn fit_viewport(&mut self, container_width: f64, container_height: f64) -> bool {
        self.viewport.fit(container_width, container_height)
    }

    // ---- selection ----

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.scene.element(id))
    }

    /// Replace the selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<ElementId>) {
        let id = id.filter(|id| self.scene.element(*id).is_some());
        if self.selected != id {
            match id {
                Some(id) => log::debug!("Selected element {}", id),
                None => log::debug!("Cleared selection"),
            }
        }
        self.selected = id;
        if self.gesture.is_some_and(|g| Some(g.target()) != id) {
            self.gesture = None;
        }
    }

    /// Box the manipulation handles are drawn around.
    pub fn handle_box(&self) -> Option<BoundBox> {
        self.selected_element().map(Element::bound_box)
    }

    // ---- scene mutation ----

    /// Replace the card background.
    pub fn set_background(&mut self, asset: AssetRef, image: Arc<LoadedImage>) {
        log::info!("Background set to {}", asset);
        let element = self.factory.background(asset, image);
        self.scene.set_background(element);
    }

    /// Place a new element on top of the main layer and select it.
    pub fn add_element(&mut self, asset: AssetRef, image: Arc<LoadedImage>) -> ElementId {
        let element = self.factory.create(asset, image);
        log::info!("Added {} as element {}", element.asset, element.id);
        let id = self.scene.add_element(element);
        self.select(Some(id));
        log::info!("Main layer now holds {} elements", self.scene.elements().len());
        id
    }

    /// Apply a finished image load. Failures are logged and change nothing.
    /// Returns true when the scene changed.
    pub fn on_asset_loaded(&mut self, loaded: LoadedAsset) -> bool {
        let image = match loaded.result {
            Ok(image) => image,
            Err(e) => {
                log::error!("Failed to load {}: {}", loaded.asset, e);
                return false;
            }
        };
        match loaded.purpose {
            LoadPurpose::Background => {
                self.set_background(loaded.asset, image);
                true
            }
            LoadPurpose::Element => {
                self.add_element(loaded.asset, image);
                true
            }
            LoadPurpose::Thumbnail => false,
        }
    }

    /// Remove an element, clearing the selection if it pointed at it.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let removed = self.scene.remove_element(id).is_some();
        if removed {
            if self.selected == Some(id) {
                self.select(None);
            }
            log::info!("Deleted element {}, total: {}", id, self.scene.elements().len());
        }
        removed
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.remove_element(id),
            None => false,
        }
    }

    /// Remove every placed element; background and text stay.
    pub fn clear_all(&mut self) -> usize {
        self.select(None);
        let removed = self.scene.clear_main();
        log::info!("Cleared {} elements", removed);
        removed
    }

    fn with_selected(&mut self, f: impl FnOnce(&mut Element)) -> bool {
        match self.selected.and_then(|id| self.scene.element_mut(id)) {
            Some(element) => {
                f(element);
                true
            }
            None => false,
        }
    }

    pub fn flip_horizontal(&mut self) -> bool {
        self.with_selected(Element::flip_horizontal)
    }

    pub fn flip_vertical(&mut self) -> bool {
        self.with_selected(Element::flip_vertical)
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.selected.is_some_and(|id| self.scene.move_to_top(id))
    }

    pub fn send_to_back(&mut self) -> bool {
        self.selected.is_some_and(|id| self.scene.move_to_bottom(id))
    }

    pub fn move_up(&mut self) -> bool {
        self.selected.is_some_and(|id| self.scene.move_up(id))
    }

    pub fn move_down(&mut self) -> bool {
        self.selected.is_some_and(|id| self.scene.move_down(id))
    }

    /// Run a toolbar command. Returns true when the card changed.
    pub fn apply(&mut self, command: EditCommand) -> bool {
        log::debug!("Command {:?}", command);
        match command {
            EditCommand::DeleteSelected => self.delete_selected(),
            EditCommand::ClearAll => self.clear_all() > 0,
            EditCommand::FlipHorizontal => self.flip_horizontal(),
            EditCommand::FlipVertical => self.flip_vertical(),
            EditCommand::BringToFront => self.bring_to_front(),
            EditCommand::SendToBack => self.send_to_back(),
            EditCommand::MoveUp => self.move_up(),
            EditCommand::MoveDown => self.move_down(),
        }
    }

    // ---- text ----

    pub fn set_title(&mut self, title: &str) {
        self.scene.set_text(TextRole::Title, title);
    }

    /// Card numbers are shown upper-case (roman numerals).
    pub fn set_number(&mut self, number: &str) {
        self.scene.set_text(TextRole::Number, &number.to_uppercase());
    }

    // ---- direct manipulation ----

    /// Handle under `point` on the current selection.
    pub fn handle_at(&self, point: Point) -> Option<Anchor> {
        let bound = self.handle_box()?;
        handle_at(&bound, point, self.viewport.scale())
    }

    /// Element a press at `point` would grab.
    pub fn hover_target(&self, point: Point) -> Option<ElementId> {
        self.scene.element_at(point)
    }

    /// Pointer went down at a logical canvas point.
    pub fn pointer_pressed(&mut self, point: Point) {
        if let (Some(id), Some(anchor)) = (self.selected, self.handle_at(point)) {
            self.gesture = Some(match anchor {
                Anchor::Rotate => Gesture::Rotate { id },
                anchor => Gesture::Resize { id, anchor },
            });
            log::debug!("Started {:?} on element {}", anchor, id);
            return;
        }

        match self.scene.element_at(point) {
            Some(id) => {
                self.select(Some(id));
                self.gesture = Some(Gesture::Move { id, last: point });
            }
            None => {
                self.select(None);
                self.gesture = None;
            }
        }
    }

    /// Pointer moved while held. Returns true when the card changed.
    pub fn pointer_dragged(&mut self, point: Point) -> bool {
        let Some(gesture) = self.gesture else {
            return false;
        };
        match gesture {
            Gesture::Move { id, last } => {
                self.gesture = Some(Gesture::Move { id, last: point });
                let delta = point - last;
                match self.scene.element_mut(id) {
                    Some(element) => {
                        element.placement.x += delta.x;
                        element.placement.y += delta.y;
                        true
                    }
                    None => false,
                }
            }
            Gesture::Resize { id, anchor } => {
                self.reshape(id, |old| resize_box(old, anchor, point))
            }
            Gesture::Rotate { id } => self.reshape(id, |old| rotate_box(old, point)),
        }
    }

    pub fn pointer_released(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            log::debug!("Finished gesture on element {}", gesture.target());
        }
    }

    /// Resize the selection to `width` x `height`, keeping its corner.
    pub fn resize_selected(&mut self, width: f64, height: f64) -> bool {
        match self.selected {
            Some(id) => self.reshape(id, |old| BoundBox {
                width,
                height,
                ..*old
            }),
            None => false,
        }
    }

    /// Apply a box change unless it breaks the minimum size, in which case
    /// the step is dropped and the element keeps its box.
    fn reshape(&mut self, id: ElementId, change: impl FnOnce(&BoundBox) -> BoundBox) -> bool {
        let min = self.config.min_box_size;
        let Some(element) = self.scene.element_mut(id) else {
            return false;
        };
        let old = element.bound_box();
        let accepted = constrain_box(&old, &change(&old), min);
        if accepted == old {
            return false;
        }
        element.set_bound_box(&accepted);
        true
    }

    // ---- export ----

    /// Rasterize the card at logical size times the export pixel ratio.
    ///
    /// The selection is cleared first so no handles are captured. The
    /// display scale and size are restored before this returns, also on
    /// error.
    pub fn export(&mut self) -> Result<ExportedImage, ExportError> {
        self.select(None);
        self.gesture = None;

        let file_name = export_file_name(
            &self.scene.text(TextRole::Title).content,
            &self.config.default_export_name,
        );
        let pixmap = {
            let guard = LogicalViewGuard::enter(&mut self.viewport);
            self.rasterizer
                .rasterize(&self.scene, guard.viewport(), self.config.export_pixel_ratio)?
        };
        let exported = encode_png(&pixmap, file_name)?;
        log::info!(
            "Exported {} ({}x{})",
            exported.file_name,
            exported.width,
            exported.height
        );
        Ok(exported)
    }
}

impl Gesture {
    fn target(&self) -> ElementId {
        match *self {
            Gesture::Move { id, .. } | Gesture::Resize { id, .. } | Gesture::Rotate { id } => id,
        }
    }
}
