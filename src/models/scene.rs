// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene graph.
//!
//! Three layers paint in a fixed order: the background image, the main
//! layer of placed elements (first element paints first), and the overlay
//! holding the title and number text.

use super::element::{Element, ElementId, TextElement, TextRole};
use crate::config::CanvasSize;
use kurbo::Point;

/// All layers of a card.
#[derive(Debug, Clone)]
pub struct Scene {
    background: Option<Element>,
    main: Vec<Element>,
    title: TextElement,
    number: TextElement,
}

impl Scene {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            background: None,
            main: Vec::new(),
            title: TextElement::title(canvas),
            number: TextElement::number(canvas),
        }
    }

    pub fn background(&self) -> Option<&Element> {
        self.background.as_ref()
    }

    /// Install a new background, dropping the previous one.
    pub fn set_background(&mut self, element: Element) {
        if let Some(old) = self.background.replace(element) {
            log::debug!("Replaced background {}", old.asset);
        }
    }

    /// Main-layer elements in paint order (last is topmost).
    pub fn elements(&self) -> &[Element] {
        &self.main
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.main.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.main.iter_mut().find(|e| e.id == id)
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.main.iter().position(|e| e.id == id)
    }

    /// Append to the top of the main layer.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.main.push(element);
        id
    }

    /// Remove an element, returning it if it was present.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        self.index_of(id).map(|idx| self.main.remove(idx))
    }

    /// Remove every main-layer element; background and overlay stay.
    pub fn clear_main(&mut self) -> usize {
        let removed = self.main.len();
        self.main.clear();
        removed
    }

    /// Topmost draggable element containing `point`.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.main
            .iter()
            .rev()
            .find(|e| e.draggable && e.contains(point))
            .map(|e| e.id)
    }

    /// Paint position of an element within the main layer.
    pub fn z_index(&self, id: ElementId) -> Option<usize> {
        self.index_of(id)
    }

    pub fn move_to_top(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx + 1 < self.main.len() => {
                let element = self.main.remove(idx);
                self.main.push(element);
                true
            }
            _ => false,
        }
    }

    pub fn move_to_bottom(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx > 0 => {
                let element = self.main.remove(idx);
                self.main.insert(0, element);
                true
            }
            _ => false,
        }
    }

    /// Swap with the element painted just above.
    pub fn move_up(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx + 1 < self.main.len() => {
                self.main.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Swap with the element painted just below.
    pub fn move_down(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx > 0 => {
                self.main.swap(idx, idx - 1);
                true
            }
            _ => false,
        }
    }

    pub fn text(&self, role: TextRole) -> &TextElement {
        match role {
            TextRole::Title => &self.title,
            TextRole::Number => &self.number,
        }
    }

    pub fn set_text(&mut self, role: TextRole, content: &str) {
        let text = match role {
            TextRole::Title => &mut self.title,
            TextRole::Number => &mut self.number,
        };
        text.content = content.to_string();
    }

    /// Overlay text in paint order.
    pub fn overlay(&self) -> [&TextElement; 2] {
        [&self.title, &self.number]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::LoadedImage;
    use crate::models::catalog::AssetRef;
    use crate::models::element::ElementFactory;
    use std::sync::Arc;

    fn scene_with(count: usize) -> (Scene, Vec<ElementId>) {
        let canvas = CanvasSize::default();
        let mut factory = ElementFactory::new(canvas, 300.0);
        let mut scene = Scene::new(canvas);
        let image = Arc::new(LoadedImage::solid(100, 100, [0, 0, 255, 255]));
        let ids = (0..count)
            .map(|i| {
                scene.add_element(factory.create(
                    AssetRef::new("objects", format!("o_{i}.png")),
                    image.clone(),
                ))
            })
            .collect();
        (scene, ids)
    }

    fn order(scene: &Scene) -> Vec<ElementId> {
        scene.elements().iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_count_tracks_adds_and_removes() {
        let (mut scene, ids) = scene_with(5);
        assert_eq!(scene.elements().len(), 5);

        assert!(scene.remove_element(ids[1]).is_some());
        assert!(scene.remove_element(ids[3]).is_some());
        // Removing twice is a no-op.
        assert!(scene.remove_element(ids[1]).is_none());
        assert_eq!(scene.elements().len(), 3);

        assert_eq!(scene.clear_main(), 3);
        assert!(scene.elements().is_empty());
    }

    #[test]
    fn test_z_order_moves() {
        let (mut scene, ids) = scene_with(4);
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);

        assert!(scene.move_to_top(b));
        assert_eq!(order(&scene), vec![a, c, d, b]);

        assert!(scene.move_to_bottom(d));
        assert_eq!(order(&scene), vec![d, a, c, b]);

        assert!(scene.move_up(a));
        assert_eq!(order(&scene), vec![d, c, a, b]);

        assert!(scene.move_down(b));
        assert_eq!(order(&scene), vec![d, c, b, a]);
    }

    #[test]
    fn test_z_order_boundaries_are_noops() {
        let (mut scene, ids) = scene_with(3);
        assert!(!scene.move_to_top(ids[2]));
        assert!(!scene.move_up(ids[2]));
        assert!(!scene.move_to_bottom(ids[0]));
        assert!(!scene.move_down(ids[0]));
        assert_eq!(order(&scene), ids);
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let (scene, ids) = scene_with(2);
        // Both share the default placement; the later one paints on top.
        assert_eq!(scene.element_at(Point::new(200.0, 400.0)), Some(ids[1]));
        assert_eq!(scene.element_at(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_background_replacement_and_overlay_survive_clear() {
        let canvas = CanvasSize::default();
        let mut factory = ElementFactory::new(canvas, 300.0);
        let (mut scene, _) = scene_with(2);
        let image = Arc::new(LoadedImage::solid(10, 10, [0, 0, 0, 255]));

        scene.set_background(factory.background(AssetRef::new("background", "a.png"), image.clone()));
        scene.set_background(factory.background(AssetRef::new("background", "b.png"), image));
        scene.set_text(TextRole::Title, "The Fool");

        scene.clear_main();
        assert_eq!(scene.background().map(|b| b.asset.file.as_str()), Some("b.png"));
        assert_eq!(scene.text(TextRole::Title).content, "The Fool");
    }

    #[test]
    fn test_background_is_not_hit() {
        let canvas = CanvasSize::default();
        let mut factory = ElementFactory::new(canvas, 300.0);
        let mut scene = Scene::new(canvas);
        let image = Arc::new(LoadedImage::solid(10, 10, [0, 0, 0, 255]));
        scene.set_background(factory.background(AssetRef::new("background", "a.png"), image));
        assert_eq!(scene.element_at(Point::new(300.0, 500.0)), None);
    }
}
