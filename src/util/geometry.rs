// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module maps element placements to affine transforms and oriented
//! bounding boxes, and implements the handle math used for direct
//! manipulation. All coordinates are logical canvas units with y pointing
//! down; rotations are degrees, clockwise on screen.

use kurbo::{Affine, Point, Size, Vec2};

/// Rotate a vector by `degrees`.
pub fn rotate_vec(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Position, scale and rotation of a placed element.
///
/// Local content spans `(0, 0)..(width, height)` and maps to the canvas
/// through `translate(x, y) * rotate(rotation) * scale(scale_x, scale_y)`.
/// A negative scale mirrors the element along that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

impl Placement {
    pub fn affine(&self) -> Affine {
        Affine::translate((self.x, self.y))
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Oriented box covering content of `size` under this placement.
    pub fn bound_box(&self, size: Size) -> BoundBox {
        let span = Vec2::new(self.scale_x * size.width, self.scale_y * size.height);
        let min = Vec2::new(span.x.min(0.0), span.y.min(0.0));
        let corner = Point::new(self.x, self.y) + rotate_vec(min, self.rotation);
        BoundBox {
            x: corner.x,
            y: corner.y,
            width: span.x.abs(),
            height: span.y.abs(),
            rotation: self.rotation,
        }
    }

    /// Placement that makes content of `size` fill `bound`, keeping the
    /// current mirroring.
    pub fn fitted_to(&self, size: Size, bound: &BoundBox) -> Placement {
        let flip_x = self.scale_x < 0.0;
        let flip_y = self.scale_y < 0.0;
        let scale_x = bound.width / size.width;
        let scale_y = bound.height / size.height;
        let origin = bound.to_world(Vec2::new(
            if flip_x { bound.width } else { 0.0 },
            if flip_y { bound.height } else { 0.0 },
        ));
        Placement {
            x: origin.x,
            y: origin.y,
            scale_x: if flip_x { -scale_x } else { scale_x },
            scale_y: if flip_y { -scale_y } else { scale_y },
            rotation: bound.rotation,
        }
    }
}

/// Rotated rectangle: `(x, y)` is the top-left corner before rotation,
/// which is also the rotation pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl BoundBox {
    /// Map a point in box-local coordinates to the canvas.
    pub fn to_world(&self, local: Vec2) -> Point {
        Point::new(self.x, self.y) + rotate_vec(local, self.rotation)
    }

    /// Map a canvas point into box-local coordinates.
    pub fn to_local(&self, point: Point) -> Vec2 {
        rotate_vec(point - Point::new(self.x, self.y), -self.rotation)
    }

    pub fn contains(&self, point: Point) -> bool {
        let local = self.to_local(point);
        (0.0..=self.width).contains(&local.x) && (0.0..=self.height).contains(&local.y)
    }

    pub fn center(&self) -> Point {
        self.to_world(Vec2::new(self.width / 2.0, self.height / 2.0))
    }

    /// Corners in order top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.to_world(Vec2::new(0.0, 0.0)),
            self.to_world(Vec2::new(self.width, 0.0)),
            self.to_world(Vec2::new(self.width, self.height)),
            self.to_world(Vec2::new(0.0, self.height)),
        ]
    }
}

/// Manipulation handles around the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Rotate,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::MiddleLeft,
        Anchor::MiddleRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
        Anchor::Rotate,
    ];

    /// Location as a fraction of the box size.
    fn fraction(self) -> (f64, f64) {
        match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopCenter | Anchor::Rotate => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::MiddleLeft => (0.0, 0.5),
            Anchor::MiddleRight => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomCenter => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Anchor::TopLeft | Anchor::TopRight | Anchor::BottomLeft | Anchor::BottomRight
        )
    }
}

/// Handle radius in screen pixels.
pub const HANDLE_RADIUS: f64 = 5.0;
/// Distance of the rotate handle above the box, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 40.0;

/// Canvas position of `anchor` when the canvas is displayed at `display_scale`.
pub fn handle_position(bound: &BoundBox, anchor: Anchor, display_scale: f64) -> Point {
    let (fx, fy) = anchor.fraction();
    let mut local = Vec2::new(bound.width * fx, bound.height * fy);
    if anchor == Anchor::Rotate {
        local.y -= ROTATE_HANDLE_OFFSET / display_scale;
    }
    bound.to_world(local)
}

/// The handle under `point`, if any.
pub fn handle_at(bound: &BoundBox, point: Point, display_scale: f64) -> Option<Anchor> {
    let reach = (HANDLE_RADIUS + 3.0) / display_scale;
    Anchor::ALL
        .into_iter()
        .find(|&anchor| handle_position(bound, anchor, display_scale).distance(point) <= reach)
}

/// Box produced by dragging a resize `anchor` to `pointer`.
///
/// The opposite side stays fixed. Corner anchors keep the aspect ratio by
/// projecting the pointer onto the box diagonal. Dragging past the fixed
/// side yields a negative size, which [`constrain_box`] rejects.
pub fn resize_box(old: &BoundBox, anchor: Anchor, pointer: Point) -> BoundBox {
    let p = old.to_local(pointer);
    let (mut left, mut top, mut right, mut bottom) = (0.0, 0.0, old.width, old.height);

    if anchor.is_corner() {
        let (fx, fy) = anchor.fraction();
        let dragged = Vec2::new(old.width * fx, old.height * fy);
        let fixed = Vec2::new(old.width * (1.0 - fx), old.height * (1.0 - fy));
        let diagonal = dragged - fixed;
        let factor = (p - fixed).dot(diagonal) / diagonal.hypot2();
        let moved = fixed + diagonal * factor;
        if fx == 0.0 {
            left = moved.x;
        } else {
            right = moved.x;
        }
        if fy == 0.0 {
            top = moved.y;
        } else {
            bottom = moved.y;
        }
    } else {
        match anchor {
            Anchor::MiddleLeft => left = p.x,
            Anchor::MiddleRight => right = p.x,
            Anchor::TopCenter => top = p.y,
            Anchor::BottomCenter => bottom = p.y,
            _ => return *old,
        }
    }

    let corner = old.to_world(Vec2::new(left, top));
    BoundBox {
        x: corner.x,
        y: corner.y,
        width: right - left,
        height: bottom - top,
        rotation: old.rotation,
    }
}

/// Box produced by dragging the rotate handle to `pointer`; the box spins
/// about its centre so the handle points at the pointer.
pub fn rotate_box(old: &BoundBox, pointer: Point) -> BoundBox {
    let center = old.center();
    let rotation = (pointer - center).atan2().to_degrees() + 90.0;
    let corner = center - rotate_vec(Vec2::new(old.width / 2.0, old.height / 2.0), rotation);
    BoundBox {
        x: corner.x,
        y: corner.y,
        rotation,
        ..*old
    }
}

/// Keep `old` when `new` would be narrower or shorter than `min`.
pub fn constrain_box(old: &BoundBox, new: &BoundBox, min: f64) -> BoundBox {
    if new.width < min || new.height < min {
        *old
    } else {
        *new
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn test_unrotated_bound_box() {
        let placement = Placement {
            x: 150.0,
            y: 350.0,
            scale_x: 0.5,
            scale_y: 0.5,
            ..Placement::default()
        };
        let bound = placement.bound_box(Size::new(400.0, 200.0));
        assert_eq!(
            bound,
            BoundBox {
                x: 150.0,
                y: 350.0,
                width: 200.0,
                height: 100.0,
                rotation: 0.0
            }
        );
        assert!(bound.contains(Point::new(250.0, 400.0)));
        assert!(!bound.contains(Point::new(100.0, 400.0)));
    }

    #[test]
    fn test_mirrored_box_covers_same_area_as_affine() {
        let size = Size::new(100.0, 50.0);
        let placement = Placement {
            x: 300.0,
            y: 100.0,
            scale_x: -1.0,
            scale_y: 1.0,
            rotation: 30.0,
        };
        let bound = placement.bound_box(size);
        let affine = placement.affine();
        // Every content corner lands on a box corner.
        for local in [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(0.0, 50.0),
        ] {
            let world = affine * local;
            assert!(bound
                .corners()
                .iter()
                .any(|c| c.distance(world) < 1e-6));
        }
    }

    #[test]
    fn test_fitted_to_inverts_bound_box() {
        let size = Size::new(80.0, 60.0);
        let placement = Placement {
            x: 10.0,
            y: 20.0,
            scale_x: -0.75,
            scale_y: 1.5,
            rotation: -45.0,
        };
        let back = placement.fitted_to(size, &placement.bound_box(size));
        assert_close(back.x, placement.x);
        assert_close(back.y, placement.y);
        assert_close(back.scale_x, placement.scale_x);
        assert_close(back.scale_y, placement.scale_y);
        assert_close(back.rotation, placement.rotation);
    }

    #[test]
    fn test_edge_resize_keeps_opposite_side() {
        let old = BoundBox {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
        };
        let wider = resize_box(&old, Anchor::MiddleRight, Point::new(150.0, 40.0));
        assert_close(wider.x, 0.0);
        assert_close(wider.width, 150.0);
        assert_close(wider.height, 100.0);

        let taller = resize_box(&old, Anchor::TopCenter, Point::new(10.0, -50.0));
        assert_close(taller.y, -50.0);
        assert_close(taller.height, 150.0);
        assert_close(taller.width, 100.0);
    }

    #[test]
    fn test_corner_resize_keeps_aspect_ratio() {
        let old = BoundBox {
            x: 10.0,
            y: 10.0,
            width: 200.0,
            height: 100.0,
            rotation: 0.0,
        };
        let new = resize_box(&old, Anchor::BottomRight, Point::new(410.0, 150.0));
        assert_close(new.width / new.height, 2.0);
        assert_close(new.x, 10.0);
        assert_close(new.y, 10.0);
        assert!(new.width > old.width);
    }

    #[test]
    fn test_dragging_past_fixed_side_is_rejected() {
        let old = BoundBox {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
        };
        let inverted = resize_box(&old, Anchor::MiddleRight, Point::new(-30.0, 50.0));
        assert!(inverted.width < 0.0);
        assert_eq!(constrain_box(&old, &inverted, 20.0), old);
    }

    #[test]
    fn test_constrain_box_rejects_instead_of_clamping() {
        let old = BoundBox {
            x: 5.0,
            y: 5.0,
            width: 60.0,
            height: 60.0,
            rotation: 0.0,
        };
        let small = BoundBox {
            width: 10.0,
            height: 10.0,
            ..old
        };
        let thin = BoundBox {
            width: 80.0,
            height: 19.9,
            ..old
        };
        let ok = BoundBox {
            width: 20.0,
            height: 20.0,
            ..old
        };
        assert_eq!(constrain_box(&old, &small, 20.0), old);
        assert_eq!(constrain_box(&old, &thin, 20.0), old);
        assert_eq!(constrain_box(&old, &ok, 20.0), ok);
    }

    #[test]
    fn test_rotate_box_spins_about_center() {
        let old = BoundBox {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
            rotation: 0.0,
        };
        let center = old.center();
        // Pointer straight to the right of the centre: quarter turn clockwise.
        let rotated = rotate_box(&old, Point::new(center.x + 80.0, center.y));
        assert_close(rotated.rotation, 90.0);
        assert!(rotated.center().distance(center) < 1e-6);
        assert_close(rotated.width, 100.0);
    }

    #[test]
    fn test_handles_hit_in_screen_pixels() {
        let bound = BoundBox {
            x: 100.0,
            y: 100.0,
            width: 200.0,
            height: 100.0,
            rotation: 0.0,
        };
        assert_eq!(
            handle_at(&bound, Point::new(300.0, 200.0), 1.0),
            Some(Anchor::BottomRight)
        );
        // Rotate handle sits 40 screen pixels above the top edge.
        assert_eq!(
            handle_at(&bound, Point::new(200.0, 20.0), 0.5),
            Some(Anchor::Rotate)
        );
        assert_eq!(handle_at(&bound, Point::new(200.0, 150.0), 1.0), None);
    }
}
