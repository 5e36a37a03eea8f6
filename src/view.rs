//! The view transform: pan, wheel zoom and fit-to-view.

use log::debug;

use crate::geometry::{Point, Rect, Transform};

/// Wheel-in multiplies the view scale by this per notch.
pub const ZOOM_IN_RATE: f32 = 1.1;
/// Wheel-out multiplies the view scale by this per notch.
pub const ZOOM_OUT_RATE: f32 = 0.9;
/// Fit-to-view shrinks the computed scale so the page edges stay
/// visible against the backdrop.
pub const FIT_MARGIN: f32 = 0.95;

/// Current view of the page.
///
/// Pan and zoom are folded into a single affine transform mapping
/// document space to device space. The transform is only ever mutated
/// by [`View::pan`], [`View::zoom`] and [`View::fit_to_view`]; pointer
/// mapping degrades to the untransformed point if the matrix has been
/// driven degenerate, so interaction never fails outright.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct View {
    transform: Transform,
}

impl View {
    pub fn new() -> Self {
        View {
            transform: Transform::identity(),
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Device point to document point through the inverse transform.
    /// Falls back to the input point when the transform is degenerate.
    pub fn map_to_document(&self, device: Point) -> Point {
        match self.transform.invert() {
            Some(inverse) => inverse.map_point(device),
            None => {
                debug!("view transform not invertible, mapping pointer 1:1");
                device
            }
        }
    }

    /// Document point to device point through the current transform.
    pub fn map_to_device(&self, document: Point) -> Point {
        self.transform.map_point(document)
    }

    /// Pans by a delta measured in document space (the space pointer
    /// deltas are computed in after mapping).
    pub fn pan(&mut self, delta: Point) {
        self.transform = self.transform.pre_translate(delta.x, delta.y);
    }

    /// Scales the view about a device-space focal point. The document
    /// point under `focal` stays put on screen.
    pub fn zoom(&mut self, focal: Point, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            debug!("ignoring zoom by non-positive factor {factor}");
            return;
        }
        self.transform = self
            .transform
            .post_concat(Transform::from_translate(-focal.x, -focal.y))
            .post_concat(Transform::from_scale(factor, factor))
            .post_concat(Transform::from_translate(focal.x, focal.y));
    }

    /// One wheel notch: in for positive deltas, out for negative, no-op
    /// for zero.
    pub fn wheel_zoom(&mut self, focal: Point, delta: f32) -> bool {
        if delta > 0.0 {
            self.zoom(focal, ZOOM_IN_RATE);
        } else if delta < 0.0 {
            self.zoom(focal, ZOOM_OUT_RATE);
        } else {
            return false;
        }
        true
    }

    /// Replaces the transform with one that centers `content` in the
    /// viewport at a uniform scale, shrunk by [`FIT_MARGIN`].
    pub fn fit_to_view(&mut self, viewport_width: f32, viewport_height: f32, content: Rect) {
        if content.width() <= 0.0
            || content.height() <= 0.0
            || viewport_width <= 0.0
            || viewport_height <= 0.0
        {
            debug!("fit_to_view with empty viewport or content, resetting to identity");
            self.transform = Transform::identity();
            return;
        }
        let scale = (viewport_width / content.width())
            .min(viewport_height / content.height())
            * FIT_MARGIN;
        let tx = (viewport_width - content.width() * scale) / 2.0 - content.left * scale;
        let ty = (viewport_height - content.height() * scale) / 2.0 - content.top * scale;
        self.transform = Transform {
            sx: scale,
            kx: 0.0,
            ky: 0.0,
            sy: scale,
            tx,
            ty,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-2;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn round_trip_through_pan_and_zoom() {
        let mut view = View::new();
        view.pan(Point::new(40.0, -12.5));
        view.zoom(Point::new(300.0, 200.0), ZOOM_IN_RATE);
        view.zoom(Point::new(10.0, 700.0), ZOOM_OUT_RATE);
        view.pan(Point::new(-3.0, 99.0));

        for p in [
            Point::ZERO,
            Point::new(150.0, 150.0),
            Point::new(2481.0, 3507.0),
        ] {
            let there_and_back = view.map_to_document(view.map_to_device(p));
            assert!(close(there_and_back, p), "{p:?} -> {there_and_back:?}");
        }
    }

    #[test]
    fn zoom_keeps_focal_point_fixed() {
        let mut view = View::new();
        view.pan(Point::new(120.0, 80.0));
        let focal = Point::new(400.0, 300.0);
        let doc_before = view.map_to_document(focal);
        view.zoom(focal, ZOOM_IN_RATE);
        let doc_after = view.map_to_document(focal);
        assert!(close(doc_before, doc_after), "{doc_before:?} vs {doc_after:?}");

        view.zoom(focal, ZOOM_OUT_RATE);
        view.zoom(focal, ZOOM_OUT_RATE);
        let doc_final = view.map_to_document(focal);
        assert!(close(doc_before, doc_final));
    }

    #[test]
    fn wheel_zoom_direction_and_zero() {
        let mut view = View::new();
        assert!(view.wheel_zoom(Point::ZERO, 120.0));
        assert!(view.transform().sx > 1.0);

        let mut view = View::new();
        assert!(view.wheel_zoom(Point::ZERO, -120.0));
        assert!(view.transform().sx < 1.0);

        let mut view = View::new();
        assert!(!view.wheel_zoom(Point::ZERO, 0.0));
        assert!(view.transform().is_identity());
    }

    #[test]
    fn zoom_ignores_bad_factors() {
        let mut view = View::new();
        view.zoom(Point::new(5.0, 5.0), 0.0);
        view.zoom(Point::new(5.0, 5.0), -2.0);
        view.zoom(Point::new(5.0, 5.0), f32::NAN);
        assert!(view.transform().is_identity());
    }

    #[test]
    fn degenerate_transform_maps_pointer_unchanged() {
        let view = View {
            transform: Transform::from_scale(0.0, 0.0),
        };
        let p = Point::new(77.0, 33.0);
        assert_eq!(view.map_to_document(p), p);
    }

    #[test]
    fn fit_keeps_page_strictly_inside_viewport() {
        let page = Rect::from_xywh(0.0, 0.0, 2481.0, 3507.0);
        for (vw, vh) in [(1200.0, 800.0), (800.0, 1200.0), (300.0, 300.0)] {
            let mut view = View::new();
            view.fit_to_view(vw, vh, page);

            let tl = view.map_to_device(Point::new(page.left, page.top));
            let br = view.map_to_device(Point::new(page.right, page.bottom));
            assert!(tl.x > 0.0 && tl.y > 0.0, "{vw}x{vh}: {tl:?}");
            assert!(br.x < vw && br.y < vh, "{vw}x{vh}: {br:?}");

            // centered: equal margins on both sides of each axis
            assert!(((tl.x - 0.0) - (vw - br.x)).abs() < EPS);
            assert!(((tl.y - 0.0) - (vh - br.y)).abs() < EPS);
        }
    }

    #[test]
    fn fit_with_empty_viewport_resets_to_identity() {
        let mut view = View::new();
        view.pan(Point::new(50.0, 50.0));
        view.fit_to_view(0.0, 600.0, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
        assert!(view.transform().is_identity());
    }
}
