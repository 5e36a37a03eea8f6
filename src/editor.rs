//! The interaction state machine tying pointer input to the scene and
//! the view transform.

use log::debug;

use crate::geometry::Point;
use crate::input::{PointerButton, PointerEvent};
use crate::objects::Handle;
use crate::render::page_rect;
use crate::scene::Scene;
use crate::view::View;

/// The gesture currently in flight, if any. Exactly one gesture runs
/// at a time; a button press while another gesture is active is
/// ignored until that gesture's button is released.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Middle-button pan. `anchor` is the document point grabbed at
    /// the press; each move re-solves the view so that point stays
    /// under the pointer, which keeps long pans drift-free.
    Panning { anchor: Point },
    /// Left-button move of one object. `last` is the document position
    /// of the previous pointer event.
    Dragging { index: usize, last: Point },
    /// Left-button corner resize of one object.
    Resizing { index: usize, handle: Handle },
}

/// Editor session: the scene being laid out, the current view over it,
/// and the in-flight gesture.
#[derive(Debug)]
pub struct Editor {
    scene: Scene,
    view: View,
    selected: Option<usize>,
    gesture: Gesture,
}

impl Editor {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            view: View::new(),
            selected: None,
            gesture: Gesture::Idle,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Index of the selected object, while a left-button gesture keeps
    /// one alive.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Feed one pointer event through the state machine. Returns
    /// whether the screen needs repainting.
    pub fn apply(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { button, at } => self.pointer_down(button, at),
            PointerEvent::Move { at } => self.pointer_move(at),
            PointerEvent::Up { button } => self.pointer_up(button),
            PointerEvent::Wheel { delta, at } => self.wheel(delta, at),
        }
    }

    /// Button press at a device position.
    pub fn pointer_down(&mut self, button: PointerButton, at: Point) -> bool {
        if self.gesture != Gesture::Idle {
            return false;
        }
        match button {
            PointerButton::Left => {
                let doc = self.view.map_to_document(at);
                self.scene.clear_selection();
                self.selected = None;

                if let Some(index) = self.scene.first_hit(doc) {
                    let obj = &mut self.scene.objects_mut()[index];
                    obj.set_selected(true);
                    self.selected = Some(index);

                    if let Some(handle) = obj.handle_at(doc) {
                        debug!("resizing {} {index} via {handle:?}", obj.kind_name());
                        self.gesture = Gesture::Resizing { index, handle };
                    } else {
                        debug!("dragging {} {index}", obj.kind_name());
                        self.gesture = Gesture::Dragging { index, last: doc };
                    }
                }
                true
            }
            PointerButton::Middle => {
                self.gesture = Gesture::Panning {
                    anchor: self.view.map_to_document(at),
                };
                false
            }
        }
    }

    /// Pointer motion at a device position.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        match self.gesture {
            Gesture::Idle => {
                let doc = self.view.map_to_document(at);
                self.scene.update_hover(doc)
            }
            Gesture::Panning { anchor } => {
                self.clear_hover();
                let delta = self.view.map_to_document(at) - anchor;
                self.view.pan(delta);
                true
            }
            Gesture::Dragging { index, last } => {
                self.clear_hover();
                let doc = self.view.map_to_document(at);
                if let Some(obj) = self.scene.get_mut(index) {
                    obj.translate(doc - last);
                }
                self.gesture = Gesture::Dragging { index, last: doc };
                true
            }
            Gesture::Resizing { index, handle } => {
                self.clear_hover();
                let doc = self.view.map_to_document(at);
                if let Some(obj) = self.scene.get_mut(index) {
                    obj.resize(doc, handle);
                }
                true
            }
        }
    }

    /// Button release. Releasing the left button ends a drag or resize
    /// and drops the selection; releasing the middle button ends a
    /// pan. Releases that do not match the active gesture are ignored.
    pub fn pointer_up(&mut self, button: PointerButton) -> bool {
        match (button, self.gesture) {
            (PointerButton::Left, Gesture::Dragging { .. } | Gesture::Resizing { .. }) => {
                self.scene.clear_selection();
                self.selected = None;
                self.gesture = Gesture::Idle;
                true
            }
            (PointerButton::Middle, Gesture::Panning { .. }) => {
                self.gesture = Gesture::Idle;
                false
            }
            _ => false,
        }
    }

    /// Wheel step at a device position: positive delta zooms in around
    /// it, negative zooms out.
    pub fn wheel(&mut self, delta: f32, at: Point) -> bool {
        self.view.wheel_zoom(at, delta)
    }

    /// Reset the view so the whole sheet fits in a viewport of the
    /// given device size.
    pub fn fit_to_view(&mut self, viewport_w: f32, viewport_h: f32) {
        self.view.fit_to_view(viewport_w, viewport_h, page_rect());
    }

    fn clear_hover(&mut self) {
        for obj in self.scene.objects_mut() {
            obj.set_hovered(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::objects::PageObject;

    fn editor_with_block() -> Editor {
        let mut scene = Scene::new();
        scene.push(PageObject::text_block(
            "sample",
            Rect::from_xywh(100.0, 100.0, 200.0, 100.0),
        ));
        Editor::new(scene)
    }

    #[test]
    fn left_press_inside_selects_and_requests_repaint() {
        let mut editor = editor_with_block();
        assert!(editor.pointer_down(PointerButton::Left, Point::new(200.0, 150.0)));
        assert_eq!(editor.selected_index(), Some(0));
        assert!(editor.scene().get(0).unwrap().is_selected());
    }

    #[test]
    fn left_press_outside_clears_selection() {
        let mut editor = editor_with_block();
        editor.pointer_down(PointerButton::Left, Point::new(200.0, 150.0));
        editor.pointer_up(PointerButton::Left);

        editor.pointer_down(PointerButton::Left, Point::new(200.0, 150.0));
        assert!(editor.pointer_down(PointerButton::Left, Point::new(5.0, 5.0)));
        assert_eq!(editor.selected_index(), None);
    }

    #[test]
    fn drag_moves_the_object_by_the_pointer_delta() {
        let mut editor = editor_with_block();
        editor.pointer_down(PointerButton::Left, Point::new(200.0, 150.0));
        assert!(editor.pointer_move(Point::new(230.0, 170.0)));
        assert!(editor.pointer_move(Point::new(240.0, 160.0)));

        let b = editor.scene().get(0).unwrap().bounds();
        assert_eq!(b, Rect::from_xywh(140.0, 110.0, 200.0, 100.0));
    }

    #[test]
    fn drag_under_zoom_moves_in_document_units() {
        let mut editor = editor_with_block();
        // zoom in 2x around the origin, then drag by 50 device px
        editor.view.zoom(Point::ZERO, 2.0);
        editor.pointer_down(PointerButton::Left, Point::new(400.0, 300.0));
        editor.pointer_move(Point::new(450.0, 300.0));

        let b = editor.scene().get(0).unwrap().bounds();
        assert_eq!(b, Rect::from_xywh(125.0, 100.0, 200.0, 100.0));
    }

    #[test]
    fn release_ends_the_drag_and_drops_selection() {
        let mut editor = editor_with_block();
        editor.pointer_down(PointerButton::Left, Point::new(200.0, 150.0));
        editor.pointer_move(Point::new(220.0, 150.0));
        assert!(editor.pointer_up(PointerButton::Left));
        assert_eq!(editor.selected_index(), None);
        assert!(!editor.scene().get(0).unwrap().is_selected());

        // the gesture is over: further moves only update hover
        let before = editor.scene().get(0).unwrap().bounds();
        editor.pointer_move(Point::new(400.0, 400.0));
        assert_eq!(editor.scene().get(0).unwrap().bounds(), before);
    }

    #[test]
    fn corner_press_starts_a_resize_instead_of_a_drag() {
        let mut editor = editor_with_block();
        // inside the object and within the corner pickup zone
        editor.pointer_down(PointerButton::Left, Point::new(295.0, 195.0));
        editor.pointer_move(Point::new(350.0, 260.0));

        let b = editor.scene().get(0).unwrap().bounds();
        assert_eq!((b.left, b.top), (100.0, 100.0));
        assert_eq!((b.right, b.bottom), (350.0, 260.0));
    }

    #[test]
    fn pan_keeps_the_grabbed_point_under_the_pointer() {
        let mut editor = editor_with_block();
        editor.view.zoom(Point::new(100.0, 100.0), 1.5);
        let start = Point::new(300.0, 300.0);
        let anchor = editor.view.map_to_document(start);

        editor.pointer_down(PointerButton::Middle, start);
        let path = [
            Point::new(310.0, 305.0),
            Point::new(340.0, 290.0),
            Point::new(260.0, 350.0),
            Point::new(420.0, 180.0),
        ];
        for device in path {
            assert!(editor.pointer_move(device));
            let under = editor.view.map_to_document(device);
            assert!((under.x - anchor.x).abs() < 1e-3);
            assert!((under.y - anchor.y).abs() < 1e-3);
        }
        assert!(!editor.pointer_up(PointerButton::Middle));
    }

    #[test]
    fn selection_stays_live_through_the_drag() {
        let mut editor = editor_with_block();
        editor.pointer_down(PointerButton::Left, Point::new(200.0, 150.0));
        editor.pointer_move(Point::new(260.0, 150.0));
        editor.pointer_move(Point::new(280.0, 190.0));
        assert!(editor.scene().get(0).unwrap().is_selected());
        assert_eq!(editor.selected_index(), Some(0));
    }

    #[test]
    fn mismatched_release_is_ignored() {
        let mut editor = editor_with_block();
        editor.pointer_down(PointerButton::Middle, Point::new(50.0, 50.0));
        assert!(!editor.pointer_up(PointerButton::Left));

        // still panning
        assert!(editor.pointer_move(Point::new(70.0, 50.0)));
        assert!(!editor.pointer_up(PointerButton::Middle));
    }

    #[test]
    fn second_button_during_a_gesture_is_ignored() {
        let mut editor = editor_with_block();
        editor.pointer_down(PointerButton::Left, Point::new(200.0, 150.0));
        assert!(!editor.pointer_down(PointerButton::Middle, Point::new(50.0, 50.0)));

        // the drag is still live
        editor.pointer_move(Point::new(210.0, 150.0));
        assert_eq!(
            editor.scene().get(0).unwrap().bounds(),
            Rect::from_xywh(110.0, 100.0, 200.0, 100.0)
        );
    }

    #[test]
    fn idle_moves_update_hover_only() {
        let mut editor = editor_with_block();
        assert!(editor.pointer_move(Point::new(200.0, 150.0)));
        assert!(editor.scene().get(0).unwrap().is_hovered());
        assert!(!editor.pointer_move(Point::new(201.0, 150.0)));
        assert!(editor.pointer_move(Point::new(5.0, 5.0)));
        assert!(!editor.scene().get(0).unwrap().is_hovered());
    }

    #[test]
    fn hover_clears_while_a_gesture_is_active() {
        let mut editor = editor_with_block();
        editor.pointer_move(Point::new(200.0, 150.0));
        assert!(editor.scene().get(0).unwrap().is_hovered());

        editor.pointer_down(PointerButton::Middle, Point::new(200.0, 150.0));
        editor.pointer_move(Point::new(205.0, 150.0));
        assert!(!editor.scene().get(0).unwrap().is_hovered());
    }

    #[test]
    fn wheel_routes_through_the_view() {
        let mut editor = editor_with_block();
        assert!(editor.wheel(120.0, Point::new(400.0, 300.0)));
        assert!(!editor.wheel(0.0, Point::new(400.0, 300.0)));
    }

    #[test]
    fn events_drive_the_same_machine_as_direct_calls() {
        let mut editor = editor_with_block();
        let script = [
            PointerEvent::Down {
                button: PointerButton::Left,
                at: Point::new(200.0, 150.0),
            },
            PointerEvent::Move {
                at: Point::new(250.0, 180.0),
            },
            PointerEvent::Up {
                button: PointerButton::Left,
            },
        ];
        for event in script {
            editor.apply(event);
        }
        assert_eq!(
            editor.scene().get(0).unwrap().bounds(),
            Rect::from_xywh(150.0, 130.0, 200.0, 100.0)
        );
    }
}
