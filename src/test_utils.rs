pub mod test_helpers {
    use crate::editor::Editor;
    use crate::geometry::Point;
    use crate::input::{PointerButton, PointerEvent};
    use crate::scene::Scene;

    /// Builder for pointer-gesture scripts fed to the editor
    pub struct GestureBuilder {
        events: Vec<PointerEvent>,
    }

    impl GestureBuilder {
        pub fn new() -> Self {
            Self { events: Vec::new() }
        }

        /// Press the left button at device coordinates
        pub fn press_left_at(mut self, x: f32, y: f32) -> Self {
            self.events.push(PointerEvent::Down {
                button: PointerButton::Left,
                at: Point::new(x, y),
            });
            self
        }

        /// Press the middle button at device coordinates
        pub fn press_middle_at(mut self, x: f32, y: f32) -> Self {
            self.events.push(PointerEvent::Down {
                button: PointerButton::Middle,
                at: Point::new(x, y),
            });
            self
        }

        /// Move the pointer to device coordinates
        pub fn move_to(mut self, x: f32, y: f32) -> Self {
            self.events.push(PointerEvent::Move {
                at: Point::new(x, y),
            });
            self
        }

        /// Move the pointer through each stop in turn
        pub fn drag_through(mut self, stops: &[(f32, f32)]) -> Self {
            for &(x, y) in stops {
                self.events.push(PointerEvent::Move {
                    at: Point::new(x, y),
                });
            }
            self
        }

        /// Release the left button
        pub fn release_left(mut self) -> Self {
            self.events.push(PointerEvent::Up {
                button: PointerButton::Left,
            });
            self
        }

        /// Release the middle button
        pub fn release_middle(mut self) -> Self {
            self.events.push(PointerEvent::Up {
                button: PointerButton::Middle,
            });
            self
        }

        /// Turn the wheel at device coordinates
        pub fn wheel(mut self, delta: f32, x: f32, y: f32) -> Self {
            self.events.push(PointerEvent::Wheel {
                delta,
                at: Point::new(x, y),
            });
            self
        }

        /// Build the event list
        pub fn build(self) -> Vec<PointerEvent> {
            self.events
        }
    }

    /// Feed a gesture script through the editor
    pub fn replay(editor: &mut Editor, events: Vec<PointerEvent>) {
        for event in events {
            editor.apply(event);
        }
    }

    /// Editor over the demo scene (no image payload), identity view so
    /// device coordinates equal document coordinates
    pub fn demo_editor() -> Editor {
        Editor::new(Scene::seed_demo(None))
    }
}
