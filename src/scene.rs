//! The ordered collection of objects on one page.

use std::path::Path;

use log::{debug, warn};

use crate::geometry::{Point, Rect};
use crate::images::ImagePayload;
use crate::objects::PageObject;

const SEED_BODY_TEXT: &str =
    "Willkommen in Dresden, der Stadt mit einem Hauch von Humor! Diese wunderbare Perle an \
     der Elbe hat nicht nur eine reiche Geschichte und beeindruckende Architektur zu bieten, \
     sondern auch eine Fülle von amüsanten und lustigen Aspekten, die Besucher zum Lachen \
     bringen. Beginnen wir mit der berühmten Frauenkirche, einem Meisterwerk der Architektur. \
     Das beeindruckende Gebäude, das nach der Zerstörung im Zweiten Weltkrieg wiederaufgebaut \
     wurde, zieht Besucher aus aller Welt an. Doch wussten Sie, dass die Kuppel der Kirche \
     ein bisschen schief ist? Es heißt, die Architekten hätten absichtlich einen kleinen \
     Scherz eingebaut, um zu zeigen, dass Perfektion nicht immer erstrebenswert ist. Ein \
     schiefes Wahrzeichen - das ist doch zum Schmunzeln! Ein weiterer lustiger Aspekt in \
     Dresden ist die \"Brühlsche Terrasse\", auch bekannt als \"Balkon Europas\". Hier kann \
     man einen herrlichen Blick auf die Elbe und die Altstadt genießen.\"";

/// All objects on the page, in insertion order. Painting walks the
/// list front to back, so later objects draw on top of earlier ones.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<PageObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo paste-up: a headline, a body block and one image. The
    /// image slot falls back to a placeholder when `image_path` is
    /// absent or fails to decode.
    pub fn seed_demo(image_path: Option<&Path>) -> Self {
        let payload = image_path.and_then(|path| {
            match ImagePayload::load(path, 300.0, 200.0) {
                Ok(payload) => Some(payload),
                Err(err) => {
                    warn!("failed to load image {path:?}: {err}, using placeholder");
                    None
                }
            }
        });

        let mut scene = Self::new();
        scene.push(PageObject::header(
            "Dresden Post",
            Rect::from_xywh(100.0, 100.0, 200.0, 100.0),
        ));
        scene.push(PageObject::text_block(
            SEED_BODY_TEXT,
            Rect::from_xywh(100.0, 200.0, 300.0, 100.0),
        ));
        scene.push(PageObject::image(
            payload,
            Rect::from_xywh(100.0, 500.0, 300.0, 200.0),
        ));
        debug!("seeded demo scene with {} objects", scene.len());
        scene
    }

    pub fn push(&mut self, object: PageObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[PageObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [PageObject] {
        &mut self.objects
    }

    pub fn get(&self, index: usize) -> Option<&PageObject> {
        self.objects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PageObject> {
        self.objects.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Index of the first object in insertion order containing
    /// `point`. Painting draws later objects on top, so in an overlap
    /// the object underneath wins the pick.
    pub fn first_hit(&self, point: Point) -> Option<usize> {
        self.objects.iter().position(|obj| obj.hit_test(point))
    }

    /// Refresh hover flags against the pointer: every object under the
    /// pointer is hovered, all others are not. Returns whether any
    /// flag changed.
    pub fn update_hover(&mut self, point: Point) -> bool {
        let mut changed = false;
        for obj in &mut self.objects {
            let hovered = obj.hit_test(point);
            if hovered != obj.is_hovered() {
                obj.set_hovered(hovered);
                changed = true;
            }
        }
        changed
    }

    pub fn clear_selection(&mut self) {
        for obj in &mut self.objects {
            obj.set_selected(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlapping_pair() -> Scene {
        let mut scene = Scene::new();
        scene.push(PageObject::text_block(
            "under",
            Rect::from_xywh(0.0, 0.0, 100.0, 100.0),
        ));
        scene.push(PageObject::text_block(
            "over",
            Rect::from_xywh(50.0, 50.0, 100.0, 100.0),
        ));
        scene
    }

    #[test]
    fn first_hit_prefers_the_earlier_object_in_an_overlap() {
        let scene = overlapping_pair();
        assert_eq!(scene.first_hit(Point::new(75.0, 75.0)), Some(0));
        assert_eq!(scene.first_hit(Point::new(125.0, 125.0)), Some(1));
        assert_eq!(scene.first_hit(Point::new(300.0, 300.0)), None);
    }

    #[test]
    fn hover_marks_every_object_under_the_pointer() {
        let mut scene = overlapping_pair();
        assert!(scene.update_hover(Point::new(75.0, 75.0)));
        assert!(scene.get(0).unwrap().is_hovered());
        assert!(scene.get(1).unwrap().is_hovered());

        // pointer leaves the overlap: only the second stays hovered
        assert!(scene.update_hover(Point::new(125.0, 125.0)));
        assert!(!scene.get(0).unwrap().is_hovered());
        assert!(scene.get(1).unwrap().is_hovered());
    }

    #[test]
    fn hover_reports_no_change_when_flags_are_stable() {
        let mut scene = overlapping_pair();
        assert!(scene.update_hover(Point::new(75.0, 75.0)));
        assert!(!scene.update_hover(Point::new(76.0, 76.0)));
    }

    #[test]
    fn clear_selection_touches_every_object() {
        let mut scene = overlapping_pair();
        scene.get_mut(0).unwrap().set_selected(true);
        scene.get_mut(1).unwrap().set_selected(true);
        scene.clear_selection();
        assert!(scene.objects().iter().all(|o| !o.is_selected()));
    }

    #[test]
    fn demo_scene_layout() {
        let scene = Scene::seed_demo(None);
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.get(0).unwrap().kind_name(), "header");
        assert_eq!(scene.get(1).unwrap().kind_name(), "text");
        assert_eq!(scene.get(2).unwrap().kind_name(), "image");
        assert_eq!(
            scene.get(2).unwrap().bounds(),
            Rect::from_xywh(100.0, 500.0, 300.0, 200.0)
        );
    }

    #[test]
    fn demo_scene_survives_a_bad_image_path() {
        let scene = Scene::seed_demo(Some(Path::new("/no/such/file.jpeg")));
        assert_eq!(scene.len(), 3);
        assert!(matches!(
            scene.get(2).unwrap(),
            PageObject::Image { payload: None, .. }
        ));
    }
}
