use image::RgbaImage;
use setzkasten::geometry::{Point, Rect};
use setzkasten::images::ImagePayload;
use setzkasten::objects::PageObject;
use setzkasten::scene::Scene;
use setzkasten::test_utils::test_helpers::{GestureBuilder, demo_editor, replay};
use setzkasten::{Editor, PointerButton, PointerEvent};

/// Test that pressing inside the headline selects it
#[test]
fn test_press_on_header_selects_it() {
    let mut editor = demo_editor();

    let script = GestureBuilder::new().press_left_at(150.0, 150.0).build();
    replay(&mut editor, script);

    assert_eq!(editor.selected_index(), Some(0));
    assert!(editor.scene().get(0).unwrap().is_selected());
    assert!(!editor.scene().get(1).unwrap().is_selected());
}

/// Test that pressing on empty paper selects nothing
#[test]
fn test_press_on_empty_paper_selects_nothing() {
    let mut editor = demo_editor();

    let script = GestureBuilder::new().press_left_at(50.0, 50.0).build();
    replay(&mut editor, script);

    assert_eq!(editor.selected_index(), None);
    assert!(editor.scene().objects().iter().all(|o| !o.is_selected()));
}

/// Test that the first-inserted object wins where two objects touch
#[test]
fn test_overlap_picks_the_first_inserted_object() {
    let mut editor = demo_editor();

    // y=200 lies on the headline's bottom edge and the body's top edge
    let script = GestureBuilder::new().press_left_at(150.0, 200.0).build();
    replay(&mut editor, script);
    assert_eq!(editor.selected_index(), Some(0));

    editor.apply(PointerEvent::Up {
        button: PointerButton::Left,
    });

    let script = GestureBuilder::new().press_left_at(150.0, 250.0).build();
    replay(&mut editor, script);
    assert_eq!(editor.selected_index(), Some(1));
}

/// Test that a drag moves the picture frame by the pointer delta
#[test]
fn test_drag_moves_the_image_by_the_pointer_delta() {
    let mut editor = demo_editor();

    // (250, 600) is inside the frame and clear of every corner zone
    let script = GestureBuilder::new()
        .press_left_at(250.0, 600.0)
        .move_to(270.0, 620.0)
        .release_left()
        .build();
    replay(&mut editor, script);

    assert_eq!(
        editor.scene().get(2).unwrap().bounds(),
        Rect::from_xywh(120.0, 520.0, 300.0, 200.0)
    );
    // release dropped the selection again
    assert_eq!(editor.selected_index(), None);
}

/// Test that a corner resize keeps the image aspect and refreshes the
/// display copy
#[test]
fn test_corner_resize_keeps_aspect_and_display() {
    let mut editor = editor_with_decoded_image();

    let script = GestureBuilder::new()
        .press_left_at(395.0, 645.0)
        .move_to(500.0, 2000.0)
        .release_left()
        .build();
    replay(&mut editor, script);

    let obj = editor.scene().get(0).unwrap();
    assert_eq!(obj.bounds(), Rect::from_xywh(100.0, 500.0, 400.0, 200.0));
    if let PageObject::Image {
        payload: Some(payload),
        ..
    } = obj
    {
        assert_eq!(payload.display_size(), (400, 200));
    } else {
        panic!("image payload disappeared");
    }
}

/// Test that an overshooting pointer flips the resize to height-driven
#[test]
fn test_resize_overshoot_switches_to_height_driven() {
    let mut editor = editor_with_decoded_image();

    let script = GestureBuilder::new()
        .press_left_at(395.0, 645.0)
        .move_to(500.0, 600.0)
        .release_left()
        .build();
    replay(&mut editor, script);

    let b = editor.scene().get(0).unwrap().bounds();
    assert_eq!(b.height(), 100.0);
    assert_eq!(b.width(), 200.0);
    assert_eq!((b.left, b.top), (100.0, 500.0));
}

/// Test that hover marks every object under the pointer, not just one
#[test]
fn test_hover_marks_every_object_under_the_pointer() {
    let mut editor = demo_editor();

    // shared edge of headline and body
    editor.apply(PointerEvent::Move {
        at: Point::new(150.0, 200.0),
    });
    let scene = editor.scene();
    assert!(scene.get(0).unwrap().is_hovered());
    assert!(scene.get(1).unwrap().is_hovered());
    assert!(!scene.get(2).unwrap().is_hovered());

    // moving on clears the old marks
    editor.apply(PointerEvent::Move {
        at: Point::new(150.0, 600.0),
    });
    let scene = editor.scene();
    assert!(!scene.get(0).unwrap().is_hovered());
    assert!(!scene.get(1).unwrap().is_hovered());
    assert!(scene.get(2).unwrap().is_hovered());
}

/// Test that wheel zoom keeps the document point under the pointer
#[test]
fn test_wheel_zoom_keeps_the_pointer_point_stable() {
    let mut editor = demo_editor();
    let at = Point::new(200.0, 300.0);
    let before = editor.view().map_to_document(at);

    let script = GestureBuilder::new()
        .wheel(1.0, 200.0, 300.0)
        .wheel(1.0, 200.0, 300.0)
        .wheel(-1.0, 200.0, 300.0)
        .build();
    replay(&mut editor, script);

    let after = editor.view().map_to_document(at);
    assert!((after.x - before.x).abs() < 1e-3);
    assert!((after.y - before.y).abs() < 1e-3);
}

/// Test that a middle-button pan shifts the view and leaves objects alone
#[test]
fn test_pan_shifts_the_view_not_the_objects() {
    let mut editor = demo_editor();
    let header_before = editor.scene().get(0).unwrap().bounds();
    let grabbed = editor.view().map_to_document(Point::new(300.0, 300.0));

    let script = GestureBuilder::new()
        .press_middle_at(300.0, 300.0)
        .move_to(350.0, 330.0)
        .release_middle()
        .build();
    replay(&mut editor, script);

    assert_eq!(editor.scene().get(0).unwrap().bounds(), header_before);
    let under = editor.view().map_to_document(Point::new(350.0, 330.0));
    assert!((under.x - grabbed.x).abs() < 1e-3);
    assert!((under.y - grabbed.y).abs() < 1e-3);
}

/// Test that parsed gesture lines drive the editor like built events
#[test]
fn test_script_lines_match_builder_events() {
    let lines = ["down left 150 150", "move 170 160", "up left"];
    let parsed: Vec<PointerEvent> = lines.iter().map(|l| l.parse().unwrap()).collect();
    let built = GestureBuilder::new()
        .press_left_at(150.0, 150.0)
        .move_to(170.0, 160.0)
        .release_left()
        .build();
    assert_eq!(parsed, built);

    let mut editor = demo_editor();
    replay(&mut editor, parsed);
    assert_eq!(
        editor.scene().get(0).unwrap().bounds(),
        Rect::from_xywh(120.0, 110.0, 200.0, 100.0)
    );
}

/// Editor over a single decoded 2:1 image at the demo frame position
fn editor_with_decoded_image() -> Editor {
    let payload = ImagePayload::from_rgba(RgbaImage::new(80, 40), 300.0, 150.0);
    let mut scene = Scene::new();
    scene.push(PageObject::image(
        Some(payload),
        Rect::from_xywh(100.0, 500.0, 300.0, 150.0),
    ));
    Editor::new(scene)
}
