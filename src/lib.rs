// Export modules for use in tests
pub mod editor;
pub mod export;
pub mod fonts;
pub mod geometry;
pub mod images;
pub mod input;
pub mod layout;
pub mod objects;
pub mod raster;
pub mod render;
pub mod scene;
pub mod settings;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export the editing core
pub use editor::Editor;
pub use input::{PointerButton, PointerEvent};
pub use scene::Scene;
