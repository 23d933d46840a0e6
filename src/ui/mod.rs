/// UI building blocks
///
/// - Thumbnail grid emitting `(action, entry id)` messages (grid.rs)
/// - Viewer input layer for zoom, pan and rotate (canvas.rs)
pub mod canvas;
pub mod grid;
