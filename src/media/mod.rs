/// Image handling module
///
/// This module handles:
/// - Reading capture dates from EXIF (metadata.rs)
/// - Generating and memoizing thumbnails (thumbnail.rs)
/// - The full-resolution zoom/pan/rotate viewer (viewport.rs)
/// - Revealing files in the system file browser (reveal.rs)
pub mod metadata;
pub mod reveal;
pub mod thumbnail;
pub mod viewport;
