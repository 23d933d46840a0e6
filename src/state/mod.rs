/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - Directory loading into a library (library.rs)
/// - Date filtering and pagination (paginate.rs)
/// - The session object owned by the UI thread (session.rs)
/// - User settings (settings.rs)
pub mod data;
pub mod library;
pub mod paginate;
pub mod session;
pub mod settings;
