//! Type definitions for devlink storage.

mod ids;
mod sessions;
mod users;

// Re-export all types from submodules
pub use ids::*;
pub use sessions::*;
pub use users::*;
