//! # Plugin groups and placement hints.
//!
//! - [`PluginGroup`] - named, placed symbols resolved into a deterministic order
//! - [`Placement`] - ordering hint relative to another plugin or the group ends

mod group;
mod placement;

pub use group::PluginGroup;
pub use placement::Placement;
