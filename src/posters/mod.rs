//! Poster manifest loading and rotation.

pub mod manifest;
pub mod rotation;

pub use manifest::{load_posters_manifest, ManifestError, PosterEntry};
pub use rotation::{PosterFrame, PosterRotation};
