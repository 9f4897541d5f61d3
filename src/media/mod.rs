pub mod artifact;
pub mod normalize;

pub use artifact::{Artifact, MediaKind};
pub use normalize::{NormalizeError, PickedFile};
