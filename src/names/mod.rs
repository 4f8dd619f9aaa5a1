// Name blending: splice mythology and robot names into new candidates,
// keep the pronounceable ones, and rank them by a creativity heuristic.

pub mod blend;
pub mod creativity;
pub mod generator;
pub mod pronounce;

pub use blend::{blend_names, BlendStyle};
pub use creativity::score_creativity;
pub use generator::{BlendCandidate, GeneratedName, NameGenerator};
pub use pronounce::is_pronounceable;
