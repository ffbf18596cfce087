mod listing;
mod playback_state;
mod track;

pub use listing::{Catalog, Listing};
pub use playback_state::{PlaybackState, Progress, RepeatMode};
pub use track::Track;
