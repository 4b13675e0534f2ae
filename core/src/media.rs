mod native;
mod youtube;

pub use native::NativeVideoPlayer;
pub use youtube::{EmbedPlayer, extract_youtube_id, frame_container_id};
