pub mod artwork;
pub mod now_playing;

pub use artwork::Artwork;
pub use now_playing::NowPlaying;
