//! Playing a configured banner into a frame sink.

/// [`player::BannerSession`].
pub mod player;
