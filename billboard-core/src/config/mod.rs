//! JSON banner description.

/// [`banner::BannerConfig`] and its parts.
pub mod banner;
