//! Concrete speech backends

// Remote synthesis through Google Translate's speech endpoint
pub mod google;

// Local synthesis using the tts crate (cross-platform)
pub mod native;
