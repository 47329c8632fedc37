//! HTTP handlers.
pub mod favicon;
pub mod post;
pub mod status;
pub mod vote;

const SVG: &str = "image/svg+xml";
