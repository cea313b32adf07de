//! Bridges to third-party capabilities loaded outside this crate's control:
//! the lead-capture form script and the mapping API.

pub mod error;
pub mod form;
pub mod map;

pub use error::EmbedError;
pub use form::{
    wait_until_ready, FormBridge, FormHost, FormOptions, PollConfig, Readiness, RenderOutcome,
};
pub use map::{
    render_service_area, zoom_for_radius, CircleStyle, MapApi, MapHandle, MapOutcome,
    METERS_PER_MILE,
};
