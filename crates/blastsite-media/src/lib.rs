//! Lazy image loading for blastsite pages.
//!
//! [`LazyImage`] is a one-shot visibility state machine: it shows a
//! placeholder until its element comes within the proximity margin of the
//! viewport, then loads the preferred source once, with a single fallback.

pub mod lazy;
pub mod urls;

pub use lazy::{
    Layers, LazyImage, LazyImageSource, LoadRequest, MediaLoadState, ObserverHandle, Rect,
    ViewportObserver, DEFAULT_ROOT_MARGIN_PX, FADE_DURATION_MS,
};
pub use urls::{svg_placeholder, thumbnail_url, webp_url};
