//! Visibility-triggered image loading.

use crate::urls::{svg_placeholder, thumbnail_url, webp_url};

/// Distance before the viewport at which loading starts.
pub const DEFAULT_ROOT_MARGIN_PX: f64 = 100.0;

/// Cross-fade duration between placeholder and loaded image.
pub const FADE_DURATION_MS: u32 = 300;

/// Axis-aligned box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Grows the box by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Touching edges count as intersecting, matching a zero threshold observer.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.top <= other.bottom()
            && other.top <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaLoadState {
    Pending,
    InView,
    Loaded,
    FallbackLoaded,
}

/// Registration returned by a [`ViewportObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

/// Visibility observation primitive, e.g. an intersection observer.
pub trait ViewportObserver {
    fn observe(&mut self, element_id: &str) -> ObserverHandle;
    fn disconnect(&mut self, handle: ObserverHandle);
}

/// Sources for one lazily loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyImageSource {
    pub original: String,
    /// Format-negotiated variant tried first when present.
    pub preferred: Option<String>,
    pub thumbnail: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl LazyImageSource {
    pub fn new(original: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            original: original.into(),
            preferred: None,
            thumbnail: None,
            width,
            height,
        }
    }

    /// Fills in the WebP variant and blurred thumbnail derived from the original URL.
    #[must_use]
    pub fn with_derived_variants(mut self) -> Self {
        self.preferred = webp_url(&self.original);
        self.thumbnail = thumbnail_url(&self.original);
        self
    }

    fn preferred_url(&self) -> &str {
        self.preferred.as_deref().unwrap_or(&self.original)
    }
}

/// A source the caller should start fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub url: String,
    pub is_fallback: bool,
}

/// What should be painted right now.
#[derive(Debug, Clone, PartialEq)]
pub struct Layers {
    pub placeholder_src: String,
    pub placeholder_opacity: f32,
    pub image_src: Option<String>,
    pub image_opacity: f32,
    pub transition_ms: u32,
}

/// One image's `Pending → InView → Loaded | FallbackLoaded` machine.
///
/// The observer registration is released exactly once: on the first
/// qualifying intersection, or on [`destroy`](Self::destroy) if that comes
/// first.
#[derive(Debug)]
pub struct LazyImage {
    element_id: String,
    source: LazyImageSource,
    root_margin: f64,
    state: MediaLoadState,
    observation: Option<ObserverHandle>,
    current_src: Option<String>,
    fallback_attempted: bool,
    destroyed: bool,
}

impl LazyImage {
    pub fn new(element_id: impl Into<String>, source: LazyImageSource, root_margin: f64) -> Self {
        Self {
            element_id: element_id.into(),
            source,
            root_margin: root_margin.max(0.0),
            state: MediaLoadState::Pending,
            observation: None,
            current_src: None,
            fallback_attempted: false,
            destroyed: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> MediaLoadState {
        self.state
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// Source requested so far, if any.
    #[must_use]
    pub fn current_src(&self) -> Option<&str> {
        self.current_src.as_deref()
    }

    /// Starts observing. No-op unless pending and not yet attached.
    pub fn attach<O: ViewportObserver + ?Sized>(&mut self, observer: &mut O) {
        if self.destroyed || self.state != MediaLoadState::Pending || self.observation.is_some() {
            return;
        }
        self.observation = Some(observer.observe(&self.element_id));
    }

    /// Feeds one intersection callback.
    ///
    /// When the element's box touches the viewport grown by the root margin
    /// while pending, observation is detached, the state moves to `InView` and
    /// the preferred source is returned for loading.
    pub fn on_intersection<O: ViewportObserver + ?Sized>(
        &mut self,
        observer: &mut O,
        element: Rect,
        viewport: Rect,
    ) -> Option<LoadRequest> {
        if self.destroyed || self.state != MediaLoadState::Pending {
            return None;
        }
        if !element.intersects(&viewport.expanded(self.root_margin)) {
            return None;
        }

        self.detach(observer);
        self.state = MediaLoadState::InView;
        let url = self.source.preferred_url().to_owned();
        self.current_src = Some(url.clone());
        tracing::trace!(element = %self.element_id, %url, "image entered proximity margin");
        Some(LoadRequest {
            url,
            is_fallback: false,
        })
    }

    /// The requested source finished loading.
    pub fn on_load(&mut self) {
        if self.destroyed || self.state != MediaLoadState::InView {
            return;
        }
        self.state = if self.fallback_attempted {
            MediaLoadState::FallbackLoaded
        } else {
            MediaLoadState::Loaded
        };
    }

    /// The requested source failed.
    ///
    /// The first failure of a preferred source that differs from the original
    /// yields one fallback request. Any other failure settles as `Loaded`.
    pub fn on_error(&mut self) -> Option<LoadRequest> {
        if self.destroyed || self.state != MediaLoadState::InView {
            return None;
        }

        let can_fall_back = !self.fallback_attempted
            && self.current_src.as_deref() != Some(self.source.original.as_str());
        if can_fall_back {
            self.fallback_attempted = true;
            let url = self.source.original.clone();
            tracing::debug!(element = %self.element_id, %url, "preferred image failed; trying original");
            self.current_src = Some(url.clone());
            return Some(LoadRequest {
                url,
                is_fallback: true,
            });
        }

        tracing::debug!(element = %self.element_id, "image failed to load; giving up");
        self.state = MediaLoadState::Loaded;
        None
    }

    /// Tears down the instance, releasing observation if still held.
    pub fn destroy<O: ViewportObserver + ?Sized>(&mut self, observer: &mut O) {
        self.detach(observer);
        self.destroyed = true;
    }

    /// Paint state: the placeholder is the only visible layer until a load
    /// signal, then the two cross-fade.
    #[must_use]
    pub fn layers(&self) -> Layers {
        let placeholder_src = self
            .source
            .thumbnail
            .clone()
            .unwrap_or_else(|| svg_placeholder(self.source.width, self.source.height));
        let loaded = matches!(
            self.state,
            MediaLoadState::Loaded | MediaLoadState::FallbackLoaded
        );
        Layers {
            placeholder_src,
            placeholder_opacity: if loaded { 0.0 } else { 1.0 },
            image_src: self.current_src.clone(),
            image_opacity: if loaded { 1.0 } else { 0.0 },
            transition_ms: FADE_DURATION_MS,
        }
    }

    fn detach<O: ViewportObserver + ?Sized>(&mut self, observer: &mut O) {
        if let Some(handle) = self.observation.take() {
            observer.disconnect(handle);
        }
    }
}
