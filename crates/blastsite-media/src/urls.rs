//! Pure URL helpers for derived image variants.

use std::path::Path;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use url::{Position, Url};

const THUMBNAIL_SUFFIX: &str = "-thumb";
const PLACEHOLDER_FILL: &str = "#e5e7eb";

/// Base that site-relative and scheme-relative image paths are resolved
/// against. It never appears in returned URLs.
const RELATIVE_BASE: &str = "https://relative.invalid/";

/// How the caller wrote the URL, so the result comes back in the same form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference {
    Absolute,
    SchemeRelative,
    RootRelative,
    PathRelative,
}

fn parse_reference(raw: &str) -> Option<(Url, Reference)> {
    match Url::parse(raw) {
        Ok(url) => Some((url, Reference::Absolute)),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let kind = if raw.starts_with("//") {
                Reference::SchemeRelative
            } else if raw.starts_with('/') {
                Reference::RootRelative
            } else {
                Reference::PathRelative
            };
            let base = Url::parse(RELATIVE_BASE).ok()?;
            base.join(raw).ok().map(|url| (url, kind))
        }
        Err(_) => None,
    }
}

fn render(url: &Url, kind: Reference) -> String {
    match kind {
        Reference::Absolute => url.to_string(),
        Reference::SchemeRelative => url[Position::AfterScheme..]
            .trim_start_matches(':')
            .to_string(),
        Reference::RootRelative => url[Position::BeforePath..].to_string(),
        Reference::PathRelative => url[Position::BeforePath..]
            .trim_start_matches('/')
            .to_string(),
    }
}

/// Rewrites the last path segment of `raw` with `rename(stem, extension)`.
///
/// Returns `None` when the URL does not parse, has no path segments, or the
/// last segment has no extension.
fn rewrite_last_segment(raw: &str, rename: impl Fn(&str, &str) -> String) -> Option<String> {
    let (mut url, kind) = parse_reference(raw)?;
    let segment = url.path_segments()?.next_back()?;

    let file = Path::new(segment);
    let stem = file.file_stem()?.to_str()?;
    let extension = file.extension()?.to_str()?;
    let renamed = rename(stem, extension);

    let path = url.path();
    let dir = &path[..=path.rfind('/')?];
    let new_path = format!("{dir}{renamed}");
    url.set_path(&new_path);

    Some(render(&url, kind))
}

/// WebP counterpart of `url`, e.g. `photo.jpg` → `photo.webp`.
///
/// Returns `None` when the last path segment has no extension.
#[must_use]
pub fn webp_url(url: &str) -> Option<String> {
    rewrite_last_segment(url, |stem, _| format!("{stem}.webp"))
}

/// Thumbnail counterpart of `url`, e.g. `photo.jpg` → `photo-thumb.jpg`.
///
/// Returns `None` when the last path segment has no extension.
#[must_use]
pub fn thumbnail_url(url: &str) -> Option<String> {
    rewrite_last_segment(url, |stem, ext| format!("{stem}{THUMBNAIL_SUFFIX}.{ext}"))
}

/// Inline SVG data URI sized like the final image, used when no thumbnail exists.
#[must_use]
pub fn svg_placeholder(width: u32, height: u32) -> String {
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' \
         viewBox='0 0 {width} {height}'><rect width='100%' height='100%' fill='{PLACEHOLDER_FILL}'/></svg>"
    );
    format!(
        "data:image/svg+xml,{}",
        utf8_percent_encode(&svg, NON_ALPHANUMERIC)
    )
}
