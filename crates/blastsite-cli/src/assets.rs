//! Lazy image preview.

use blastsite_core::AppConfig;
use blastsite_media::{LazyImage, LazyImageSource};

/// Print the sources a lazy image would load and its initial paint.
pub(crate) fn run_image(config: &AppConfig, url: &str, width: u32, height: u32) {
    let source = LazyImageSource::new(url, width, height).with_derived_variants();
    println!("original:    {}", source.original);
    println!("preferred:   {}", source.preferred.as_deref().unwrap_or("-"));
    println!("thumbnail:   {}", source.thumbnail.as_deref().unwrap_or("-"));

    let image = LazyImage::new("preview", source, f64::from(config.lazy_root_margin_px));
    let layers = image.layers();
    println!(
        "placeholder: {} (opacity {}, root margin {}px)",
        layers.placeholder_src, layers.placeholder_opacity, config.lazy_root_margin_px
    );
}
