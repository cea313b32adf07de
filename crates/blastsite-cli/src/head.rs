//! Page head preview.
//!
//! Runs the same pipeline a page load does: resolve metadata, write head tags,
//! apply the heading override, inject structured data. The result is rendered
//! from the in-memory document.

use blastsite_client::{resolve_page_meta, MetadataResolver, MetadataState, SiteApiClient};
use blastsite_core::{AppConfig, SiteProfile};
use blastsite_head::{Document, HeadError, MetadataWriter, StructuredData, StructuredDataInjector};

const STRUCTURED_DATA_PREFIX: &str = "blastsite_ld";

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<SiteApiClient> {
    let client = SiteApiClient::new(
        config.require_api_base_url()?,
        config.api_timeout_secs,
        &config.user_agent,
    )?
    .with_api_key(config.api_key.clone());
    Ok(client)
}

/// Print the rendered head and headings for `path`.
///
/// # Errors
///
/// Returns an error if the site profile cannot be loaded, the client cannot be
/// built, or structured data fails to serialize. A failed lookup is not an
/// error: the page renders from defaults.
pub(crate) async fn run_head(config: &AppConfig, path: &str, offline: bool) -> anyhow::Result<()> {
    let profile = blastsite_core::load_site_profile(&config.site_path)?;

    let state = if offline {
        MetadataState::Loading
    } else {
        let resolver = MetadataResolver::new(build_client(config)?);
        resolver
            .navigate(path)
            .await
            .unwrap_or(MetadataState::Loading)
    };

    let document = render_page(&profile, path, &state)?;
    println!("{}", document.render_head());
    println!("{}", document.render_headings());
    Ok(())
}

/// Builds the document for one page load from resolved lookup state.
pub(crate) fn render_page(
    profile: &SiteProfile,
    path: &str,
    state: &MetadataState,
) -> Result<Document, HeadError> {
    let page = profile.page(path);
    if page.is_none() {
        tracing::debug!(path, "no page config; rendering from site defaults");
    }

    let resolved = resolve_page_meta(state, page, &profile.site, path);

    let mut document = Document::new().with_heading(profile.site.site_name.clone());
    let mut writer = MetadataWriter::new();
    writer.apply(&mut document, &resolved.meta);
    writer.apply_heading(&mut document, resolved.h1.as_deref());

    let mut data = StructuredData::new().with_business(&profile.business)?;
    if let Some(page) = page {
        if page.show_reviews {
            data = data.with_reviews(&profile.business.name, &profile.reviews)?;
        }
        if !page.breadcrumbs.is_empty() {
            data = data.with_breadcrumbs(&profile.site.origin, &page.breadcrumbs);
        }
    }

    let mut injector = StructuredDataInjector::new(STRUCTURED_DATA_PREFIX)?;
    injector.apply(&mut document, &data)?;

    Ok(document)
}
