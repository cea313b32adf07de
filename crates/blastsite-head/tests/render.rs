//! End-to-end head rendering: metadata and structured data written through
//! the in-memory document, then read back out of the rendered HTML.

use blastsite_core::{BreadcrumbItem, Review};
use blastsite_head::{
    Document, MetaKey, MetadataSink, MetadataWriter, PageMeta, StructuredData,
    StructuredDataInjector,
};
use chrono::NaiveDate;
use regex::Regex;

fn page_meta(title: &str) -> PageMeta {
    PageMeta {
        title: title.to_string(),
        description: "Shot blasting for warehouse floors.".to_string(),
        image: "https://cdn.example/og.jpg".to_string(),
        og_type: "website".to_string(),
        url: "https://www.example.com/services/concrete".to_string(),
        site_name: "Precision Blast Co.".to_string(),
        twitter_card: "summary_large_image".to_string(),
    }
}

fn jsonld_blocks(html: &str) -> Vec<(String, serde_json::Value)> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*id="([^"]+)"[^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");

    script_re
        .captures_iter(html)
        .map(|cap| {
            let id = cap[1].to_string();
            let body = cap[2].replace("<\\/", "</");
            let value = serde_json::from_str(&body).expect("script body is valid JSON");
            (id, value)
        })
        .collect()
}

#[test]
fn rendered_head_contains_parseable_structured_data() {
    let mut doc = Document::new().with_heading("Concrete Prep");
    let mut writer = MetadataWriter::new();
    writer.apply(&mut doc, &page_meta("Concrete Shot Blasting"));
    writer.apply_heading(&mut doc, Some("Concrete Shot Blasting in Dayton"));

    let reviews = vec![Review {
        author: "Lee".to_string(),
        rating: 5,
        text: "Closing tag </script> in text is harmless".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
    }];
    let crumbs = vec![
        BreadcrumbItem::new("Home", "/"),
        BreadcrumbItem::new("Concrete", "/services/concrete").current(),
    ];
    let data = StructuredData::new()
        .with_reviews("Precision Blast Co.", &reviews)
        .unwrap()
        .with_breadcrumbs("https://www.example.com", &crumbs);

    let mut injector = StructuredDataInjector::new("seo").unwrap();
    injector.apply(&mut doc, &data).unwrap();

    let html = doc.render_head();
    let blocks = jsonld_blocks(&html);
    let ids: Vec<&str> = blocks.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["seo-aggregate-rating", "seo-review-0", "seo-breadcrumb"]);

    let review = &blocks[1].1;
    assert_eq!(
        review["reviewBody"],
        "Closing tag </script> in text is harmless"
    );
    assert_eq!(
        blocks[2].1["itemListElement"][1]["item"],
        "https://www.example.com/services/concrete"
    );
    assert!(doc.render_headings().contains("Concrete Shot Blasting in Dayton"));
}

#[test]
fn navigation_rewrites_tags_without_duplicates() {
    let mut doc = Document::new();
    let writer = MetadataWriter::new();
    writer.apply(&mut doc, &page_meta("Home"));
    writer.apply(&mut doc, &page_meta("Services"));

    let html = doc.render_head();
    assert_eq!(html.matches("property=\"og:title\"").count(), 1);
    assert_eq!(html.matches("<title>").count(), 1);
    assert_eq!(doc.meta(&MetaKey::name("twitter:title")), Some("Services"));
}

#[test]
fn unrelated_head_content_survives_writes() {
    let mut doc = Document::new();
    doc.upsert_meta(&MetaKey::name("viewport"), "width=device-width");
    let writer = MetadataWriter::new();
    writer.apply(&mut doc, &page_meta("Home"));

    let mut injector = StructuredDataInjector::new("seo").unwrap();
    injector
        .apply(
            &mut doc,
            &StructuredData::new().with_breadcrumbs("https://www.example.com", &[BreadcrumbItem::new("Home", "/")]),
        )
        .unwrap();
    injector.unmount(&mut doc);

    assert_eq!(
        doc.meta(&MetaKey::name("viewport")),
        Some("width=device-width")
    );
    assert_eq!(doc.script_ids().count(), 0);
}
