//! schema.org JSON-LD document builders.
//!
//! Each builder returns a `serde_json::Value` ready to be embedded in a
//! `<script type="application/ld+json">` element. Text fields pass through
//! untouched; only JSON string escaping applies.

use blastsite_core::{BreadcrumbItem, BusinessProfile, Review};
use serde::Serialize;
use serde_json::Value;

use crate::error::HeadError;

const SCHEMA_CONTEXT: &str = "https://schema.org";

const BEST_RATING: u8 = 5;
const WORST_RATING: u8 = 1;

/// Aggregate of a review list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateRating {
    /// Mean rating rounded to one decimal place.
    pub rating_value: f64,
    pub review_count: usize,
}

/// Computes the aggregate rating of `reviews`, or `None` for an empty list.
#[must_use]
pub fn aggregate_rating(reviews: &[Review]) -> Option<AggregateRating> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = f64::from(sum) / reviews.len() as f64;
    Some(AggregateRating {
        rating_value: (mean * 10.0).round() / 10.0,
        review_count: reviews.len(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocalBusinessLd<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
    description: &'a str,
    telephone: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price_range: Option<&'a str>,
    address: PostalAddressLd<'a>,
    geo: GeoLd,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    area_served: Vec<PlaceLd<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    opening_hours: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_offer_catalog: Option<OfferCatalogLd<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostalAddressLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    street_address: &'a str,
    address_locality: &'a str,
    address_region: &'a str,
    postal_code: &'a str,
    address_country: &'a str,
}

#[derive(Serialize)]
struct GeoLd {
    #[serde(rename = "@type")]
    kind: &'static str,
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize)]
struct PlaceLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OfferCatalogLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    name: String,
    item_list_element: Vec<OfferLd<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OfferLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    item_offered: ServiceLd<'a>,
}

#[derive(Serialize)]
struct ServiceLd<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
    description: &'a str,
}

fn to_value<T: Serialize>(doc: &T, context: &str) -> Result<Value, HeadError> {
    serde_json::to_value(doc).map_err(|e| HeadError::Serialize {
        context: context.to_owned(),
        source: e,
    })
}

/// `LocalBusiness` profile with address, coordinates, service area and offer catalog.
///
/// # Errors
///
/// Returns [`HeadError::Serialize`] if the document cannot be converted to JSON.
pub fn local_business(business: &BusinessProfile) -> Result<Value, HeadError> {
    let area_served = business
        .service_area
        .places
        .iter()
        .map(|name| PlaceLd { kind: "Place", name })
        .collect();

    let has_offer_catalog = (!business.services.is_empty()).then(|| OfferCatalogLd {
        kind: "OfferCatalog",
        name: format!("{} Services", business.name),
        item_list_element: business
            .services
            .iter()
            .map(|service| OfferLd {
                kind: "Offer",
                item_offered: ServiceLd {
                    kind: "Service",
                    name: &service.name,
                    description: &service.description,
                },
            })
            .collect(),
    });

    let doc = LocalBusinessLd {
        context: SCHEMA_CONTEXT,
        kind: "LocalBusiness",
        name: &business.name,
        description: &business.description,
        telephone: &business.telephone,
        url: &business.url,
        email: business.email.as_deref(),
        image: business.image.as_deref(),
        price_range: business.price_range.as_deref(),
        address: PostalAddressLd {
            kind: "PostalAddress",
            street_address: &business.address.street,
            address_locality: &business.address.locality,
            address_region: &business.address.region,
            postal_code: &business.address.postal_code,
            address_country: &business.address.country,
        },
        geo: GeoLd {
            kind: "GeoCoordinates",
            latitude: business.service_area.center.latitude,
            longitude: business.service_area.center.longitude,
        },
        area_served,
        opening_hours: business.opening_hours.iter().map(String::as_str).collect(),
        has_offer_catalog,
    };
    to_value(&doc, "LocalBusiness")
}

/// `LocalBusiness` stub carrying only the aggregate rating of `reviews`.
///
/// Returns `Ok(None)` when there are no reviews to aggregate.
///
/// # Errors
///
/// Returns [`HeadError::Serialize`] if the document cannot be converted to JSON.
pub fn aggregate_rating_block(
    business_name: &str,
    reviews: &[Review],
) -> Result<Option<Value>, HeadError> {
    let Some(aggregate) = aggregate_rating(reviews) else {
        return Ok(None);
    };
    Ok(Some(serde_json::json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "LocalBusiness",
        "name": business_name,
        "aggregateRating": {
            "@type": "AggregateRating",
            "ratingValue": aggregate.rating_value,
            "reviewCount": aggregate.review_count,
            "bestRating": BEST_RATING,
            "worstRating": WORST_RATING,
        },
    })))
}

/// A single `Review` of the business.
#[must_use]
pub fn review(business_name: &str, review: &Review) -> Value {
    serde_json::json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "Review",
        "itemReviewed": {
            "@type": "LocalBusiness",
            "name": business_name,
        },
        "author": {
            "@type": "Person",
            "name": review.author,
        },
        "reviewRating": {
            "@type": "Rating",
            "ratingValue": review.rating,
            "bestRating": BEST_RATING,
            "worstRating": WORST_RATING,
        },
        "reviewBody": review.text,
        "datePublished": review.date.format("%Y-%m-%d").to_string(),
    })
}

/// `BreadcrumbList` whose item URLs are `origin + href` and positions start at 1.
#[must_use]
pub fn breadcrumb_list(origin: &str, items: &[BreadcrumbItem]) -> Value {
    let origin = origin.trim_end_matches('/');
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": item.label,
                "item": format!("{origin}{}", item.href),
            })
        })
        .collect();

    serde_json::json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

#[cfg(test)]
mod tests {
    use blastsite_core::{GeoPoint, PostalAddress, ServiceArea, ServiceOffering};
    use chrono::NaiveDate;

    use super::*;

    fn review_with(rating: u8) -> Review {
        Review {
            author: "Pat".to_string(),
            rating,
            text: "Solid work".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        }
    }

    fn business() -> BusinessProfile {
        BusinessProfile {
            name: "Precision Blast Co.".to_string(),
            description: "Shot blasting & surface prep".to_string(),
            telephone: "+1-555-010-2030".to_string(),
            url: "https://www.example.com".to_string(),
            email: None,
            image: Some("https://cdn.example/logo.png".to_string()),
            price_range: Some("$$".to_string()),
            address: PostalAddress {
                street: "100 Foundry Rd".to_string(),
                locality: "Dayton".to_string(),
                region: "OH".to_string(),
                postal_code: "45402".to_string(),
                country: "US".to_string(),
            },
            service_area: ServiceArea {
                center: GeoPoint {
                    latitude: 39.7589,
                    longitude: -84.1916,
                },
                radius_miles: 75.0,
                places: vec!["Dayton".to_string(), "Columbus".to_string()],
            },
            opening_hours: vec!["Mo-Fr 07:00-17:00".to_string()],
            services: vec![ServiceOffering {
                name: "Concrete Shot Blasting".to_string(),
                description: "Profiles concrete for coatings.".to_string(),
            }],
        }
    }

    #[test]
    fn aggregate_rating_rounds_mean_to_one_decimal() {
        let reviews: Vec<Review> = [5, 5, 5, 4].into_iter().map(review_with).collect();
        let aggregate = aggregate_rating(&reviews).unwrap();
        assert!((aggregate.rating_value - 4.8).abs() < f64::EPSILON);
        assert_eq!(aggregate.review_count, 4);
    }

    #[test]
    fn aggregate_rating_of_repeating_mean() {
        let reviews: Vec<Review> = [5, 5, 4].into_iter().map(review_with).collect();
        let aggregate = aggregate_rating(&reviews).unwrap();
        assert!((aggregate.rating_value - 4.7).abs() < 1e-9);
        assert_eq!(aggregate.review_count, 3);
    }

    #[test]
    fn aggregate_rating_of_empty_list_is_none() {
        assert!(aggregate_rating(&[]).is_none());
        assert!(aggregate_rating_block("Biz", &[]).unwrap().is_none());
    }

    #[test]
    fn aggregate_block_carries_count_and_value() {
        let reviews: Vec<Review> = [5, 5, 5, 4].into_iter().map(review_with).collect();
        let block = aggregate_rating_block("Biz", &reviews).unwrap().unwrap();
        assert_eq!(block["aggregateRating"]["ratingValue"], 4.8);
        assert_eq!(block["aggregateRating"]["reviewCount"], 4);
        assert_eq!(block["@type"], "LocalBusiness");
    }

    #[test]
    fn breadcrumb_positions_and_urls() {
        let items = vec![
            BreadcrumbItem::new("Home", "/"),
            BreadcrumbItem::new("Services", "/services"),
            BreadcrumbItem::new("Concrete", "/services/concrete").current(),
        ];
        let doc = breadcrumb_list("https://www.example.com/", &items);
        let elements = doc["itemListElement"].as_array().unwrap();
        assert_eq!(elements.len(), 3);
        for (i, element) in elements.iter().enumerate() {
            assert_eq!(element["position"], i + 1);
            assert_eq!(
                element["item"],
                format!("https://www.example.com{}", items[i].href)
            );
        }
    }

    #[test]
    fn local_business_includes_offer_catalog() {
        let doc = local_business(&business()).unwrap();
        assert_eq!(doc["@type"], "LocalBusiness");
        assert_eq!(doc["address"]["addressLocality"], "Dayton");
        assert_eq!(doc["geo"]["@type"], "GeoCoordinates");
        assert_eq!(doc["priceRange"], "$$");
        assert!(doc.get("email").is_none());
        let offers = doc["hasOfferCatalog"]["itemListElement"].as_array().unwrap();
        assert_eq!(offers[0]["@type"], "Offer");
        assert_eq!(offers[0]["itemOffered"]["name"], "Concrete Shot Blasting");
        assert_eq!(doc["areaServed"][1]["name"], "Columbus");
    }

    #[test]
    fn local_business_without_services_omits_catalog() {
        let mut profile = business();
        profile.services.clear();
        let doc = local_business(&profile).unwrap();
        assert!(doc.get("hasOfferCatalog").is_none());
    }

    #[test]
    fn review_passes_text_through() {
        let mut r = review_with(4);
        r.text = "They said \"wow\" & left".to_string();
        let doc = review("Biz", &r);
        assert_eq!(doc["reviewBody"], "They said \"wow\" & left");
        assert_eq!(doc["datePublished"], "2024-01-02");
        assert_eq!(doc["reviewRating"]["ratingValue"], 4);
    }
}
