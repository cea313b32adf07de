//! Integration tests for `SiteApiClient` using wiremock HTTP mocks.

use std::sync::Arc;

use blastsite_client::{
    CallButton, CallContext, CallLogEntry, ClientError, MetadataResolver, MetadataState,
    SiteApiClient,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SiteApiClient {
    SiteApiClient::new(base_url, 5, "blastsite-test/0.1")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn get_page_metadata_returns_override() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page-metadata"))
        .and(query_param("path", "/services/concrete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metaTitle": "Concrete Shot Blasting",
            "metaDescription": "Floor prep for coatings",
            "h1": null
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let record = client
        .get_page_metadata("/services/concrete")
        .await
        .expect("lookup should succeed")
        .expect("record should be present");

    assert_eq!(record.meta_title.as_deref(), Some("Concrete Shot Blasting"));
    assert_eq!(
        record.meta_description.as_deref(),
        Some("Floor prep for coatings")
    );
    assert!(record.h1.is_none());
}

#[tokio::test]
async fn get_page_metadata_treats_404_as_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page-metadata"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let record = client.get_page_metadata("/missing").await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn get_page_metadata_treats_null_body_as_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page-metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.get_page_metadata("/").await.unwrap().is_none());
}

#[tokio::test]
async fn get_page_metadata_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page-metadata"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_page_metadata("/").await.unwrap_err();
    assert!(
        matches!(err, ClientError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn get_page_metadata_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page-metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_page_metadata("/").await.unwrap_err();
    assert!(matches!(err, ClientError::Deserialize { .. }));
}

#[tokio::test]
async fn api_key_is_sent_as_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page-metadata"))
        .and(header("authorization", "Bearer site-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "h1": "Keyed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_api_key(Some("site-key".to_string()));
    let record = client.get_page_metadata("/").await.unwrap().unwrap();
    assert_eq!(record.h1.as_deref(), Some("Keyed"));
}

#[tokio::test]
async fn resolver_falls_back_when_server_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page-metadata"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let resolver = MetadataResolver::new(test_client(&server.uri()));
    let state = resolver.navigate("/about").await.unwrap();
    assert_eq!(state, MetadataState::Resolved(None));
}

#[tokio::test]
async fn call_button_posts_log_entry() {
    let server = MockServer::start().await;

    let expected = CallLogEntry {
        location: "header".to_string(),
        phone_number: "(555) 010-2030".to_string(),
        user_agent: "Mozilla/5.0".to_string(),
        referrer: "https://www.bing.com/".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/call-logs"))
        .and(body_json(serde_json::json!({
            "location": "header",
            "phoneNumber": "(555) 010-2030",
            "userAgent": "Mozilla/5.0",
            "referrer": "https://www.bing.com/"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let button = CallButton::new(
        Arc::new(test_client(&server.uri())),
        expected.phone_number.clone(),
        expected.location.clone(),
    );
    let (action, handle) = button.click(CallContext {
        user_agent: expected.user_agent.clone(),
        referrer: expected.referrer.clone(),
    });
    handle.await.unwrap();

    assert_eq!(action.href, "tel:+15550102030");
}

#[tokio::test]
async fn call_button_dials_even_when_logging_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/call-logs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let button = CallButton::new(
        Arc::new(test_client(&server.uri())),
        "(555) 010-2030",
        "footer",
    );
    let (action, handle) = button.click(CallContext::default());
    handle.await.unwrap();

    assert_eq!(action.href, "tel:+15550102030");
}
