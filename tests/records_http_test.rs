//! Document store HTTP client tests
//!
//! Verifies the append request shape (path, API key header, JSON body) and
//! failure surfacing against a wiremock endpoint.

use docdrop::records::http::{DocumentStoreClient, DocumentStoreConfig};
use docdrop::records::{DocumentRecord, DocumentStore, RecordError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, api_key: Option<&str>) -> DocumentStoreClient {
    DocumentStoreClient::new(DocumentStoreConfig {
        endpoint: server.uri(),
        project_id: "demo-app".into(),
        api_key: api_key.map(|s| s.to_string()),
    })
    .unwrap()
}

#[tokio::test]
async fn append_posts_record_json_with_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/demo-app/collections/documents/records"))
        .and(header("x-api-key", "secret"))
        .and(body_partial_json(serde_json::json!({
            "url": "https://store/doc.pdf",
            "name": "doc.pdf"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let record = DocumentRecord::new("https://store/doc.pdf", "doc.pdf");
    client.append("documents", &record).await.unwrap();
}

#[tokio::test]
async fn append_without_api_key_sends_no_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/demo-app/collections/documents/records"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let record = DocumentRecord::new("https://store/notes.txt", "notes.txt");
    client.append("documents", &record).await.unwrap();
}

#[tokio::test]
async fn append_surfaces_rejections_with_body_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("api key revoked"))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("stale"));
    let record = DocumentRecord::new("https://store/doc.pdf", "doc.pdf");

    let err = client.append("documents", &record).await.unwrap_err();
    match err {
        RecordError::Rejected(reason) => {
            assert!(reason.contains("403"));
            assert!(reason.contains("api key revoked"));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn append_reports_unreachable_endpoints_as_request_errors() {
    let client = DocumentStoreClient::new(DocumentStoreConfig {
        endpoint: "http://127.0.0.1:1".into(),
        project_id: "demo-app".into(),
        api_key: None,
    })
    .unwrap();

    let record = DocumentRecord::new("https://store/doc.pdf", "doc.pdf");
    let err = client.append("documents", &record).await.unwrap_err();
    assert!(matches!(err, RecordError::RequestError(_)));
}
