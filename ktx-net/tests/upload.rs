use std::fs;

use ktx_common::config::{Config, RawInputs};
use ktx_common::{CiEnvironment, KtxError};
use ktx_net::{ArtifactUploader, KetryxClient};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> KetryxClient {
    let raw = RawInputs {
        ketryx_url: Some(server.uri()),
        project: Some("KXPRJ".to_string()),
        api_key: Some("KXTK_123".to_string()),
        ..RawInputs::default()
    };
    let config = Config::from_inputs(raw, &CiEnvironment::default()).unwrap();
    KetryxClient::new(&config).unwrap()
}

#[tokio::test]
async fn uploads_file_as_multipart_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/build-artifacts"))
        .and(query_param("project", "KXPRJ"))
        .and(header("authorization", "Bearer KXTK_123"))
        .and(body_string_contains("name=\"file\"; filename=\"a.cucumber.json\""))
        .and(body_string_contains("application/json"))
        .and(body_string_contains("[{\"feature\":1}]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ID1" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.cucumber.json");
    fs::write(&file, "[{\"feature\":1}]").unwrap();

    let id = client(&server)
        .upload(&file, "application/json")
        .await
        .unwrap();
    assert_eq!(id, "ID1");
}

#[tokio::test]
async fn non_200_is_fatal_and_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/build-artifacts"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("report.bin");
    fs::write(&file, [0u8, 1, 2]).unwrap();

    let err = client(&server)
        .upload(&file, "application/octet-stream")
        .await
        .unwrap_err();
    match err {
        KtxError::Upload { url, status, .. } => {
            assert!(url.ends_with("/api/v1/build-artifacts?project=KXPRJ"));
            assert_eq!(status, Some(403));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn success_without_string_id_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 17 })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("report.bin");
    fs::write(&file, "x").unwrap();

    let err = client(&server)
        .upload(&file, "application/octet-stream")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unexpected response data"));
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ID1" })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .upload(&dir.path().join("nope.bin"), "application/octet-stream")
        .await
        .unwrap_err();
    assert!(matches!(err, KtxError::IoError(_)));
}
