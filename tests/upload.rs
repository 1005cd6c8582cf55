//! End-to-end upload pipeline against a mock platform.

use std::io::Write;
use std::path::Path;

use aparat_client::api::endpoints::{
    CHUNKS_DONE, CHUNK_PROBE, CHUNK_UPLOAD, FILE_DONE, MY_VIDEOS, UPLOAD_FINALIZE, UPLOAD_SLOT,
    USER_INFORMATION,
};
use aparat_client::{
    AparatClient, ClientOptions, CommentPolicy, Error, VideoCategory, VideoMetadataDraft,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// MP4 `ftyp` box header followed by filler.
const MP4_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isomfiller-bytes";

fn client(server: &MockServer, dir: &Path) -> AparatClient {
    AparatClient::new(ClientOptions {
        base_url: server.uri(),
        upload_base_url: server.uri(),
        session_dir: dir.to_path_buf(),
        ..Default::default()
    })
    .unwrap()
}

fn video_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("holiday.mp4");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(MP4_BYTES).unwrap();
    path
}

async fn logged_in(server: &MockServer, dir: &Path) -> AparatClient {
    Mock::given(method("GET"))
        .and(path(USER_INFORMATION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "1", "type": "Profile", "attributes": {"username": "alice", "has_email": false}}
        })))
        .mount(server)
        .await;

    let mut client = client(server, dir);
    assert!(client.load_auth_v1("bearer-token").await.unwrap());
    client
}

async fn mount_slot_and_probe(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(UPLOAD_SLOT))
        .and(body_partial_json(json!({"uploadIds": [0], "upload_cnt": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "0", "type": "upload", "attributes": {"token": "up-token", "uploadId": 5150}}]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .and(path_regex(format!("^{}/[0-9a-f-]{{36}}$", CHUNK_PROBE)))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

fn draft() -> VideoMetadataDraft {
    VideoMetadataDraft::new("Holiday", VideoCategory::TravelTourism)
        .description("Sea and sun")
        .tags(["sea", "sun"])
        .comment(CommentPolicy::Approve)
}

#[tokio::test]
async fn test_upload_happy_path() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let video = video_file(&dir);
    let client = logged_in(&server, dir.path()).await;

    mount_slot_and_probe(&server).await;
    Mock::given(method("POST"))
        .and(path(CHUNK_UPLOAD))
        .and(header("x-token", "up-token"))
        .and(body_string_contains("name=\"qqfile\""))
        .and(body_string_contains("name=\"qqtotalparts\""))
        .and(body_string_contains("video/mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(format!("^{}/[0-9a-f-]{{36}}$", FILE_DONE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHUNKS_DONE))
        .and(header("x-token", "up-token"))
        .and(body_string_contains("qqfilename=holiday.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}/5150", UPLOAD_FINALIZE)))
        .and(body_partial_json(json!({
            "uploadId": 5150,
            "title": "Holiday",
            "descr": "Sea and sun",
            "tags": "sea-sun",
            "category": 13,
            "comment": "approve",
            "watermark": "1",
            "thumbnail": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 777, "type": "video"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(MY_VIDEOS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "included": [
                {"id": "776", "type": "Video", "attributes": {"uid": "old"}},
                {"id": "777", "type": "Video", "attributes": {"uid": "fresh", "title": "Holiday"}}
            ]
        })))
        .mount(&server)
        .await;

    let uploaded = client.upload_video(&video, &draft()).await.unwrap();

    assert_eq!(uploaded.id.as_deref(), Some("777"));
    assert_eq!(uploaded.attributes.uid.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_upload_rejected_chunk_is_reported() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let video = video_file(&dir);
    let client = logged_in(&server, dir.path()).await;

    mount_slot_and_probe(&server).await;
    Mock::given(method("POST"))
        .and(path(CHUNK_UPLOAD))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false, "error": "quota"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHUNKS_DONE))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.upload_video(&video, &draft()).await;

    match result {
        Err(Error::Validation(payload)) => assert_eq!(payload["error"], "quota"),
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_finalize_without_id() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let video = video_file(&dir);
    let client = logged_in(&server, dir.path()).await;

    mount_slot_and_probe(&server).await;
    for endpoint in [CHUNK_UPLOAD, CHUNKS_DONE] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path_regex(format!("^{}/", FILE_DONE)))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}/5150", UPLOAD_FINALIZE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "error", "attributes": {"text": "title too long"}}
        })))
        .mount(&server)
        .await;

    let result = client.upload_video(&video, &draft()).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_missing_files() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = logged_in(&server, dir.path()).await;

    let missing = dir.path().join("nope.mp4");
    assert!(matches!(
        client.upload_video(&missing, &draft()).await,
        Err(Error::FileNotFound(p)) if p == missing
    ));

    let video = video_file(&dir);
    let with_thumb = draft().thumbnail(dir.path().join("thumb.jpg"));
    assert!(matches!(
        client.upload_video(&video, &with_thumb).await,
        Err(Error::FileNotFound(_))
    ));
}

#[tokio::test]
async fn test_upload_requires_login() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let video = video_file(&dir);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server, dir.path());
    assert!(matches!(
        client.upload_video(&video, &draft()).await,
        Err(Error::LoginRequired)
    ));
}
