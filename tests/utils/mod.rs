#![allow(dead_code)]

pub use seeddms_upload::ui::testing::ScriptedPrompter;

use seeddms_upload::config::{FolderId, ServerProfile};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn profile(base_url: &str, folders: Vec<FolderId>) -> ServerProfile {
    ServerProfile {
        name: "test".to_string(),
        base_url: base_url.to_string(),
        username: "admin".to_string(),
        password: Some("admin".to_string()),
        target_folders: folders,
    }
}

pub fn ok_reply(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "", "data": data}))
}

pub fn failed_reply(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_json(json!({"success": false, "message": message, "data": ""}))
}

pub fn folder_reply(id: i64, name: &str) -> ResponseTemplate {
    ok_reply(json!({
        "type": "folder",
        "id": id,
        "name": name,
        "comment": "",
        "date": "2024-01-01 10:00:00",
        "owner": 1
    }))
}

/// Accept any login and hand out a session cookie.
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ok_reply(json!({"type": "user", "id": 1, "login": "admin"}))
                .insert_header("set-cookie", "mydms_session=abc123; path=/"),
        )
        .mount(server)
        .await;
}

/// Run blocking client code off the async runtime.
pub async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

pub fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

pub const REPORT_EMAIL: &str = "Date: Mon, 1 Jan 2024 10:00:00 +0000\r\n\
Subject: Test Report\r\n\
Message-ID: <abc@x>\r\n\
From: A <a@x>\r\n\
\r\n\
Numbers are up.\r\n";
