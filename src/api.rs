// API client module: a small blocking HTTP client for the SeedDMS REST
// service. Every reply is a JSON envelope `{success, message, data}`,
// sent with 4xx/5xx status codes on failure as well, so bodies are
// decoded regardless of the status.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::FolderId;
use crate::error::{Result, UploadError};
use crate::payload::UploadPayload;

/// Unauthenticated client; the only thing it can do is log in.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Authenticated client. Holds the session cookies handed out by the login
/// call and sends them with every request.
pub struct Session {
    client: Client,
    base_url: String,
    cookies: Option<HeaderValue>,
}

#[derive(Deserialize, Debug)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Outcome of `POST /login`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginResult {
    Success,
    Failure { message: String },
}

/// The parts of a folder record the uploader uses.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FolderInfo {
    pub id: i64,
    pub name: String,
}

/// Outcome of `GET /folder/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub enum FolderResult {
    Found(FolderInfo),
    NotFound { message: String },
}

/// Outcome of `PUT /folder/{id}/document`.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadResult {
    Created { document_id: i64, message: String },
    Failed { message: String },
}

#[derive(Deserialize)]
struct CreatedDocument {
    id: i64,
}

fn decode(url: &str, res: Response) -> Result<Envelope> {
    let status = res.status();
    let body = res.text().map_err(|source| UploadError::Http {
        url: url.to_string(),
        source,
    })?;
    debug!(%url, %status, "reply received");
    serde_json::from_str(&body).map_err(|e| UploadError::BadResponse {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn data_as<T: serde::de::DeserializeOwned>(url: &str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| UploadError::BadResponse {
        url: url.to_string(),
        reason: format!("unexpected data: {}", e),
    })
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build().map_err(|source| UploadError::Http {
            url: base_url.to_string(),
            source,
        })?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send the credentials as form fields `user` and `pass`, returning the
    /// typed reply and the cookies the service set.
    pub fn request_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(LoginResult, Option<HeaderValue>)> {
        let url = format!("{}/login", self.base_url);
        let res = self
            .client
            .post(&url)
            .form(&[("user", username), ("pass", password)])
            .send()
            .map_err(|source| UploadError::Http {
                url: url.clone(),
                source,
            })?;

        let pairs: Vec<String> = res
            .cookies()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect();
        let cookies = if pairs.is_empty() {
            None
        } else {
            HeaderValue::from_str(&pairs.join("; ")).ok()
        };

        let envelope = decode(&url, res)?;
        let result = if envelope.success {
            LoginResult::Success
        } else {
            LoginResult::Failure {
                message: envelope.message.unwrap_or_default(),
            }
        };
        Ok((result, cookies))
    }

    /// Log in and turn the client into a `Session`.
    pub fn login(self, username: &str, password: &str) -> Result<Session> {
        let (result, cookies) = self.request_login(username, password)?;
        match result {
            LoginResult::Success => {
                info!(user = username, "logged in");
                Ok(Session {
                    client: self.client,
                    base_url: self.base_url,
                    cookies,
                })
            }
            LoginResult::Failure { message } => Err(UploadError::AuthFailed(message)),
        }
    }
}

impl Session {
    fn session_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(cookies) = &self.cookies {
            headers.insert(COOKIE, cookies.clone());
        }
        headers
    }

    /// Look up a folder by id or name.
    pub fn folder(&self, id: &FolderId) -> Result<FolderResult> {
        let url = format!("{}/folder/{}", self.base_url, id);
        let res = self
            .client
            .get(&url)
            .headers(self.session_headers())
            .send()
            .map_err(|source| UploadError::Http {
                url: url.clone(),
                source,
            })?;
        let envelope = decode(&url, res)?;
        if envelope.success {
            Ok(FolderResult::Found(data_as(&url, envelope.data)?))
        } else {
            Ok(FolderResult::NotFound {
                message: envelope.message.unwrap_or_default(),
            })
        }
    }

    /// Create a new document in `folder_id` with the payload as its content.
    pub fn upload_document(&self, folder_id: i64, payload: &UploadPayload) -> Result<UploadResult> {
        let url = format!("{}/folder/{}/document", self.base_url, folder_id);
        let mut query = vec![
            ("name", payload.document_name.as_str()),
            ("origfilename", payload.original_filename.as_str()),
        ];
        if let Some(comment) = &payload.comment {
            query.push(("comment", comment.as_str()));
        }

        debug!(%url, bytes = payload.body.len(), name = %payload.document_name, "uploading");
        let res = self
            .client
            .put(&url)
            .headers(self.session_headers())
            .query(&query)
            .body(payload.body.clone())
            .send()
            .map_err(|source| UploadError::Http {
                url: url.clone(),
                source,
            })?;
        let envelope = decode(&url, res)?;
        if envelope.success {
            let created: CreatedDocument = data_as(&url, envelope.data)?;
            Ok(UploadResult::Created {
                document_id: created.id,
                message: envelope.message.unwrap_or_default(),
            })
        } else {
            Ok(UploadResult::Failed {
                message: envelope.message.unwrap_or_default(),
            })
        }
    }
}
