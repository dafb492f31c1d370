//! HTTP client for the Bugtrack REST API.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::form::CreateBugForm;
use crate::session::{Session, SessionStore};
use crate::types::{AuthResponse, Bug, BugStatus, Credentials, ErrorBody, Registration, User};

pub const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Client for the bug and auth endpoints.
///
/// The bearer token is read from the [`SessionStore`] on every request.
#[derive(Debug, Clone)]
pub struct BugClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl BugClient {
    pub fn new(base_url: &str, session: SessionStore) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    fn authorized(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// Logs in and stores the resulting session
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let resp = self
            .request(Method::POST, "/api/auth/login")
            .json(&Credentials { email, password })
            .send()
            .await?;

        let auth: AuthResponse = parse(resp).await?;
        Ok(self.store(auth))
    }

    /// Creates an account and stores the resulting session
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<Session> {
        let resp = self
            .request(Method::POST, "/api/auth/register")
            .json(&Registration {
                name,
                email,
                password,
            })
            .send()
            .await?;

        let auth: AuthResponse = parse(resp).await?;
        Ok(self.store(auth))
    }

    pub fn logout(&self) {
        self.session.clear();
    }

    /// Re-validates a saved token. The store is cleared if the server rejects it.
    pub async fn restore(&self, token: &str) -> ClientResult<Session> {
        let resp = self
            .request(Method::GET, "/api/auth/me")
            .bearer_auth(token)
            .send()
            .await;

        let user = match resp {
            Ok(resp) => parse::<User>(resp).await,
            Err(e) => Err(e.into()),
        };

        match user {
            Ok(user) => {
                let session = Session {
                    token: token.to_string(),
                    user,
                };
                self.session.set(session.clone());
                Ok(session)
            }
            Err(e) => {
                self.session.clear();
                Err(e)
            }
        }
    }

    /// Current account of the stored session
    pub async fn me(&self) -> ClientResult<User> {
        let resp = self.authorized(Method::GET, "/api/auth/me")?.send().await?;
        parse(resp).await
    }

    fn store(&self, auth: AuthResponse) -> Session {
        let session = Session {
            token: auth.token,
            user: auth.user,
        };
        self.session.set(session.clone());
        session
    }

    // -------------------------------------------------------------------------
    // Bugs
    // -------------------------------------------------------------------------

    pub async fn fetch_bugs(&self) -> ClientResult<Vec<Bug>> {
        let resp = self.authorized(Method::GET, "/api/bugs")?.send().await?;
        parse(resp).await
    }

    pub async fn fetch_bug(&self, id: Uuid) -> ClientResult<Bug> {
        let resp = self
            .authorized(Method::GET, &format!("/api/bugs/{}", id))?
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn create_bug(&self, form: &CreateBugForm) -> ClientResult<Bug> {
        let resp = self
            .authorized(Method::POST, "/api/bugs")?
            .multipart(form.to_multipart()?)
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn update_status(&self, id: Uuid, status: BugStatus) -> ClientResult<Bug> {
        let resp = self
            .authorized(Method::PATCH, &format!("/api/bugs/{}/status", id))?
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        parse(resp).await
    }

    /// Sets the assignee, or clears it with `None`
    pub async fn assign(&self, id: Uuid, user_id: Option<Uuid>) -> ClientResult<Bug> {
        let resp = self
            .authorized(Method::PATCH, &format!("/api/bugs/{}/assign", id))?
            .json(&serde_json::json!({ "userId": user_id }))
            .send()
            .await?;
        parse(resp).await
    }

    pub async fn delete_bug(&self, id: Uuid) -> ClientResult<()> {
        let resp = self
            .authorized(Method::DELETE, &format!("/api/bugs/{}", id))?
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }

    /// Downloads a stored screenshot by its public path
    pub async fn fetch_screenshot(&self, public_path: &str) -> ClientResult<Vec<u8>> {
        let resp = self.request(Method::GET, public_path).send().await?;
        let resp = check(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Turns a non-success response into [`ClientError::Api`]
async fn check(resp: Response) -> ClientResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &text),
    })
}

async fn parse<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    let resp = check(resp).await?;
    Ok(resp.json().await?)
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}
