/// Typed HTTP client for the taskboard API.
///
/// Holds the session (token pair and default board) obtained at signup or
/// login. When an authorized call comes back 401 the client refreshes the
/// access token once and retries; if that fails too the session is dropped
/// and the caller gets `ClientError::SessionExpired`.

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::ErrorResponse;
use crate::routes::{
    BoardRequest, CreatedBoardResponse, CredentialsRequest, MessageResponse, RefreshRequest,
    RefreshResponse, SessionResponse, TaskRequest, ValidateResponse,
};
use crate::store::{Board, BoardDetail, BoardSummary, Task};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub board_id: Option<Uuid>,
}

#[derive(Debug)]
pub enum ClientError {
    /// Transport failure or undecodable response
    Http(reqwest::Error),
    /// The server answered with an error body
    Api {
        status: u16,
        code: String,
        message: String,
    },
    /// No session; call `signup` or `login` first
    NotAuthenticated,
    /// Refresh failed or the retried request was still unauthorized
    SessionExpired,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Api {
                status,
                code,
                message,
            } => write!(f, "API error {} ({}): {}", status, code, message),
            ClientError::NotAuthenticated => write!(f, "Not logged in"),
            ClientError::SessionExpired => write!(f, "Session expired, please log in again"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    session: Mutex<Option<Session>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: Mutex::new(None),
        }
    }

    /// Resume a previously stored session
    pub fn with_session(self, session: Session) -> Self {
        *self.lock_session() = Some(session);
        self
    }

    pub fn session(&self) -> Option<Session> {
        self.lock_session().clone()
    }

    pub fn logout(&self) {
        *self.lock_session() = None;
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        // The guarded value is plain data, so a poisoned lock is still usable
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<R: DeserializeOwned>(response: Response) -> Result<R, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<R>().await?);
        }

        let body = response.json::<ErrorResponse>().await.ok();
        Err(ClientError::Api {
            status: status.as_u16(),
            code: body
                .as_ref()
                .map(|b| b.code.clone())
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            message: body
                .map(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
        })
    }

    async fn open_session(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let response = self
            .http_client
            .post(self.url(path))
            .json(&CredentialsRequest {
                email: Some(email.to_string()),
                password: Some(password.to_string()),
            })
            .send()
            .await?;
        let body: SessionResponse = Self::parse(response).await?;

        let session = Session {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            board_id: body.board_id,
        };
        *self.lock_session() = Some(session.clone());
        Ok(session)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        self.open_session("/api/auth/signup", email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        self.open_session("/api/auth/login", email, password).await
    }

    /// Exchange the refresh token for a new access token.
    /// A rejected refresh token ends the session.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let refresh_token = self
            .session()
            .map(|s| s.refresh_token)
            .ok_or(ClientError::NotAuthenticated)?;

        let response = self
            .http_client
            .post(self.url("/api/auth/refresh"))
            .json(&RefreshRequest {
                refresh_token: Some(refresh_token),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::info!(status = response.status().as_u16(), "Refresh rejected, ending session");
            self.logout();
            return Err(ClientError::SessionExpired);
        }

        let body: RefreshResponse = response.json().await?;
        if let Some(session) = self.lock_session().as_mut() {
            session.access_token = body.access_token;
        }
        Ok(())
    }

    async fn send_once<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ClientError> {
        let access_token = self
            .session()
            .map(|s| s.access_token)
            .ok_or(ClientError::NotAuthenticated)?;

        let mut request = self
            .http_client
            .request(method, self.url(path))
            .bearer_auth(access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    async fn send_authorized<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ClientError> {
        let response = self.send_once(method.clone(), path, body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(path = path, "Access token rejected, refreshing once");
        self.refresh().await?;

        let retried = self.send_once(method, path, body).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            self.logout();
            return Err(ClientError::SessionExpired);
        }
        Ok(retried)
    }

    async fn call<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, ClientError> {
        let response = self.send_authorized(method, path, body).await?;
        Self::parse(response).await
    }

    pub async fn validate(&self) -> Result<ValidateResponse, ClientError> {
        self.call::<(), _>(Method::GET, "/api/auth/validate", None).await
    }

    pub async fn list_boards(&self) -> Result<Vec<BoardSummary>, ClientError> {
        self.call::<(), _>(Method::GET, "/api/boards", None).await
    }

    pub async fn get_board(&self, board_id: Uuid) -> Result<BoardDetail, ClientError> {
        self.call::<(), _>(Method::GET, &format!("/api/boards/{}", board_id), None)
            .await
    }

    /// Returns the id of the new board
    pub async fn create_board(&self, request: &BoardRequest) -> Result<Uuid, ClientError> {
        let created: CreatedBoardResponse =
            self.call(Method::POST, "/api/boards", Some(request)).await?;
        Ok(created.board_id)
    }

    pub async fn update_board(
        &self,
        board_id: Uuid,
        request: &BoardRequest,
    ) -> Result<Board, ClientError> {
        self.call(Method::PUT, &format!("/api/boards/{}", board_id), Some(request))
            .await
    }

    pub async fn delete_board(&self, board_id: Uuid) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .call::<(), _>(Method::DELETE, &format!("/api/boards/{}", board_id), None)
            .await?;
        Ok(())
    }

    pub async fn create_task(
        &self,
        board_id: Uuid,
        request: &TaskRequest,
    ) -> Result<Task, ClientError> {
        self.call(
            Method::POST,
            &format!("/api/boards/{}/tasks", board_id),
            Some(request),
        )
        .await
    }

    pub async fn update_task(&self, task_id: Uuid, request: &TaskRequest) -> Result<Task, ClientError> {
        self.call(Method::PUT, &format!("/api/tasks/{}", task_id), Some(request))
            .await
    }

    pub async fn delete_task(&self, task_id: Uuid) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .call::<(), _>(Method::DELETE, &format!("/api/tasks/{}", task_id), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            board_id: None,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.url("/api/boards"), "http://localhost:5000/api/boards");
    }

    #[test]
    fn test_session_lifecycle() {
        let client = ApiClient::new("http://localhost:5000").with_session(session());
        assert_eq!(client.session(), Some(session()));

        client.logout();
        assert!(client.session().is_none());
    }

    #[tokio::test]
    async fn test_calls_without_session_fail_fast() {
        let client = ApiClient::new("http://127.0.0.1:9");

        assert!(matches!(
            client.list_boards().await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(client.refresh().await, Err(ClientError::NotAuthenticated)));
    }

    #[test]
    fn test_error_status() {
        let err = ClientError::Api {
            status: 404,
            code: "NOT_FOUND".to_string(),
            message: "Board not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(ClientError::SessionExpired.status(), None);
    }
}
