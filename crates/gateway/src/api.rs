//! REST client for the backend's `/auth/v1` endpoints.
//!
//! Every request carries the configured key in the `apikey` header. Calls
//! made on behalf of a user send that user's access token as the bearer;
//! all others send the key itself.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{
    AuthUser, PasswordGrantBody, RecoverBody, Session, SignUpBody, SignUpMetadata, SignUpResponse,
};

/// Errors from the backend auth API.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the backend's error body.
        message: String,
    },
}

impl GatewayError {
    /// True for 4xx responses, i.e. the backend rejected the caller's input
    /// or credentials rather than failing itself.
    pub fn is_rejection(&self) -> bool {
        matches!(self, GatewayError::Api { status, .. } if (400..500).contains(status))
    }
}

/// HTTP client for the backend auth endpoints, bound to one API key.
#[derive(Clone)]
pub struct AuthApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AuthApi {
    /// * `base_url` - Backend URL, e.g. `https://xyz.supabase.co`.
    /// * `api_key` - Anonymous or service-role key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.base_url)
    }

    /// Resolve the user that owns `access_token`.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, GatewayError> {
        let response = self
            .client
            .get(self.url("/user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Register a new email/password user.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SignUpResponse, GatewayError> {
        let body = SignUpBody {
            email,
            password,
            data: SignUpMetadata {
                full_name: full_name.unwrap_or_default(),
            },
        };
        self.post_json("/signup", &[], &body).await
    }

    /// Exchange email and password for a session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, GatewayError> {
        let body = PasswordGrantBody { email, password };
        self.post_json("/token", &[("grant_type", "password")], &body)
            .await
    }

    /// Revoke the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Send a password-reset email that links back to `redirect_to`.
    pub async fn recover(&self, email: &str, redirect_to: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/recover"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&RecoverBody { email })
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<T, GatewayError> {
        let response = self
            .client
            .post(self.url(path))
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Ensure the response has a success status code, otherwise extract the
    /// backend's error message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Pull a human-readable message out of an auth error body.
///
/// The backend uses several shapes (`msg`, `message`, `error_description`,
/// `error`); the raw body is returned when none match.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_ID: &str = "6f1f8c38-3f2e-4c1e-9a55-8e5b0c1d2a3b";

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": USER_ID,
            "aud": "authenticated",
            "role": "authenticated",
            "email": "dev@example.com",
            "user_metadata": { "full_name": "Dev" },
            "created_at": "2025-01-01T00:00:00Z"
        })
    }

    #[test]
    fn error_message_prefers_msg() {
        assert_eq!(
            extract_error_message(r#"{"code":400,"msg":"User already registered"}"#),
            "User already registered"
        );
    }

    #[test]
    fn error_message_falls_back_to_description() {
        assert_eq!(
            extract_error_message(
                r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
            ),
            "Invalid login credentials"
        );
    }

    #[test]
    fn error_message_returns_raw_non_json() {
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn rejection_covers_only_client_errors() {
        let unauthorized = GatewayError::Api {
            status: 401,
            message: "invalid JWT".into(),
        };
        let unavailable = GatewayError::Api {
            status: 503,
            message: "down".into(),
        };
        assert!(unauthorized.is_rejection());
        assert!(!unavailable.is_rejection());
    }

    #[tokio::test]
    async fn get_user_sends_key_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&server)
            .await;

        let api = AuthApi::new(server.uri(), "service-key");
        let user = api.get_user("user-token").await.unwrap();

        assert_eq!(user.id.to_string(), USER_ID);
        assert_eq!(user.email.as_deref(), Some("dev@example.com"));
    }

    #[tokio::test]
    async fn get_user_surfaces_backend_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "msg": "invalid JWT" })),
            )
            .mount(&server)
            .await;

        let api = AuthApi::new(server.uri(), "service-key");
        let err = api.get_user("expired").await.unwrap_err();

        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid JWT");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_in_uses_password_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(body_json(serde_json::json!({
                "email": "dev@example.com",
                "password": "hunter22"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "rt",
                "user": user_json()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = AuthApi::new(format!("{}/", server.uri()), "anon-key");
        let session = api
            .sign_in_with_password("dev@example.com", "hunter22")
            .await
            .unwrap();

        assert_eq!(session.access_token, "at");
        assert_eq!(session.user.id.to_string(), USER_ID);
    }

    #[tokio::test]
    async fn sign_up_without_confirmation_returns_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(body_json(serde_json::json!({
                "email": "dev@example.com",
                "password": "hunter22",
                "data": { "full_name": "" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&server)
            .await;

        let api = AuthApi::new(server.uri(), "anon-key");
        let response = api.sign_up("dev@example.com", "hunter22", None).await.unwrap();

        assert!(matches!(response, SignUpResponse::User(ref u) if u.id.to_string() == USER_ID));
    }

    #[tokio::test]
    async fn recover_passes_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/recover"))
            .and(query_param("redirect_to", "http://localhost:3000/reset-password"))
            .and(body_json(serde_json::json!({ "email": "dev@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let api = AuthApi::new(server.uri(), "anon-key");
        api.recover("dev@example.com", "http://localhost:3000/reset-password")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sign_out_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let api = AuthApi::new(server.uri(), "anon-key");
        api.sign_out("user-token").await.unwrap();
    }
}
