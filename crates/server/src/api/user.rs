//! Current-user lookup against the ModelScope account API.

use crate::api::{describe_transport_error, unwrap_envelope, USER_AGENT_VALUE};
use crate::settings::{Settings, ENV_API_TOKEN};
use crate::types::UserInfo;
use anyhow::{anyhow, bail, Result};
use reqwest::header::{COOKIE, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;

/// Fetch the profile of the currently authenticated user.
///
/// A missing or rejected token is an expected outcome and produces an
/// unauthenticated [`UserInfo`] without raising; when the token is missing
/// no request is made at all. Any other non-200 status, or a response whose
/// `Success` discriminator is false, is an infrastructure failure and
/// surfaces as an `Err` for the handler's error-translation layer.
pub async fn fetch_current_user(settings: &Settings) -> Result<UserInfo> {
    let Some(token) = settings.api_token() else {
        return Ok(UserInfo::unauthenticated(format!(
            "{ENV_API_TOKEN} is not set"
        )));
    };

    let client = reqwest::Client::new();
    let response = client
        .get(settings.users_login_endpoint())
        .header(COOKIE, format!("m_session_id={token}"))
        .header(USER_AGENT, USER_AGENT_VALUE)
        .timeout(settings.api_timeout)
        .send()
        .await
        .map_err(|e| anyhow!(describe_transport_error(&e)))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Ok(UserInfo::unauthenticated(format!(
            "invalid API token: server returned {}",
            status.as_u16()
        )));
    }
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        bail!(
            "user lookup returned non-200 status: {} {}",
            status.as_u16(),
            body
        );
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| anyhow!(describe_transport_error(&e)))?;
    let data = unwrap_envelope(body)?;

    let field = |key: &str| {
        data.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Ok(UserInfo {
        authenticated: true,
        reason: None,
        username: field("Name"),
        email: field("Email"),
        avatar_url: field("Avatar"),
        // Absent descriptions read as empty, not null, once authenticated.
        description: Some(field("Description").unwrap_or_default()),
    })
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer, token: Option<&str>) -> Settings {
        Settings {
            api_token: token.map(str::to_string),
            api_base_url: server.uri(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn authenticated_user_is_mapped_from_the_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/login/info"))
            .and(header("Cookie", "m_session_id=valid-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Success": true,
                "Data": {
                    "Name": "tester",
                    "Email": "tester@example.com",
                    "Avatar": "https://img.example/avatar.png",
                    "Description": "hello"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = fetch_current_user(&settings_for(&server, Some("valid-token")))
            .await
            .unwrap();

        assert!(user.authenticated);
        assert!(user.reason.is_none());
        assert_eq!(user.username.as_deref(), Some("tester"));
        assert_eq!(user.email.as_deref(), Some("tester@example.com"));
        assert_eq!(
            user.avatar_url.as_deref(),
            Some("https://img.example/avatar.png")
        );
        assert_eq!(user.description.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn absent_description_defaults_to_empty_string() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/login/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Success": true,
                "Data": { "Name": "tester" }
            })))
            .mount(&server)
            .await;

        let user = fetch_current_user(&settings_for(&server, Some("valid-token")))
            .await
            .unwrap();

        assert!(user.authenticated);
        assert_eq!(user.description.as_deref(), Some(""));
        assert!(user.email.is_none());
        assert!(user.avatar_url.is_none());
    }

    #[tokio::test]
    async fn missing_token_short_circuits_without_a_request() {
        let server = MockServer::start().await;

        let user = fetch_current_user(&settings_for(&server, None)).await.unwrap();

        assert!(!user.authenticated);
        assert!(user
            .reason
            .as_deref()
            .unwrap()
            .contains("MODELSCOPE_API_TOKEN is not set"));
        assert!(user.username.is_none());

        let requests = server.received_requests().await.unwrap();
        assert!(requests.is_empty(), "no network call should be made");
    }

    #[tokio::test]
    async fn whitespace_token_counts_as_missing() {
        let server = MockServer::start().await;

        let user = fetch_current_user(&settings_for(&server, Some("   ")))
            .await
            .unwrap();

        assert!(!user.authenticated);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_is_a_soft_result_naming_the_status() {
        for status in [401u16, 403] {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/users/login/info"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let user = fetch_current_user(&settings_for(&server, Some("bad-token")))
                .await
                .unwrap();

            assert!(!user.authenticated);
            let reason = user.reason.unwrap();
            assert!(
                reason.contains(&status.to_string()),
                "reason should cite the status code, got: {reason}"
            );
        }
    }

    #[tokio::test]
    async fn unexpected_status_is_a_hard_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/login/info"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
            .mount(&server)
            .await;

        let err = fetch_current_user(&settings_for(&server, Some("valid-token")))
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("500"), "expected status in error, got: {msg}");
        assert!(msg.contains("backend exploded"));
    }

    #[tokio::test]
    async fn server_reported_failure_is_a_hard_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/login/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Success": false,
                "Message": "session backend unavailable"
            })))
            .mount(&server)
            .await;

        let err = fetch_current_user(&settings_for(&server, Some("valid-token")))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("session backend unavailable"));
    }

    #[tokio::test]
    async fn connection_failure_is_a_hard_error() {
        // Nothing listens on this port.
        let settings = Settings {
            api_token: Some("valid-token".to_string()),
            api_base_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };

        let err = fetch_current_user(&settings).await.unwrap_err();
        assert!(
            err.to_string().contains("connection"),
            "expected a connection error, got: {err}"
        );
    }
}
