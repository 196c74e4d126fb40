use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{truncate_body, AppError, AppResult};

use super::endpoint_url;

const SESSION_PATH: &str = "/request/id";

/// A share session issued by the server. One per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub server_version: String,
}

impl Session {
    pub fn share_link(&self, endpoint: &str) -> String {
        endpoint_url(endpoint, &format!("view/{}", self.id))
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: Option<Value>,
    version: Option<Value>,
}

pub struct SessionClient {
    client: Client,
    endpoint: String,
}

impl SessionClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub async fn request_session(&self) -> AppResult<Session> {
        let url = endpoint_url(&self.endpoint, SESSION_PATH);
        log::debug!("Requesting share session from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        log::debug!("Session response {}: {}", status, truncate_body(&body));

        if !status.is_success() {
            return Err(AppError::protocol(
                &url,
                format!("server returned {}: {}", status, truncate_body(&body)),
            ));
        }

        let session = parse_session(&url, &body)?;
        log::info!(
            "Obtained share session {} (server version {})",
            session.id,
            session.server_version
        );
        Ok(session)
    }
}

fn parse_session(url: &str, body: &str) -> AppResult<Session> {
    let parsed: SessionResponse = serde_json::from_str(body)
        .map_err(|e| AppError::protocol(url, format!("invalid session JSON: {}", e)))?;

    let id = parsed
        .id
        .as_ref()
        .and_then(scalar_to_string)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::protocol(url, "session response has no usable 'id'"))?;

    let server_version = match parsed.version.as_ref() {
        None | Some(Value::Null) => String::new(),
        Some(value) => scalar_to_string(value).ok_or_else(|| {
            AppError::protocol(url, "session response has a non-scalar 'version'")
        })?,
    };

    Ok(Session { id, server_version })
}

/// Strings pass through; numbers print without a trailing `.0`.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::uploader::build_http_client;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const URL: &str = "http://easier.cc/request/id";

    #[test]
    fn test_parse_string_fields() {
        let session = parse_session(URL, r#"{"id":"abc123","version":"0.3"}"#).unwrap();
        assert_eq!(session.id, "abc123");
        assert_eq!(session.server_version, "0.3");
    }

    #[test]
    fn test_parse_numeric_fields() {
        let session = parse_session(URL, r#"{"id":42,"version":0.3}"#).unwrap();
        assert_eq!(session.id, "42");
        assert_eq!(session.server_version, "0.3");

        let session = parse_session(URL, r#"{"id":7.0,"version":1}"#).unwrap();
        assert_eq!(session.id, "7");
        assert_eq!(session.server_version, "1");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(matches!(
            parse_session(URL, "<html>oops</html>"),
            Err(AppError::Protocol { .. })
        ));
        assert!(matches!(
            parse_session(URL, r#"{"version":"0.3"}"#),
            Err(AppError::Protocol { .. })
        ));
        assert!(matches!(
            parse_session(URL, r#"{"id":"","version":"0.3"}"#),
            Err(AppError::Protocol { .. })
        ));
        assert!(matches!(
            parse_session(URL, r#"{"id":["a"],"version":"0.3"}"#),
            Err(AppError::Protocol { .. })
        ));
    }

    #[test]
    fn test_missing_version_reads_as_empty() {
        let session = parse_session(URL, r#"{"id":"abc"}"#).unwrap();
        assert_eq!(session.server_version, "");
    }

    #[test]
    fn test_share_link() {
        let session = Session {
            id: "abc123".to_string(),
            server_version: "0.3".to_string(),
        };
        assert_eq!(
            session.share_link("http://easier.cc"),
            "http://easier.cc/view/abc123"
        );
        assert_eq!(
            session.share_link("http://easier.cc/"),
            "http://easier.cc/view/abc123"
        );
    }

    #[tokio::test]
    async fn test_request_session_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/request/id"))
            .and(header("user-agent", "Sketch"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"id":"abc123","version":"0.3"}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = Config::default().with_endpoint(server.uri());
        let client = SessionClient::new(build_http_client(&config).unwrap(), server.uri());

        let session = client.request_session().await.unwrap();
        assert_eq!(session.id, "abc123");
    }

    #[tokio::test]
    async fn test_request_session_server_error_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/request/id"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let config = Config::default();
        let client = SessionClient::new(build_http_client(&config).unwrap(), server.uri());

        let err = client.request_session().await.unwrap_err();
        assert!(matches!(err, AppError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_request_session_unreachable_is_network_error() {
        let config = Config::default();
        let client = SessionClient::new(build_http_client(&config).unwrap(), "http://127.0.0.1:9");

        let err = client.request_session().await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }
}
