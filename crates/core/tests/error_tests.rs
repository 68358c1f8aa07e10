// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use serde_json::json;
use wallet_core::errors::{CoreError, HttpFailure};

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn config() {
        let err = CoreError::Config("base_url must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: base_url must not be empty"
        );
    }

    #[test]
    fn storage() {
        let err = CoreError::Storage("permission denied".into());
        assert_eq!(err.to_string(), "Storage error: permission denied");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("key must be a string".into());
        assert_eq!(err.to_string(), "Serialization error: key must be a string");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn http_with_status_text() {
        let err = CoreError::Http(HttpFailure::new(404, json!({})).with_status_text("Not Found"));
        assert_eq!(err.to_string(), "HTTP error: 404 Not Found");
    }

    #[test]
    fn http_without_status_text() {
        let err = CoreError::Http(HttpFailure::new(599, json!({})));
        assert_eq!(err.to_string(), "HTTP error: 599");
    }

    #[test]
    fn payload() {
        let err = CoreError::Payload("missing `accounts` in response".into());
        assert_eq!(
            err.to_string(),
            "Unexpected response payload: missing `accounts` in response"
        );
    }

    #[test]
    fn invalid_token() {
        let err = CoreError::InvalidToken("expiry 0 is not in the future".into());
        assert_eq!(
            err.to_string(),
            "Invalid access token: expiry 0 is not in the future"
        );
    }

    #[test]
    fn missing_parent() {
        let err = CoreError::MissingParent("details".into());
        assert_eq!(err.to_string(), "Resource details requires a parent id");
    }

    #[test]
    fn missing_id() {
        let err = CoreError::MissingId("account".into());
        assert_eq!(err.to_string(), "Resource account has no id");
    }
}

// ── Status accessor ─────────────────────────────────────────────────

mod http_status {
    use super::*;

    #[test]
    fn only_http_failures_have_a_status() {
        assert_eq!(
            CoreError::Http(HttpFailure::new(401, json!({}))).http_status(),
            Some(401)
        );
        assert_eq!(CoreError::Network("x".into()).http_status(), None);
        assert_eq!(CoreError::Payload("x".into()).http_status(), None);
    }

    #[test]
    fn failure_keeps_body() {
        let failure = HttpFailure::new(400, json!({ "errors": { "name": "taken" } }));
        let err: CoreError = failure.clone().into();
        match err {
            CoreError::Http(inner) => assert_eq!(inner, failure),
            other => panic!("Expected Http, got {:?}", other),
        }
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        match &core_err {
            CoreError::Storage(msg) => assert!(msg.contains("file not found")),
            other => panic!("Expected Storage, got {:?}", other),
        }
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Table>("= broken").unwrap_err();
        let core_err: CoreError = toml_err.into();
        assert!(matches!(core_err, CoreError::Config(_)));
    }

    #[tokio::test]
    async fn from_reqwest_error_redacts_query() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reqwest_err = reqwest::Client::new()
            .get(format!("http://{addr}/api/accounts?token=secret"))
            .send()
            .await
            .unwrap_err();
        let core_err: CoreError = reqwest_err.into();
        match core_err {
            CoreError::Network(msg) => assert!(!msg.contains("secret")),
            other => panic!("Expected Network, got {:?}", other),
        }
    }
}

// ── Debug trait ─────────────────────────────────────────────────────

mod debug_trait {
    use super::*;

    #[test]
    fn all_variants_are_debug() {
        let variants: Vec<CoreError> = vec![
            CoreError::Config("test".into()),
            CoreError::Storage("test".into()),
            CoreError::Serialization("test".into()),
            CoreError::Deserialization("test".into()),
            CoreError::Network("test".into()),
            CoreError::Http(HttpFailure::new(500, json!({}))),
            CoreError::Payload("test".into()),
            CoreError::InvalidToken("test".into()),
            CoreError::MissingParent("test".into()),
            CoreError::MissingId("test".into()),
        ];

        for variant in &variants {
            let debug = format!("{:?}", variant);
            assert!(!debug.is_empty());
        }
    }
}
