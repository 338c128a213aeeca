//! Protocol behavior seen from both parties of an exchange.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use apisign_auth::v1::SIGNATURE_HEADER;
    use apisign_auth::{
        ProtocolRegistry, SignRequest, SignatureClient, SignatureError, SignatureKey,
        SignatureProtocol, Timestamp, V1,
    };
    use apisign_core::SignerConfig;

    use crate::{BASE_URL, SHARED_KEY, client};

    const URL: &str = "https://api.example.com/v1/items?foo=bar";

    fn fixed() -> Timestamp {
        Timestamp::new("1700000000")
    }

    #[test]
    fn test_should_sign_concrete_request_deterministically() {
        let caller = client(SHARED_KEY);
        let server = client(SHARED_KEY);
        let ts = fixed();

        let first = caller
            .sign_request(URL, &[], b"", Some("GET"), Some(&ts))
            .unwrap();
        let second = server
            .sign_request(URL, &[], b"", Some("GET"), Some(&ts))
            .unwrap();
        assert_eq!(first[SIGNATURE_HEADER], second[SIGNATURE_HEADER]);

        let reply = server.sign_response(b"", &ts).unwrap();
        assert!(caller.validate_response(reply.as_str(), b"", Some(&ts)));
        assert!(!caller.validate_response(reply.as_str(), b"different-body", Some(&ts)));
    }

    #[test]
    fn test_should_agree_on_explicit_param_precedence() {
        let caller = client(SHARED_KEY);
        let server = client(SHARED_KEY);
        let ts = fixed();

        let with_override = caller
            .sign_request(
                "https://api.example.com/v1/items?a=1&b=2",
                &[("a", "2")],
                b"",
                None,
                Some(&ts),
            )
            .unwrap();
        let as_received = server
            .sign_request("/v1/items?b=2&a=2", &[], b"", None, Some(&ts))
            .unwrap();
        assert_eq!(with_override, as_received);
    }

    #[test]
    fn test_should_resolve_relative_urls_against_base() {
        let caller = client(SHARED_KEY);
        let ts = fixed();

        let relative = caller
            .sign_request("items?foo=bar", &[], b"", None, Some(&ts))
            .unwrap();
        let absolute = caller.sign_request(URL, &[], b"", None, Some(&ts)).unwrap();
        assert_eq!(relative, absolute);

        let unbased = SignatureClient::new(SHARED_KEY, None, "v1").unwrap();
        assert!(matches!(
            unbased.sign_request("items", &[], b"", None, Some(&ts)),
            Err(SignatureError::MissingBaseUrl(_))
        ));
    }

    #[test]
    fn test_should_sign_urls_carrying_urls_in_query() {
        let caller = client(SHARED_KEY);
        let ts = fixed();
        let query = "?next=https://example.com/x";

        let absolute = caller
            .sign_request(&format!("{BASE_URL}/callback{query}"), &[], b"", None, Some(&ts))
            .unwrap();
        let origin = caller
            .sign_request(&format!("/v1/callback{query}"), &[], b"", None, Some(&ts))
            .unwrap();
        let relative = caller
            .sign_request(&format!("callback{query}"), &[], b"", None, Some(&ts))
            .unwrap();
        assert_eq!(absolute, origin);
        assert_eq!(absolute, relative);
    }

    #[test]
    fn test_should_not_confuse_invalid_utf8_with_replacement_character() {
        let caller = client(SHARED_KEY);
        let ts = fixed();
        let sign = |url: &str| {
            caller
                .sign_request(url, &[], b"", None, Some(&ts))
                .unwrap()
        };
        assert_ne!(sign("/v1/files/%FF"), sign("/v1/files/%EF%BF%BD"));
        assert_ne!(sign("/v1/files?k=%FE"), sign("/v1/files?k=%EF%BF%BD"));
    }

    #[test]
    fn test_should_bind_signature_to_method_and_body() {
        let caller = client(SHARED_KEY);
        let ts = fixed();
        let sign = |method: &str, body: &[u8]| {
            caller
                .sign(
                    &SignRequest::builder()
                        .url(URL)
                        .body(body)
                        .method(method)
                        .timestamp(&ts)
                        .build(),
                )
                .unwrap()
        };

        let base = sign("GET", b"");
        assert_eq!(base, sign("get", b""));
        assert_ne!(base, sign("POST", b""));
        assert_ne!(base, sign("GET", b"x"));
    }

    #[test]
    fn test_should_reject_reply_without_usable_timestamp() {
        let server = client(SHARED_KEY);
        let caller = client(SHARED_KEY);
        let ts = fixed();
        let reply = server.sign_response(b"{}", &ts).unwrap();

        assert!(!caller.validate_response(reply.as_str(), b"{}", None));
        assert!(!caller.validate_response(reply.as_str(), b"{}", Some(&Timestamp::new("soon"))));
        assert!(!caller.validate_response(reply.as_str(), b"{}", Some(&Timestamp::new("1700000001"))));
        assert!(!caller.validate_response("zz-not-hex", b"{}", Some(&ts)));
    }

    #[test]
    fn test_should_select_versions_by_name() {
        let upper = SignatureClient::new(SHARED_KEY, Some(BASE_URL), "V1").unwrap();
        let lower = client(SHARED_KEY);
        let ts = fixed();
        assert_eq!(
            upper.sign_request(URL, &[], b"", None, Some(&ts)).unwrap(),
            lower.sign_request(URL, &[], b"", None, Some(&ts)).unwrap()
        );

        let err = SignatureClient::new(SHARED_KEY, None, "v2").unwrap_err();
        assert!(err.to_string().contains("v2"));
        assert!(err.to_string().contains("v1"));
    }

    #[test]
    fn test_should_use_custom_registered_version() {
        fn pinned(
            key: SignatureKey,
            _base_url: Option<&str>,
        ) -> Result<Arc<dyn SignatureProtocol>, SignatureError> {
            Ok(Arc::new(V1::new(key, Some(BASE_URL))?))
        }

        let mut registry = ProtocolRegistry::builtin();
        registry.register("Pinned", pinned);
        let custom =
            SignatureClient::with_registry(&registry, SHARED_KEY, None, "pinned").unwrap();
        assert_eq!(custom.version(), "v1");

        let ts = fixed();
        assert_eq!(
            custom.sign_request("items?foo=bar", &[], b"", None, Some(&ts)).unwrap(),
            client(SHARED_KEY).sign_request(URL, &[], b"", None, Some(&ts)).unwrap()
        );
    }

    #[test]
    fn test_should_build_client_from_config() {
        let config = SignerConfig::builder()
            .signature_key(Some(SHARED_KEY.into()))
            .base_url(Some(BASE_URL.to_owned()))
            .build();
        let configured = SignatureClient::from_config(&config).unwrap();
        let ts = fixed();
        assert_eq!(
            configured.sign_request("items?foo=bar", &[], b"", None, Some(&ts)).unwrap(),
            client(SHARED_KEY).sign_request(URL, &[], b"", None, Some(&ts)).unwrap()
        );
    }
}
