// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for zone resolution.

#[cfg(test)]
mod tests {
    use crate::constellix::zones::exact_search_action;
    use crate::constellix::{
        base_domain_name_guesses, relative_record_name, zone_name_guesses, ConstellixClient,
    };
    use crate::errors::ClientError;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // =====================================================
    // Candidate Generation Tests
    // =====================================================

    #[test]
    fn test_base_domain_name_guesses() {
        assert_eq!(
            base_domain_name_guesses("sub.example.com"),
            vec!["sub.example.com", "example.com", "com"]
        );
    }

    #[test]
    fn test_base_domain_name_guesses_wildcard_and_root_dot() {
        assert_eq!(
            base_domain_name_guesses("*.example.com."),
            vec!["example.com", "com"]
        );
    }

    #[test]
    fn test_base_domain_name_guesses_empty() {
        assert!(base_domain_name_guesses("").is_empty());
    }

    #[test]
    fn test_zone_name_guesses_start_with_record_name() {
        assert_eq!(
            zone_name_guesses("sub.example.com", "_acme-challenge.sub.example.com"),
            vec![
                "_acme-challenge.sub.example.com",
                "sub.example.com",
                "example.com",
                "com"
            ]
        );
    }

    // =====================================================
    // Relative Name Tests
    // =====================================================

    #[test]
    fn test_relative_record_name() {
        assert_eq!(
            relative_record_name("_acme-challenge.example.com", "example.com"),
            "_acme-challenge"
        );
        assert_eq!(
            relative_record_name("_acme-challenge.sub.example.com", "example.com"),
            "_acme-challenge.sub"
        );
    }

    #[test]
    fn test_relative_record_name_trailing_dots() {
        assert_eq!(
            relative_record_name("_acme-challenge.example.com.", "example.com."),
            "_acme-challenge"
        );
    }

    #[test]
    fn test_relative_record_name_apex() {
        assert_eq!(relative_record_name("example.com", "example.com"), "");
    }

    #[test]
    fn test_relative_record_name_requires_label_boundary() {
        // "badexample.com" is not inside "example.com"
        assert_eq!(
            relative_record_name("_acme-challenge.badexample.com", "example.com"),
            "_acme-challenge.badexample.com"
        );
    }

    #[test]
    fn test_exact_search_action_encodes_name() {
        assert_eq!(
            exact_search_action("domains/search", "_acme-challenge.example.com"),
            "domains/search?exact=_acme-challenge.example.com"
        );
        assert_eq!(
            exact_search_action("domains/search", "a b&c"),
            "domains/search?exact=a+b%26c"
        );
    }

    // =====================================================
    // Zone Walk Tests (mock HTTP server)
    // =====================================================

    async fn mount_zone(server: &MockServer, name: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/domains/search"))
            .and(query_param("exact", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> ConstellixClient {
        ConstellixClient::new(&server.uri(), "myapikey", "fakesecret").unwrap()
    }

    #[tokio::test]
    async fn test_find_zone_walks_up_to_parent() {
        let server = MockServer::start().await;
        mount_zone(&server, "_acme-challenge.example.com", json!([])).await;
        mount_zone(&server, "example.com", json!([{"id": 123, "name": "example.com"}])).await;

        let zone = client(&server)
            .find_managed_zone("example.com", "_acme-challenge.example.com")
            .await
            .unwrap();

        assert_eq!(zone.id, "123");
        assert_eq!(zone.name, "example.com");
        assert_eq!(zone.relative_name, "_acme-challenge");
    }

    #[tokio::test]
    async fn test_find_zone_prefers_most_specific() {
        let server = MockServer::start().await;
        mount_zone(&server, "_acme-challenge.sub.example.com", json!([])).await;
        mount_zone(&server, "sub.example.com", json!([{"id": 2, "name": "sub.example.com"}])).await;
        mount_zone(&server, "example.com", json!([{"id": 1, "name": "example.com"}])).await;

        let zone = client(&server)
            .find_managed_zone("sub.example.com", "_acme-challenge.sub.example.com")
            .await
            .unwrap();

        assert_eq!(zone.id, "2");
        assert_eq!(zone.relative_name, "_acme-challenge");
    }

    #[tokio::test]
    async fn test_find_zone_skips_failed_candidates() {
        let server = MockServer::start().await;

        // Non-JSON answer for the first guess is a transport error that must not abort the walk
        Mock::given(method("GET"))
            .and(path("/domains/search"))
            .and(query_param("exact", "_acme-challenge.sub.example.com"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/domains/search"))
            .and(query_param("exact", "sub.example.com"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"errors": ["Not found"]})),
            )
            .mount(&server)
            .await;
        mount_zone(&server, "example.com", json!([{"id": 1, "name": "example.com"}])).await;

        let zone = client(&server)
            .find_managed_zone("sub.example.com", "_acme-challenge.sub.example.com")
            .await
            .unwrap();

        assert_eq!(zone.id, "1");
        assert_eq!(zone.relative_name, "_acme-challenge.sub");
    }

    #[tokio::test]
    async fn test_find_zone_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/domains/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(3)
            .mount(&server)
            .await;

        let err = client(&server)
            .find_managed_zone("example.com", "_acme-challenge.example.com")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ClientError::ZoneNotFound {
                domain: "example.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_find_zone_unreachable_endpoint_is_zone_not_found() {
        // Nothing listens on port 9 on localhost; every guess fails at the transport level
        let client = ConstellixClient::new("http://127.0.0.1:9", "myapikey", "fakesecret").unwrap();

        let err = client
            .find_managed_zone("example.com", "_acme-challenge.example.com")
            .await
            .unwrap_err();

        assert!(err.is_zone_not_found());
    }

    #[tokio::test]
    async fn test_search_zone_uses_first_of_several() {
        let server = MockServer::start().await;
        mount_zone(
            &server,
            "example.com",
            json!([{"id": 1, "name": "example.com"}, {"id": 2, "name": "example.com"}]),
        )
        .await;

        let zone = client(&server).search_zone("example.com").await.unwrap().unwrap();
        assert_eq!(zone.id, "1");
    }
}
