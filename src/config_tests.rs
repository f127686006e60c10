// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for credentials loading.

#[cfg(test)]
mod tests {
    use crate::config::{AuthenticatorConfig, Credentials};
    use crate::constants::DEFAULT_CHALLENGE_TTL_SECS;
    use crate::errors::ConfigError;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_ini(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("constellix.ini");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_prefixed_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(
            &dir,
            "dns_constellix_endpoint = https://api.dns.constellix.com/v1\n\
             dns_constellix_apikey = myapikey\n\
             dns_constellix_secretkey = fakesecret\n",
        );

        let credentials = Credentials::from_file(&path).unwrap();
        assert_eq!(credentials.endpoint, "https://api.dns.constellix.com/v1");
        assert_eq!(credentials.api_key, "myapikey");
        assert_eq!(credentials.secret_key, "fakesecret");
    }

    #[test]
    fn test_load_unprefixed_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(
            &dir,
            "endpoint = https://api.dns.constellix.com/v1\napikey = k\nsecretkey = s\n",
        );

        let credentials = Credentials::from_file(&path).unwrap();
        assert_eq!(credentials.api_key, "k");
        assert_eq!(credentials.secret_key, "s");
    }

    #[test]
    fn test_missing_keys_fail_fast() {
        let dir = TempDir::new().unwrap();
        let path = write_ini(
            &dir,
            "dns_constellix_endpoint = https://api.dns.constellix.com/v1\n",
        );

        let err = Credentials::from_file(&path).unwrap_err();
        match err {
            ConfigError::MissingField { fields, .. } => {
                assert_eq!(
                    fields,
                    vec![
                        "dns_constellix_apikey".to_string(),
                        "dns_constellix_secretkey".to_string()
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Credentials::from_file(&dir.path().join("absent.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let err = Credentials::from_values(
            "test",
            Some("https://api.dns.constellix.com/v1".to_string()),
            Some("   ".to_string()),
            Some("s".to_string()),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingField {
                path: "test".to_string(),
                fields: vec!["dns_constellix_apikey".to_string()],
            }
        );
    }

    #[test]
    fn test_values_are_trimmed() {
        let credentials = Credentials::from_values(
            "test",
            Some(" https://api.dns.constellix.com/v1 ".to_string()),
            Some(" k ".to_string()),
            Some("s".to_string()),
        )
        .unwrap();

        assert_eq!(credentials.endpoint, "https://api.dns.constellix.com/v1");
        assert_eq!(credentials.api_key, "k");
    }

    #[test]
    fn test_endpoint_must_be_http_url() {
        let err = Credentials::from_values(
            "test",
            Some("fake://endpoint/v1".to_string()),
            Some("k".to_string()),
            Some("s".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = Credentials::from_values(
            "test",
            Some("not a url".to_string()),
            Some("k".to_string()),
            Some("s".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::from_values(
            "test",
            Some("https://api.dns.constellix.com/v1".to_string()),
            Some("k".to_string()),
            Some("super-secret".to_string()),
        )
        .unwrap();

        let debug = format!("{credentials:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_authenticator_config_default_ttl() {
        let credentials = Credentials::from_values(
            "test",
            Some("https://api.dns.constellix.com/v1".to_string()),
            Some("k".to_string()),
            Some("s".to_string()),
        )
        .unwrap();

        let config = AuthenticatorConfig::new(credentials.clone());
        assert_eq!(config.ttl, DEFAULT_CHALLENGE_TTL_SECS);
        assert_eq!(AuthenticatorConfig::new(credentials).with_ttl(300).ttl, 300);
    }
}
