// Application Default Credentials tests against a mocked token endpoint
// Author: kelexine (https://github.com/kelexine)

use imagen_relay::config::{CredentialsConfig, CLOUD_PLATFORM_SCOPE};
use imagen_relay::error::ProxyError;
use imagen_relay::oauth::{ApplicationDefaultCredentials, TokenProvider};
use mockito::Matcher;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

const TEST_KEY: &str = include_str!("fixtures/test_service_account_key.pem");

fn write_credentials(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file
}

fn adc_for(file: &NamedTempFile) -> ApplicationDefaultCredentials {
    let config = CredentialsConfig {
        credentials_path: Some(file.path().to_string_lossy().to_string()),
        ..CredentialsConfig::default()
    };
    ApplicationDefaultCredentials::new(&config).unwrap()
}

#[tokio::test]
async fn test_authorized_user_refresh_grant() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "1//0-refresh".into()),
            Matcher::UrlEncoded("client_id".into(), "client.apps.googleusercontent.com".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "ya29.user", "expires_in": 3599, "token_type": "Bearer"}"#)
        .expect(1)
        .create_async()
        .await;

    let file = write_credentials(json!({
        "type": "authorized_user",
        "client_id": "client.apps.googleusercontent.com",
        "client_secret": "secret",
        "refresh_token": "1//0-refresh",
        "token_uri": format!("{}/token", server.url()),
    }));

    let token = adc_for(&file).acquire_token().await.unwrap();
    assert_eq!(token.secret(), "ya29.user");
    assert!(token.expires_in_seconds().unwrap() > 3500);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_account_jwt_grant() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "grant_type".into(),
                "urn:ietf:params:oauth:grant-type:jwt-bearer".into(),
            ),
            Matcher::Regex("assertion=[A-Za-z0-9_-]+\\.[A-Za-z0-9_-]+\\.[A-Za-z0-9_-]+".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token": "ya29.service", "expires_in": 3600}"#)
        .expect(1)
        .create_async()
        .await;

    let file = write_credentials(json!({
        "type": "service_account",
        "project_id": "test-project",
        "private_key_id": "key-1",
        "private_key": TEST_KEY,
        "client_email": "relay@test-project.iam.gserviceaccount.com",
        "token_uri": format!("{}/token", server.url()),
    }));

    let token = adc_for(&file).acquire_token().await.unwrap();
    assert_eq!(token.secret(), "ya29.service");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_token_endpoint_rejection_is_credentials_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant", "error_description": "Token has been expired or revoked."}"#)
        .create_async()
        .await;

    let file = write_credentials(json!({
        "type": "authorized_user",
        "client_id": "id",
        "client_secret": "secret",
        "refresh_token": "1//0-revoked",
        "token_uri": format!("{}/token", server.url()),
    }));

    let err = adc_for(&file).acquire_token().await.unwrap_err();
    match err {
        ProxyError::Credentials(msg) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("invalid_grant"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_access_token_is_credentials_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"token_type": "Bearer"}"#)
        .create_async()
        .await;

    let file = write_credentials(json!({
        "type": "authorized_user",
        "client_id": "id",
        "client_secret": "secret",
        "refresh_token": "r",
        "token_uri": format!("{}/token", server.url()),
    }));

    let err = adc_for(&file).acquire_token().await.unwrap_err();
    assert!(err.to_string().contains("Missing access_token"));
}

#[tokio::test]
async fn test_unreadable_credentials_file() {
    let config = CredentialsConfig {
        credentials_path: Some("/nonexistent/credentials.json".to_string()),
        ..CredentialsConfig::default()
    };
    let err = ApplicationDefaultCredentials::new(&config)
        .unwrap()
        .acquire_token()
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Credentials(_)));
}

#[tokio::test]
async fn test_metadata_server_token() {
    // Only meaningful when no file-based credentials would take precedence
    let well_known = dirs::config_dir()
        .map(|dir| dir.join("gcloud").join("application_default_credentials.json"));
    if std::env::var_os("GOOGLE_APPLICATION_CREDENTIALS").is_some()
        || well_known.map(|path| path.exists()).unwrap_or(false)
    {
        return;
    }

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "GET",
            "/computeMetadata/v1/instance/service-accounts/default/token",
        )
        .match_header("metadata-flavor", "Google")
        .match_query(Matcher::UrlEncoded(
            "scopes".into(),
            CLOUD_PLATFORM_SCOPE.into(),
        ))
        .with_status(200)
        .with_body(r#"{"access_token": "ya29.metadata", "expires_in": 1800, "token_type": "Bearer"}"#)
        .expect(1)
        .create_async()
        .await;

    let config = CredentialsConfig {
        metadata_host: server.host_with_port(),
        ..CredentialsConfig::default()
    };
    let token = ApplicationDefaultCredentials::new(&config)
        .unwrap()
        .acquire_token()
        .await
        .unwrap();

    assert_eq!(token.secret(), "ya29.metadata");
    mock.assert_async().await;
}
