//! End-to-end tests of the Elance provider against a mock Elance API.

#[cfg(test)]
mod integration_tests {
    use crate::{ElanceProvider, ElanceResourceOwner, ResourceOwner};
    use ras_identity_core::IdentityProvider;
    use ras_identity_oauth2::{
        AuthorizationOptions, Grant, OAuth2Client, OAuth2ClientConfig, OAuth2Error,
        OAuth2IdentityProvider, OAuth2ProviderAdapter, ReqwestTransport, StatusCode,
    };
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use url::Url;
    use uuid::Uuid;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_FIXTURE: &str = include_str!("fixtures/profile_my.json");

    fn config() -> OAuth2ClientConfig {
        OAuth2ClientConfig::new("mock_client", "mock_secret", "none")
    }

    fn client_for(domain: &str) -> OAuth2Client<ElanceProvider, ReqwestTransport> {
        OAuth2Client::with_transport(
            config(),
            ElanceProvider::with_domain(domain),
            ReqwestTransport::new(5).unwrap(),
        )
    }

    fn token_body() -> Value {
        json!({
            "data": {
                "access_token": "mock_access_token",
                "expires_in": 3600,
                "token_type": "bearer",
                "refresh_token": "mock_refresh_token",
                "scope": "basicInfo"
            }
        })
    }

    fn profile_body(user_id: Value, user_name: &str, logo: &str) -> Value {
        let mut profile: Value = serde_json::from_str(PROFILE_FIXTURE).unwrap();
        let fields = &mut profile["data"]["providerProfile"];
        fields["userId"] = user_id;
        fields["userName"] = json!(user_name);
        fields["logo"] = json!(logo);
        profile
    }

    async fn mount_token_endpoint(mock_server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api2/oauth/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=mock_authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .expect(1)
            .mount(mock_server)
            .await;
    }

    async fn mount_profile_endpoint(mock_server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api2/profiles/my"))
            .and(query_param("access_token", "mock_access_token"))
            .and(header("Authorization", "Bearer mock_access_token"))
            .respond_with(response)
            .expect(1)
            .mount(mock_server)
            .await;
    }

    fn authorization_code() -> Grant {
        Grant::AuthorizationCode {
            code: "mock_authorization_code".to_string(),
        }
    }

    #[test]
    fn test_authorization_url() {
        let client = OAuth2Client::new(config(), ElanceProvider::new()).unwrap();

        let auth = client
            .authorization_url(AuthorizationOptions::default())
            .unwrap();
        let url = Url::parse(&auth.url).unwrap();
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("api.elance.com"));
        assert_eq!(url.path(), "/api2/oauth/authorize");
        for key in [
            "client_id",
            "redirect_uri",
            "state",
            "scope",
            "response_type",
            "approval_prompt",
        ] {
            assert!(query.contains_key(key), "missing {key}");
        }
        assert!(!auth.state.is_empty());
    }

    #[test]
    fn test_not_providing_scopes_includes_default() {
        let client = OAuth2Client::new(config(), ElanceProvider::new()).unwrap();

        let auth = client
            .authorization_url(AuthorizationOptions::default())
            .unwrap();

        assert!(auth.url.contains("basicInfo"));
        let query: HashMap<String, String> = Url::parse(&auth.url)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect();
        assert_eq!(query["scope"], "basicInfo");
    }

    #[test]
    fn test_providing_scopes_overrides_default() {
        let client = OAuth2Client::new(config(), ElanceProvider::new()).unwrap();
        let first = Uuid::new_v4().simple().to_string();
        let second = Uuid::new_v4().simple().to_string();

        let auth = client
            .authorization_url(
                AuthorizationOptions::default().with_scopes([first.clone(), second.clone()]),
            )
            .unwrap();

        assert!(auth.url.contains(&format!("scope={}%2C{}", first, second)));
        assert!(!auth.url.contains("basicInfo"));
    }

    #[test]
    fn test_base_access_token_url() {
        let provider = ElanceProvider::new();

        let url = Url::parse(&provider.base_access_token_url(&[])).unwrap();
        assert_eq!(url.path(), "/api2/oauth/token");
    }

    #[tokio::test]
    async fn test_get_access_token() {
        let mock_server = MockServer::start().await;
        mount_token_endpoint(&mock_server).await;

        let client = client_for(&mock_server.uri());
        let before = chrono::Utc::now();
        let token = client.get_access_token(authorization_code()).await.unwrap();

        assert_eq!(token.access_token, "mock_access_token");
        assert_eq!(token.refresh_token.as_deref(), Some("mock_refresh_token"));
        assert_eq!(token.token_type.as_deref(), Some("bearer"));
        assert_eq!(token.scope.as_deref(), Some("basicInfo"));
        assert_eq!(token.resource_owner_id, None);

        let expires = token.expires.unwrap();
        assert!(expires >= before);
        assert!(expires <= chrono::Utc::now() + chrono::Duration::seconds(3600));
    }

    #[tokio::test]
    async fn test_user_data() {
        let mock_server = MockServer::start().await;
        let user_id = 4821;
        let user_name = Uuid::new_v4().simple().to_string();
        let logo = format!("https://elance.com/media/{}.png", Uuid::new_v4().simple());

        mount_token_endpoint(&mock_server).await;
        mount_profile_endpoint(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(profile_body(
                json!(user_id.to_string()),
                &user_name,
                &logo,
            )),
        )
        .await;

        let client = client_for(&mock_server.uri());
        let token = client.get_access_token(authorization_code()).await.unwrap();
        let user = client.get_resource_owner(&token).await.unwrap();

        let raw = user.to_value();
        let profile = &raw["data"]["providerProfile"];

        assert_eq!(user.id(), Some(user_id.to_string()));
        assert_eq!(profile["userId"], json!(user_id.to_string()));
        assert_eq!(user.username(), Some(user_name.clone()));
        assert_eq!(profile["userName"], json!(user_name));
        assert_eq!(user.avatar_url(), Some(logo.clone()));
        assert_eq!(profile["logo"], json!(logo));
        assert_eq!(profile["city"], "Seattle");
    }

    #[tokio::test]
    async fn test_user_data_with_numeric_id() {
        let mock_server = MockServer::start().await;

        mount_token_endpoint(&mock_server).await;
        mount_profile_endpoint(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(profile_body(
                json!(9001),
                "jdoe",
                "http://x/y.png",
            )),
        )
        .await;

        let client = client_for(&mock_server.uri());
        let token = client.get_access_token(authorization_code()).await.unwrap();
        let user = client.get_resource_owner(&token).await.unwrap();

        assert_eq!(user.id(), Some("9001".to_string()));
        assert_eq!(user.to_value()["data"]["providerProfile"]["userId"], 9001);
    }

    #[tokio::test]
    async fn test_user_data_fails() {
        let mock_server = MockServer::start().await;

        mount_token_endpoint(&mock_server).await;
        mount_profile_endpoint(
            &mock_server,
            ResponseTemplate::new(500).set_body_json(json!({
                "errors": [
                    {"type": "validation", "code": "E_VALIDATION_INVALID_ID", "description": "Input not a valid ID."},
                    {"type": "validation", "code": "E_API_NOT_AUTHORIZED", "description": "You are not authorized to access this data."}
                ]
            })),
        )
        .await;

        let client = client_for(&mock_server.uri());
        let token = client.get_access_token(authorization_code()).await.unwrap();
        let result = client.get_resource_owner(&token).await;

        match result {
            Err(OAuth2Error::IdentityProvider { status, body, .. }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                let errors = ElanceProvider::api_errors(&body);
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[1].code, "E_API_NOT_AUTHORIZED");
            }
            other => panic!("expected identity provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_token_errors_are_surfaced() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api2/oauth/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [{"type": "oauth", "code": "invalid_grant", "description": "Code expired."}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let result = client.get_access_token(authorization_code()).await;

        match result {
            Err(OAuth2Error::IdentityProvider {
                message, status, ..
            }) => {
                assert_eq!(message, "Code expired.");
                assert_eq!(status, StatusCode::BAD_REQUEST);
            }
            other => panic!("expected identity provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verify_through_identity_provider() {
        let mock_server = MockServer::start().await;

        mount_token_endpoint(&mock_server).await;
        mount_profile_endpoint(
            &mock_server,
            ResponseTemplate::new(200).set_body_string(PROFILE_FIXTURE),
        )
        .await;

        let provider = OAuth2IdentityProvider::new(client_for(&mock_server.uri()));
        let identity = provider
            .verify(json!({"code": "mock_authorization_code"}))
            .await
            .unwrap();

        assert_eq!(identity.provider_id, "oauth2:elance");
        assert_eq!(identity.subject, "7654321");
        assert_eq!(identity.display_name, Some("ted_mosby".to_string()));

        let metadata = identity.metadata.unwrap();
        assert_eq!(
            metadata["avatar_url"],
            "https://elance.com/media/images/4.0/no-photo-64x80.jpg"
        );
        assert_eq!(metadata["profile"]["data"]["providerProfile"]["countryCode"], "US");
    }

    #[test]
    fn test_fixture_round_trip() {
        let response: Value = serde_json::from_str(PROFILE_FIXTURE).unwrap();
        let owner = ElanceResourceOwner::new(response.clone());

        assert_eq!(owner.to_value(), response);
        assert_eq!(owner.id(), Some("7654321".to_string()));
        assert_eq!(owner.username(), Some("ted_mosby".to_string()));
        assert_eq!(owner.profile_field("companyUserId"), None);
        assert_eq!(owner.profile_field("skillsCount"), Some("5".to_string()));
        assert_eq!(owner.profile_field("portfolioCount"), None);
    }
}
