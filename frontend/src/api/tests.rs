use super::*;
use crate::web::mock::MockClient;

fn cookies() -> Option<String> {
    Some("theme=fantasy; csrftoken=tok3n".to_string())
}

fn no_cookies() -> Option<String> {
    None
}

fn api(mock: &MockClient) -> OdysseyApi<MockClient> {
    OdysseyApi::new(mock.clone(), AppConfig::default(), cookies)
}

const TOKEN_JSON: &str = r#"{
    "pk": "abc",
    "model": "knox.authtoken",
    "fields": { "user": 5, "created": "2024-01-01T00:00:00Z", "expires_at": "2099-01-01T00:00:00Z" }
}"#;

#[tokio::test]
async fn test_get_has_no_body_and_no_csrf() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Get, "/adventures/?user_id=5", 200, "[]");

    let adventures = api(&mock).list_adventures(5).await.unwrap();
    assert!(adventures.is_empty());

    let sent = mock.sent();
    assert_eq!(sent[0].url, "/api/adventures/?user_id=5");
    assert_eq!(sent[0].body, None);
    assert_eq!(sent[0].header_value(HEADER_CSRF_TOKEN), None);
}

#[tokio::test]
async fn test_mutating_request_carries_csrf_and_json() {
    let mock = MockClient::new();
    let body = format!(r#"{{"token": {}, "username": "gm@example.com"}}"#, TOKEN_JSON);
    mock.on(HttpMethod::Post, "/users/login/", 200, &body);

    let response = api(&mock).login("gm@example.com", "Secret123").await.unwrap();
    assert_eq!(response.token.user_id(), 5);

    let sent = mock.sent();
    assert_eq!(sent[0].header_value(HEADER_CSRF_TOKEN), Some("tok3n"));
    assert_eq!(sent[0].header_value("Content-Type"), Some("application/json"));
    let json: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(json["username"], "gm@example.com");
}

#[tokio::test]
async fn test_missing_cookie_omits_header() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Delete, "/scenes/3/", 204, "");

    let api = OdysseyApi::new(mock.clone(), AppConfig::default(), no_cookies);
    api.delete_scene(3).await.unwrap();
    assert_eq!(mock.sent()[0].header_value(HEADER_CSRF_TOKEN), None);
}

#[tokio::test]
async fn test_status_errors_are_classified() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Get, "/adventures/9/", 404, "");
    mock.on(
        HttpMethod::Post,
        "/users/",
        400,
        r#"{"error": "Username already in use"}"#,
    );
    mock.on(HttpMethod::Get, "/adventures/?user_id=1", 403, "");
    let api = api(&mock);

    assert_eq!(api.get_adventure(9).await.unwrap_err(), ClientError::NotFound);
    assert_eq!(
        api.register("gm@example.com", "Secret123").await.unwrap_err(),
        ClientError::Conflict("Username already in use".into())
    );
    assert!(api.list_adventures(1).await.unwrap_err().requires_login());
}

#[tokio::test]
async fn test_network_and_decode_errors() {
    let mock = MockClient::new();
    mock.fail(HttpMethod::Get, "/adventures/1/");
    mock.on(HttpMethod::Get, "/adventures/2/", 200, "not json");
    let api = api(&mock);

    assert!(matches!(
        api.get_adventure(1).await.unwrap_err(),
        ClientError::Network(_)
    ));
    assert!(matches!(
        api.get_adventure(2).await.unwrap_err(),
        ClientError::Decode(_)
    ));
}

#[tokio::test]
async fn test_save_scene_creates_or_patches() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Post, "/scenes/", 201, r#"{"id": 31, "sequence": 1}"#);
    mock.on(HttpMethod::Patch, "/scenes/12/", 200, r#"{"id": 12}"#);
    let api = api(&mock);

    let payload = ScenePayload {
        adventure_id: 4,
        sequence: 1,
        challenge: "Cross the river".into(),
        setting: "Ford".into(),
        plot_twist: None,
        clue: None,
    };
    assert_eq!(api.save_scene(None, payload.clone()).await.unwrap(), 31);
    assert_eq!(api.save_scene(Some(12), payload).await.unwrap(), 12);
    assert_eq!(
        mock.calls(),
        vec!["POST /api/scenes/", "PATCH /api/scenes/12/"]
    );
}

#[tokio::test]
async fn test_progress_update_body() {
    let mock = MockClient::new();
    mock.on(HttpMethod::Patch, "/encounters/8/", 200, r#"{"id": 8}"#);

    api(&mock)
        .update_progress(ProgressTarget::Encounter(8), Progress::InProgress)
        .await
        .unwrap();
    assert_eq!(
        mock.sent()[0].body.as_deref(),
        Some(r#"{"progress":"In Progress"}"#)
    );
}
