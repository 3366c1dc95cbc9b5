//! Client tests against a mocked relay.

use gambit_client::{Error, GambitClient, Team};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GambitClient {
    GambitClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_create_sends_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uc2024/create"))
        .and(query_param("player_key", "alice"))
        .and(query_param("chess_variant", "Chess960(518)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "game_key": "abc234" })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .games()
        .create("alice", "Chess960(518)")
        .await
        .unwrap();

    assert_eq!(created.game_key, "abc234");
}

#[tokio::test]
async fn test_join_parses_teams() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uc2024/join/abc234"))
        .and(query_param("player_key", "bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "game_key": "abc234",
            "team": "black",
            "host_team": "white",
            "host": "white",
            "chess_variant": "Horde"
        })))
        .mount(&server)
        .await;

    let joined = client_for(&server)
        .games()
        .join("abc234", "bob")
        .await
        .unwrap();

    assert_eq!(joined.team, Team::Black);
    assert_eq!(joined.host_team, Team::White);
    assert_eq!(joined.host, Some(Team::White));
    assert_eq!(joined.chess_variant, "Horde");
}

#[tokio::test]
async fn test_move_without_player_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uc2024/move/abc234"))
        .and(query_param("move", "e2e4"))
        .and(query_param_is_missing("player_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .games()
        .submit_move("abc234", "e2e4", None)
        .await
        .unwrap();

    assert_eq!(ack.status, "ok");
}

#[tokio::test]
async fn test_forbidden_move_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uc2024/move/abc234"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": "game already over" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .games()
        .submit_move("abc234", "e2e4", Some("alice"))
        .await
        .unwrap_err();

    assert!(err.is_forbidden());
    assert!(matches!(err, Error::Api { ref message, .. } if message == "game already over"));
}

#[tokio::test]
async fn test_poll_and_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uc2024/game/abc234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "moves": ["e2e4", "e7e5"],
            "game_ready": true,
            "host_team": "black",
            "game_complete": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/uc2024/game/zzzzzz"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "game not found" })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let state = client.games().poll("abc234").await.unwrap();
    assert_eq!(state.moves, vec!["e2e4", "e7e5"]);
    assert!(state.game_ready);
    assert_eq!(state.host_team, Team::Black);

    let err = client.games().poll("zzzzzz").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, Error::NotFound(ref message) if message == "game not found"));
}

#[tokio::test]
async fn test_finish_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uc2024/finish/abc234"))
        .and(query_param("player_key", "bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/uc2024/game/abc234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.games().finish("abc234", Some("bob")).await.unwrap();
    client.games().delete("abc234").await.unwrap();
}

#[tokio::test]
async fn test_health_is_not_prefixed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "version": "0.1.0",
            "active_games": 3
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let health = client.health().check().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.active_games, Some(3));
    assert!(client.health().is_healthy().await);
}

#[tokio::test]
async fn test_non_json_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uc2024/create"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .games()
        .create("alice", "Standard")
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(err.status(), Some(502));
}
