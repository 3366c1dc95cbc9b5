//! Server integration tests.
//!
//! These run a real listener and drive a full game over HTTP.

mod common;

use std::time::{Duration, Instant};

use anyhow::Result;
use gambit_server::ServerConfig;
use gambit_session::StoreConfig;
use serde_json::Value;

#[tokio::test]
async fn test_server_starts_and_responds_to_health() -> Result<()> {
    let server = common::TestServer::start().await?;

    assert!(server.health().await?, "Server should be healthy");

    let body: Value = server
        .client
        .get(format!("{}/health", server.base_url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["status"], "ok");
    assert!(body.get("version").is_some());
    assert_eq!(body["active_games"], 0);

    Ok(())
}

#[tokio::test]
async fn test_full_game_over_http() -> Result<()> {
    let server = common::TestServer::start().await?;

    let created: Value = server
        .client
        .post(server.game_url("/create"))
        .query(&[("player_key", "alice"), ("chess_variant", "Chess960(42)")])
        .send()
        .await?
        .json()
        .await?;
    let key = created["game_key"].as_str().unwrap().to_string();

    let joined: Value = server
        .client
        .post(server.game_url(&format!("/join/{key}")))
        .query(&[("player_key", "bob")])
        .send()
        .await?
        .json()
        .await?;
    assert_ne!(joined["team"], joined["host_team"]);
    assert_eq!(joined["chess_variant"], "Chess960(42)");

    for mv in ["e2e4", "e7e5", "g1f3"] {
        let resp = server
            .client
            .post(server.game_url(&format!("/move/{key}")))
            .query(&[("move", mv)])
            .send()
            .await?;
        assert_eq!(resp.status().as_u16(), 200);
    }

    let state: Value = server
        .client
        .get(server.game_url(&format!("/game/{key}")))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(state["moves"], serde_json::json!(["e2e4", "e7e5", "g1f3"]));
    assert_eq!(state["game_ready"], true);
    assert_eq!(state["game_complete"], false);

    let resp = server
        .client
        .post(server.game_url(&format!("/finish/{key}")))
        .query(&[("player_key", "bob")])
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);

    let resp = server
        .client
        .delete(server.game_url(&format!("/game/{key}")))
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);
    assert!(server.store.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_not_found_is_delayed_without_blocking_others() -> Result<()> {
    let delay = Duration::from_millis(800);
    let server = common::TestServer::start_with(
        ServerConfig::new()
            .with_rate_limiting(false)
            .with_request_logging(false)
            .with_not_found_delay(delay),
        StoreConfig::default(),
    )
    .await?;

    let started = Instant::now();
    let missing = server
        .client
        .get(server.game_url("/game/zzzzzz"))
        .send();
    let create = async {
        let resp = server
            .client
            .post(server.game_url("/create"))
            .query(&[("player_key", "alice"), ("chess_variant", "Standard")])
            .send()
            .await;
        (resp, started.elapsed())
    };

    let (missing, (created, create_elapsed)) = tokio::join!(missing, create);

    let missing = missing?;
    assert_eq!(missing.status().as_u16(), 404);
    assert!(started.elapsed() >= delay);

    assert_eq!(created?.status().as_u16(), 200);
    assert!(
        create_elapsed < delay,
        "create should not wait behind a delayed lookup"
    );

    Ok(())
}

#[tokio::test]
async fn test_rate_limit_over_http() -> Result<()> {
    let server = common::TestServer::start_with(
        ServerConfig::new()
            .with_rate_limiting(true)
            .with_api_rpm(1)
            .with_rate_limit_burst(3)
            .with_request_logging(false)
            .with_not_found_delay(Duration::ZERO),
        StoreConfig::default(),
    )
    .await?;

    // The startup health check already spent part of the burst, so keep going
    // until the limiter answers.
    let mut limited = None;
    for _ in 0..5 {
        let resp = server
            .client
            .get(format!("{}/health", server.base_url()))
            .send()
            .await?;
        if resp.status().as_u16() == 429 {
            limited = Some(resp);
            break;
        }
    }

    let resp = limited.expect("limiter should reject within the burst");
    assert!(resp.headers().contains_key("retry-after"));
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "rate limit exceeded");

    Ok(())
}

#[tokio::test]
async fn test_default_rate_limit_admits_two_polling_players() -> Result<()> {
    // Both players share one address and poll every 500 ms, as the game
    // client does, while one of them plays a move every second.
    let server = common::TestServer::start_with(
        ServerConfig::default()
            .with_request_logging(false)
            .with_not_found_delay(Duration::ZERO),
        StoreConfig::default(),
    )
    .await?;

    let created: Value = server
        .client
        .post(server.game_url("/create"))
        .query(&[("player_key", "alice"), ("chess_variant", "Standard")])
        .send()
        .await?
        .json()
        .await?;
    let key = created["game_key"].as_str().unwrap().to_string();

    let resp = server
        .client
        .post(server.game_url(&format!("/join/{key}")))
        .query(&[("player_key", "bob")])
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);

    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    let mut moves_sent = 0;
    for tick in 0..20 {
        ticker.tick().await;

        for _ in 0..2 {
            let resp = server
                .client
                .get(server.game_url(&format!("/game/{key}")))
                .send()
                .await?;
            assert_eq!(resp.status().as_u16(), 200, "poll rejected at tick {tick}");
        }

        if tick % 2 == 1 {
            let resp = server
                .client
                .post(server.game_url(&format!("/move/{key}")))
                .query(&[("move", format!("m{tick}"))])
                .send()
                .await?;
            assert_eq!(resp.status().as_u16(), 200, "move rejected at tick {tick}");
            moves_sent += 1;
        }
    }

    let snapshot = server.store.get(&key)?;
    assert_eq!(snapshot.moves.len(), moves_sent);

    Ok(())
}

#[tokio::test]
async fn test_custom_prefix() -> Result<()> {
    let server = common::TestServer::start_with(
        ServerConfig::new()
            .with_route_prefix("/chess")
            .with_rate_limiting(false)
            .with_not_found_delay(Duration::ZERO),
        StoreConfig::default(),
    )
    .await?;

    let resp = server
        .client
        .post(format!("{}/chess/create", server.base_url()))
        .query(&[("player_key", "alice"), ("chess_variant", "Kawns")])
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);

    let resp = server
        .client
        .post(server.game_url("/create"))
        .query(&[("player_key", "alice"), ("chess_variant", "Kawns")])
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 404);

    Ok(())
}
