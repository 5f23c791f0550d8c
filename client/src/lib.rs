//! HTTP adapter for the external config provider and ledger backend.

mod backoff;
pub mod client;
pub mod notifier;

pub use client::{
    ChipsConfig, Client, ItemsConfig, JackpotConfig, MilestonesConfig, RetryPolicy, SessionConfig,
};
pub use notifier::HttpNotifier;

use thiserror::Error;

/// Error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("failed: {status}: {body}")]
    FailedWithBody {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid data: {0}")]
    InvalidData(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State as AxumState,
        http::StatusCode as AxumStatusCode,
        routing::{get, post},
        Json, Router,
    };
    use luckyeight_execution::{ItemOverride, StakeNotifier};
    use luckyeight_types::{Item, StakeEvent};
    use serde_json::{json, Value};
    use std::{
        net::SocketAddr,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };
    use tokio::time::{sleep, Duration};

    fn no_backoff(max_attempts: usize, retry_non_idempotent: bool) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            retry_non_idempotent,
        }
    }

    async fn serve_router(router: Router) -> (String, tokio::task::JoinHandle<()>) {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        let actual_addr = listener.local_addr().unwrap();
        let base_url = format!("http://{actual_addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .await
                .unwrap();
        });

        sleep(Duration::from_millis(50)).await;
        (base_url, handle)
    }

    /// Echo the player id from the GET body so tests can see it arrived.
    fn player_of(body: &Value) -> String {
        body["playerId"].as_str().unwrap_or_default().to_string()
    }

    #[test]
    fn test_client_invalid_scheme() {
        let result = Client::new("ftp://example.com");
        assert!(result.is_err());
        if let Err(err) = result {
            assert!(matches!(err, Error::InvalidScheme(_)));
            assert_eq!(
                err.to_string(),
                "invalid URL scheme: ftp (expected http or https)"
            );
        }

        assert!(Client::new("http://localhost:8080").is_ok());
        assert!(Client::new("https://localhost:8080/api").is_ok());
        assert!(matches!(Client::new("not a url"), Err(Error::Url(_))));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let client = Client::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            client.base_url().join("config/items").unwrap().as_str(),
            "http://localhost:8080/api/config/items"
        );
    }

    #[tokio::test]
    async fn test_hydrate_reads_every_endpoint_with_body() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let router = Router::new()
            .route(
                "/config/items",
                get(
                    |AxumState(seen): AxumState<Arc<Mutex<Vec<String>>>>,
                     Json(body): Json<Value>| async move {
                        seen.lock().unwrap().push(player_of(&body));
                        Json(json!({
                            "items": [
                                {"item": "chicken", "multiplier": 40},
                                {"item": "carrot", "weight": 25.0}
                            ]
                        }))
                    },
                ),
            )
            .route(
                "/config/chips",
                get(
                    |AxumState(seen): AxumState<Arc<Mutex<Vec<String>>>>,
                     Json(body): Json<Value>| async move {
                        seen.lock().unwrap().push(player_of(&body));
                        Json(json!({"chips": [10, 100, 1000], "maxStakes": 4}))
                    },
                ),
            )
            .route(
                "/config/jackpot",
                get(|Json(_body): Json<Value>| async move { Json(json!({"bonus": 250000})) }),
            )
            .route(
                "/config/milestones",
                get(|Json(_body): Json<Value>| async move {
                    Json(json!({"rewards": [1, 2, 3, 4, 5]}))
                }),
            )
            .route(
                "/config/session",
                get(|Json(_body): Json<Value>| async move {
                    Json(json!({"sessionEndMs": 1700000000000u64, "advancedModeOverride": true}))
                }),
            )
            .with_state(seen.clone());

        let (base_url, handle) = serve_router(router).await;
        let client = Client::new(&base_url)
            .unwrap()
            .with_retry_policy(no_backoff(1, false));

        let overrides = client.hydrate("player-7").await;
        assert_eq!(
            overrides.items,
            Some(vec![
                ItemOverride {
                    item: Item::Chicken,
                    multiplier: Some(40),
                    weight: None,
                },
                ItemOverride {
                    item: Item::Carrot,
                    multiplier: None,
                    weight: Some(25.0),
                },
            ])
        );
        assert_eq!(overrides.chips, Some(vec![10, 100, 1_000]));
        assert_eq!(overrides.max_stakes, Some(4));
        assert_eq!(overrides.jackpot_bonus, Some(250_000));
        assert_eq!(overrides.milestone_rewards, Some(vec![1, 2, 3, 4, 5]));
        assert_eq!(overrides.session_end_ms, Some(1_700_000_000_000));
        assert_eq!(overrides.advanced_mode_override, Some(true));
        assert_eq!(*seen.lock().unwrap(), vec!["player-7", "player-7"]);

        handle.abort();
    }

    #[tokio::test]
    async fn test_hydrate_falls_back_per_field() {
        let router = Router::new()
            .route(
                "/config/jackpot",
                get(|Json(_body): Json<Value>| async move { Json(json!({"bonus": 5})) }),
            )
            .route(
                "/config/chips",
                get(|Json(_body): Json<Value>| async move { "not json" }),
            )
            .route(
                "/config/session",
                get(|Json(_body): Json<Value>| async move { AxumStatusCode::INTERNAL_SERVER_ERROR }),
            );

        let (base_url, handle) = serve_router(router).await;
        let client = Client::new(&base_url)
            .unwrap()
            .with_retry_policy(no_backoff(2, false));

        let overrides = client.hydrate("player-1").await;
        assert_eq!(overrides.jackpot_bonus, Some(5));
        assert_eq!(overrides.items, None);
        assert_eq!(overrides.chips, None);
        assert_eq!(overrides.max_stakes, None);
        assert_eq!(overrides.milestone_rewards, None);
        assert_eq!(overrides.session_end_ms, None);

        let err = client.fetch_chips("player-1").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        handle.abort();
    }

    #[tokio::test]
    async fn test_get_with_retry_retries_retryable_statuses() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/flaky",
                get(
                    |AxumState(counter): AxumState<Arc<AtomicUsize>>| async move {
                        let attempt = counter.fetch_add(1, Ordering::SeqCst);
                        if attempt < 2 {
                            AxumStatusCode::SERVICE_UNAVAILABLE
                        } else {
                            AxumStatusCode::OK
                        }
                    },
                ),
            )
            .with_state(counter.clone());

        let (base_url, handle) = serve_router(router).await;
        let client = Client::new(&base_url)
            .unwrap()
            .with_retry_policy(no_backoff(3, false));

        let url = client.base_url.join("flaky").unwrap();
        let response = client.get_with_retry(url, &json!({})).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        handle.abort();
    }

    #[tokio::test]
    async fn test_get_with_retry_stops_on_client_errors() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/missing",
                get(
                    |AxumState(counter): AxumState<Arc<AtomicUsize>>| async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        AxumStatusCode::NOT_FOUND
                    },
                ),
            )
            .with_state(counter.clone());

        let (base_url, handle) = serve_router(router).await;
        let client = Client::new(&base_url)
            .unwrap()
            .with_retry_policy(no_backoff(5, false));

        let url = client.base_url.join("missing").unwrap();
        let err = client.get_with_retry(url, &json!({})).await.unwrap_err();
        let Error::FailedWithBody { status, body } = err else {
            panic!("expected FailedWithBody, got {err:?}");
        };
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
        assert!(body.starts_with("GET "));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_submit_stake_is_not_retried_by_default() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/ledger/stake",
                post(
                    |AxumState(counter): AxumState<Arc<AtomicUsize>>,
                     _body: axum::body::Bytes| async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        AxumStatusCode::SERVICE_UNAVAILABLE
                    },
                ),
            )
            .with_state(counter.clone());

        let (base_url, handle) = serve_router(router).await;
        let client = Client::new(&base_url)
            .unwrap()
            .with_retry_policy(no_backoff(3, false));

        let event = StakeEvent {
            player_id: "player-1".into(),
            balance: 900,
            amount: 100,
            item: Item::Corn,
        };
        let err = client
            .submit_stake(&event)
            .await
            .expect_err("POST should not be retried by default");
        let Error::FailedWithBody { status, body } = err else {
            panic!("expected FailedWithBody, got {err:?}");
        };
        assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("POST"));
        assert!(body.contains("ledger/stake"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_http_notifier_posts_events() {
        let received = Arc::new(Mutex::new(Vec::<StakeEvent>::new()));
        let router = Router::new()
            .route(
                "/ledger/stake",
                post(
                    |AxumState(received): AxumState<Arc<Mutex<Vec<StakeEvent>>>>,
                     Json(event): Json<StakeEvent>| async move {
                        received.lock().unwrap().push(event);
                        AxumStatusCode::OK
                    },
                ),
            )
            .with_state(received.clone());

        let (base_url, handle) = serve_router(router).await;
        let client = Client::new(&base_url).unwrap();
        let (notifier, task) = HttpNotifier::spawn(client);

        let events: Vec<StakeEvent> = [(Item::Steak, 50, 950), (Item::Shrimp, 25, 925)]
            .into_iter()
            .map(|(item, amount, balance)| StakeEvent {
                player_id: "player-1".into(),
                balance,
                amount,
                item,
            })
            .collect();
        for event in &events {
            notifier.notify(event.clone());
        }
        drop(notifier);
        task.await.unwrap();

        assert_eq!(*received.lock().unwrap(), events);
        handle.abort();
    }

    #[tokio::test]
    async fn test_http_notifier_swallows_failures() {
        let router = Router::new().route(
            "/ledger/stake",
            post(|_body: axum::body::Bytes| async move { AxumStatusCode::BAD_REQUEST }),
        );
        let (base_url, handle) = serve_router(router).await;
        let (notifier, task) = HttpNotifier::spawn(Client::new(&base_url).unwrap());
        notifier.notify(StakeEvent {
            player_id: "player-1".into(),
            balance: 0,
            amount: 1,
            item: Item::Carrot,
        });
        drop(notifier);
        // The worker drains the failed event and exits cleanly.
        task.await.unwrap();
        handle.abort();
    }

    #[derive(Clone)]
    struct StalledLedger {
        received: Arc<Mutex<Vec<StakeEvent>>>,
        arrived: tokio::sync::mpsc::UnboundedSender<()>,
        gate: Arc<tokio::sync::Semaphore>,
    }

    #[tokio::test]
    async fn test_http_notifier_drops_when_queue_full() {
        let (arrived, mut arrivals) = tokio::sync::mpsc::unbounded_channel();
        let ledger = StalledLedger {
            received: Arc::new(Mutex::new(Vec::new())),
            arrived,
            gate: Arc::new(tokio::sync::Semaphore::new(0)),
        };
        let router = Router::new()
            .route(
                "/ledger/stake",
                post(
                    |AxumState(ledger): AxumState<StalledLedger>,
                     Json(event): Json<StakeEvent>| async move {
                        ledger.received.lock().unwrap().push(event);
                        let _ = ledger.arrived.send(());
                        ledger.gate.acquire().await.unwrap().forget();
                        AxumStatusCode::OK
                    },
                ),
            )
            .with_state(ledger.clone());

        let (base_url, handle) = serve_router(router).await;
        let (notifier, task) =
            HttpNotifier::spawn_with_capacity(Client::new(&base_url).unwrap(), 1);
        let events: Vec<StakeEvent> = [Item::Steak, Item::Corn, Item::Tomato]
            .into_iter()
            .map(|item| StakeEvent {
                player_id: "player-1".into(),
                balance: 100,
                amount: 10,
                item,
            })
            .collect();

        // The worker holds the first event in flight while the ledger stalls.
        notifier.notify(events[0].clone());
        arrivals.recv().await.unwrap();

        // One slot: the second event queues, the third is dropped without blocking.
        notifier.notify(events[1].clone());
        notifier.notify(events[2].clone());

        ledger.gate.add_permits(events.len());
        drop(notifier);
        task.await.unwrap();

        assert_eq!(*ledger.received.lock().unwrap(), events[..2].to_vec());
        handle.abort();
    }
}
