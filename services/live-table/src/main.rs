use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};
use clap::Parser;
use luckyeight_client::{Client, HttpNotifier, RetryPolicy};
use luckyeight_execution::{EngineBuilder, GameConfig, NoopNotifier, StakeNotifier};
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::{broadcast, oneshot};
use tracing::{info, warn, Level};

mod actor;
mod api;
mod config;
mod ingress;

use actor::{Actor, Outbound};
use api::AppState;
use config::{phase_config_from_env, Args};

const MAILBOX_SIZE: usize = 1024;
const BROADCAST_CAPACITY: usize = 1024;

fn init_tracing() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|raw| raw.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let phases = phase_config_from_env();
    phases
        .validate()
        .map_err(|reason| anyhow!(reason))
        .context("invalid phase timing")?;

    let rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (notifier, notifier_task, overrides) =
        match args.config_url.as_deref() {
            Some(config_url) => {
                let client = Client::new(config_url)
                    .context("invalid config url")?
                    .with_retry_policy(RetryPolicy {
                        max_attempts: args.fetch_attempts.max(1),
                        ..RetryPolicy::default()
                    });
                let overrides = client.hydrate(&args.player_id).await;
                let (notifier, task) = HttpNotifier::spawn(client);
                (
                    Box::new(notifier) as Box<dyn StakeNotifier + Send>,
                    Some(task),
                    Some(overrides),
                )
            }
            None => {
                info!("no config url; using built-in defaults");
                (Box::new(NoopNotifier) as Box<dyn StakeNotifier + Send>, None, None)
            }
        };

    let mut engine = EngineBuilder::new(GameConfig::default(), phases)
        .player_id(args.player_id.clone())
        .balance(args.initial_balance)
        .history_capacity(args.history_capacity)
        .first_round(args.round_seed)
        .build(rng, notifier);
    if let Some(overrides) = overrides {
        for err in engine.stage_config(&overrides) {
            warn!(%err, "ignored config override");
        }
    }

    let (broadcaster, _) = broadcast::channel::<Outbound>(BROADCAST_CAPACITY);
    let (actor, mailbox) = Actor::new(
        engine,
        Duration::from_millis(phases.tick_ms),
        broadcaster.clone(),
        MAILBOX_SIZE,
    );
    let (stop_actor, stopped) = oneshot::channel::<()>();
    let actor_task = tokio::spawn(actor.run(async move {
        let _ = stopped.await;
    }));

    let app = api::router(AppState {
        mailbox,
        broadcaster,
    });

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, player = %args.player_id, "live table service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(?err, "failed to listen for ctrl-c");
            }
        })
        .await
        .context("server error")?;

    info!("shutting down");
    let _ = stop_actor.send(());
    actor_task.await.context("table actor panicked")?;
    // The actor owned the last notifier handle, so the queue drains and closes.
    if let Some(task) = notifier_task {
        task.await.context("stake notifier panicked")?;
    }
    Ok(())
}
