use std::{
    future::Future,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use luckyeight_execution::{Rejection, RoundEngine, StakeNotifier};
use luckyeight_types::{EngineEvent, EngineSnapshot};
use rand::Rng;
use serde::Serialize;
use tokio::{
    sync::{broadcast, mpsc},
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::ingress::{Intent, IntentOutcome, Mailbox, Message};

/// Messages pushed to every connected presentation client.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    State { snapshot: EngineSnapshot },
    Event { event: EngineEvent },
}

/// Milliseconds since the Unix epoch. Session-end hints use the same clock.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Owns the engine and serializes every tick and intent through one task.
pub struct Actor<R, N> {
    engine: RoundEngine<R, N>,
    mailbox: mpsc::Receiver<Message>,
    broadcaster: broadcast::Sender<Outbound>,
    tick: Duration,
}

impl<R: Rng, N: StakeNotifier> Actor<R, N> {
    pub fn new(
        engine: RoundEngine<R, N>,
        tick: Duration,
        broadcaster: broadcast::Sender<Outbound>,
        mailbox_size: usize,
    ) -> (Self, Mailbox) {
        let (sender, mailbox) = mpsc::channel(mailbox_size);
        (
            Self {
                engine,
                mailbox,
                broadcaster,
                tick,
            },
            Mailbox::new(sender),
        )
    }

    /// Drive the engine until `shutdown` resolves or every mailbox is dropped.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        let events = self.engine.start(now_ms());
        self.publish(events);

        let mut interval = time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    let events = self.engine.tick(now_ms());
                    self.publish(events);
                },
                message = self.mailbox.recv() => {
                    let Some(message) = message else {
                        break;
                    };
                    self.handle(message);
                },
            }
        }

        self.engine.stop();
        info!(round = self.engine.round(), "table actor exited");
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Intent { intent, response } => {
                let now = now_ms();
                let rejection = self.apply(intent, now).err();
                if let Some(rejection) = rejection {
                    debug!(%rejection, "intent ignored");
                }
                let snapshot = self.engine.snapshot(now);
                let _ = self.broadcaster.send(Outbound::State {
                    snapshot: snapshot.clone(),
                });
                let _ = response.send(IntentOutcome {
                    snapshot,
                    rejection,
                });
            }
            Message::Snapshot { response } => {
                let _ = response.send(self.engine.snapshot(now_ms()));
            }
            Message::History { response } => {
                let _ = response.send(self.engine.history());
            }
        }
    }

    fn apply(&mut self, intent: Intent, now: u64) -> Result<(), Rejection> {
        let engine = &mut self.engine;
        match intent {
            Intent::Stake { item, amount } => engine.place_stake(now, item, amount),
            Intent::GroupStake { group, amount } => engine.place_group_stake(now, group, amount),
            Intent::Chip { index } => engine.select_chip(index),
            Intent::StakeChip { item } => engine.stake_selected_chip(now, item),
            Intent::GroupChip { group } => engine.stake_selected_chip_on_group(now, group),
            Intent::Rebet => engine.repeat_last_bet(now),
            Intent::OpenMilestone { index } => engine.open_milestone(index).map(|_| ()),
            Intent::Mode { mode } => engine.set_mode(mode),
            Intent::Overlay {
                overlay,
                open: true,
            } => engine.open_overlay(overlay),
            Intent::Overlay {
                overlay,
                open: false,
            } => engine.close_overlay(overlay),
            Intent::ResetProgress => engine.reset_progress(),
        }
    }

    /// Broadcast engine events followed by a fresh snapshot.
    fn publish(&self, events: Vec<EngineEvent>) {
        // No receivers is fine; presentation may not be connected yet.
        for event in events {
            let _ = self.broadcaster.send(Outbound::Event { event });
        }
        let _ = self.broadcaster.send(Outbound::State {
            snapshot: self.engine.snapshot(now_ms()),
        });
    }
}
