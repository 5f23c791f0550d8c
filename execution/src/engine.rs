//! Round engine.
//!
//! [`RoundEngine`] owns every piece of mutable game state and drives the phase cycle
//! `Intermission -> Betting -> Drawing -> Showtime -> Intermission`. The engine never reads a
//! clock: the driver calls [`RoundEngine::tick`] with the current time and the engine advances at
//! most one step per call once the pending deadline is due. User intents are validated against
//! the current phase, open overlays, and the ledger; a rejected intent leaves state untouched.
//!
//! Config overrides are staged and swapped in as one immutable snapshot when the next round
//! begins, so rules never change mid-round.

use std::{collections::BTreeSet, sync::Arc};

use luckyeight_types::{
    EngineEvent, EngineSnapshot, Group, IntermissionStage, Item, Mode, Overlay, Phase,
    RoundRecord, RoundType, StakeEvent, Stakes, Winner, DEFAULT_FIRST_ROUND,
    DEFAULT_HISTORY_CAPACITY,
};
use rand::Rng;
use tracing::{debug, info};

use crate::{
    draw, payout, round_scheduler::PhaseConfig, Account, BetLedger, ConfigError, ConfigOverrides,
    GameConfig, ProgressTracker, RecordStore, Rejection, RoundScheduler, Settlement,
    StakeNotifier,
};

/// Starting parameters for a [`RoundEngine`].
#[derive(Clone, Debug)]
pub struct EngineBuilder {
    config: GameConfig,
    phases: PhaseConfig,
    player_id: String,
    account: Account,
    history_capacity: usize,
    first_round: u64,
}

impl EngineBuilder {
    pub fn new(config: GameConfig, phases: PhaseConfig) -> Self {
        Self {
            config,
            phases,
            player_id: String::new(),
            account: Account::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            first_round: DEFAULT_FIRST_ROUND,
        }
    }

    pub fn player_id(mut self, player_id: impl Into<String>) -> Self {
        self.player_id = player_id.into();
        self
    }

    pub fn balance(mut self, balance: u64) -> Self {
        self.account.balance = balance;
        self
    }

    /// Restore a full account (balance, lifetime stake and today's winnings).
    pub fn account(mut self, account: Account) -> Self {
        self.account = account;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn first_round(mut self, round: u64) -> Self {
        self.first_round = round;
        self
    }

    pub fn build<R: Rng, N: StakeNotifier>(self, rng: R, notifier: N) -> RoundEngine<R, N> {
        let progress = ProgressTracker::new(&self.config.milestones);
        RoundEngine {
            config: Arc::new(self.config),
            staged: None,
            session_end_hint_ms: None,
            scheduler: RoundScheduler::new(self.phases),
            rng,
            notifier,
            player_id: self.player_id,
            ledger: BetLedger::new(self.account),
            progress,
            records: RecordStore::new(self.history_capacity),
            round: self.first_round,
            round_type: RoundType::Normal,
            phase: Phase::Intermission,
            stage: None,
            phase_ends_at: None,
            winner: None,
            settlement: None,
            normal_since_jackpot: 0,
            overlays: BTreeSet::new(),
            mode: Mode::Basic,
            selected_chip: 0,
            last_bet: Stakes::new(),
            last_countdown: None,
            stopped: false,
        }
    }
}

pub struct RoundEngine<R, N> {
    config: Arc<GameConfig>,
    /// Applied when the next round begins.
    staged: Option<GameConfig>,
    /// Absolute session end supplied by the config provider. Consumed when betting opens.
    session_end_hint_ms: Option<u64>,
    scheduler: RoundScheduler,
    rng: R,
    notifier: N,
    player_id: String,

    ledger: BetLedger,
    progress: ProgressTracker,
    records: RecordStore,

    round: u64,
    round_type: RoundType,
    phase: Phase,
    stage: Option<IntermissionStage>,
    /// Pending phase deadline. `None` until started and after stop.
    phase_ends_at: Option<u64>,
    winner: Option<Winner>,
    settlement: Option<Settlement>,
    normal_since_jackpot: u32,

    overlays: BTreeSet<Overlay>,
    mode: Mode,
    selected_chip: usize,
    last_bet: Stakes,
    last_countdown: Option<u64>,
    stopped: bool,
}

impl<R: Rng, N: StakeNotifier> RoundEngine<R, N> {
    /// Enter the first intermission. Calling it again has no effect.
    pub fn start(&mut self, now_ms: u64) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.stopped || self.phase_ends_at.is_some() {
            return events;
        }
        info!(round = self.round, player = %self.player_id, "round engine started");
        self.enter_intermission(now_ms, &mut events);
        events
    }

    /// Cancel the phase timer. Later ticks and intents are no-ops.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.phase_ends_at = None;
        info!(round = self.round, phase = self.phase.as_str(), "round engine stopped");
    }

    /// Advance the phase cycle if the pending deadline is due.
    pub fn tick(&mut self, now_ms: u64) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        let Some(ends_at) = self.phase_ends_at else {
            return events;
        };
        if self.scheduler.is_due(ends_at, now_ms) {
            self.advance(now_ms, &mut events);
        }
        if self.phase == Phase::Betting {
            self.push_countdown(now_ms, &mut events);
        }
        events
    }

    fn advance(&mut self, now_ms: u64, events: &mut Vec<EngineEvent>) {
        match (self.phase, self.stage) {
            (Phase::Intermission, Some(IntermissionStage::Banner)) => {
                self.stage = Some(IntermissionStage::GetReady);
                self.phase_ends_at = Some(self.scheduler.get_ready_ends_at(now_ms));
                events.push(self.phase_changed());
            }
            (Phase::Intermission, _) => self.open_betting(now_ms, events),
            (Phase::Betting, _) => self.close_betting(now_ms, events),
            (Phase::Drawing, _) => self.settle_round(now_ms, events),
            (Phase::Showtime, _) => self.finish_round(now_ms, events),
        }
    }

    fn enter_intermission(&mut self, now_ms: u64, events: &mut Vec<EngineEvent>) {
        if let Some(config) = self.staged.take() {
            self.progress.update_specs(&config.milestones);
            self.config = Arc::new(config);
            debug!(round = self.round, "config snapshot swapped in");
        }
        if self.mode == Mode::Advanced && !self.advanced_unlocked() {
            self.mode = Mode::Basic;
        }
        self.selected_chip = self.selected_chip.min(self.available_chips().len().saturating_sub(1));

        let every = self.config.jackpot_every;
        self.round_type = if every > 0 && self.normal_since_jackpot >= every {
            RoundType::Jackpot
        } else {
            RoundType::Normal
        };
        self.phase = Phase::Intermission;
        self.stage = Some(IntermissionStage::Banner);
        self.phase_ends_at = Some(self.scheduler.banner_ends_at(now_ms));
        debug!(
            round = self.round,
            round_type = self.round_type.as_str(),
            "intermission"
        );
        events.push(self.phase_changed());
    }

    fn open_betting(&mut self, now_ms: u64, events: &mut Vec<EngineEvent>) {
        let hint = self.session_end_hint_ms.take();
        let ends_at = self.scheduler.betting_ends_at(now_ms, hint);
        self.phase = Phase::Betting;
        self.stage = None;
        self.phase_ends_at = Some(ends_at);
        self.last_countdown = None;
        debug!(
            round = self.round,
            betting_ms = ends_at.saturating_sub(now_ms),
            hinted = hint.is_some(),
            "betting open"
        );
        events.push(self.phase_changed());
    }

    fn close_betting(&mut self, now_ms: u64, events: &mut Vec<EngineEvent>) {
        let winner = draw::draw(&mut self.rng, self.round_type, &self.config);
        self.winner = Some(winner);
        self.phase = Phase::Drawing;
        self.phase_ends_at = Some(self.scheduler.drawing_ends_at(now_ms, self.round_type));
        debug!(round = self.round, ?winner, "winner drawn");
        events.push(self.phase_changed());
        events.push(EngineEvent::WinnerDrawn {
            round: self.round,
            winner,
        });
    }

    fn settle_round(&mut self, now_ms: u64, events: &mut Vec<EngineEvent>) {
        let round_type = self.round_type;
        let winner = *self
            .winner
            .get_or_insert_with(|| draw::draw(&mut self.rng, round_type, &self.config));
        let stakes = *self.ledger.stakes();
        let settlement = payout::settle(&stakes, winner, &self.config);
        let balance_before = self.ledger.account().balance;
        let (selected, selected_amount) = match stakes.largest() {
            Some((item, amount)) => (Some(item), amount),
            None => (None, 0),
        };
        let record = RoundRecord {
            round: self.round,
            timestamp_ms: now_ms,
            round_type,
            winner,
            selected,
            selected_amount,
            total_stake: settlement.total_stake,
            payout: settlement.payout,
            outcome: settlement.outcome,
            balance_before,
            balance_after: balance_before.saturating_add(settlement.payout),
        };
        info!(
            round = self.round,
            round_type = round_type.as_str(),
            payout = settlement.payout,
            outcome = settlement.outcome.as_str(),
            "round settled"
        );
        self.records.push(record.clone());
        self.settlement = Some(settlement);
        self.phase = Phase::Showtime;
        self.phase_ends_at = Some(self.scheduler.showtime_ends_at(now_ms, round_type));
        events.push(EngineEvent::Settled { record });
        events.push(self.phase_changed());
    }

    fn finish_round(&mut self, now_ms: u64, events: &mut Vec<EngineEvent>) {
        let payout = self.settlement.map_or(0, |settlement| settlement.payout);
        let ready_before = self.progress.ready(self.ledger.account().today_win);
        self.ledger.credit_payout(payout);
        let today_win = self.ledger.account().today_win;
        events.push(EngineEvent::PayoutApplied {
            round: self.round,
            payout,
            balance: self.ledger.account().balance,
        });
        for index in self.progress.ready(today_win) {
            if !ready_before.contains(&index) {
                let threshold = self.progress.milestones()[index].threshold;
                info!(index, threshold, today_win, "milestone ready");
                events.push(EngineEvent::MilestoneReady { index, threshold });
            }
        }

        let stakes = self.ledger.clear_stakes();
        if !stakes.is_empty() {
            self.last_bet = stakes;
        }
        self.normal_since_jackpot = match self.round_type {
            RoundType::Normal => self.normal_since_jackpot.saturating_add(1),
            RoundType::Jackpot => 0,
        };
        self.winner = None;
        self.settlement = None;
        self.round = self.round.saturating_add(1);
        self.enter_intermission(now_ms, events);
    }

    fn push_countdown(&mut self, now_ms: u64, events: &mut Vec<EngineEvent>) {
        let Some(ends_at) = self.phase_ends_at else {
            return;
        };
        let secs = self.scheduler.countdown_secs(ends_at, now_ms);
        if self.last_countdown != Some(secs) {
            self.last_countdown = Some(secs);
            events.push(EngineEvent::Countdown {
                round: self.round,
                secs,
            });
        }
    }

    fn phase_changed(&self) -> EngineEvent {
        EngineEvent::PhaseChanged {
            round: self.round,
            round_type: self.round_type,
            phase: self.phase,
            stage: self.stage,
        }
    }

    fn ensure_running(&self) -> Result<(), Rejection> {
        if self.stopped {
            return Err(Rejection::Stopped);
        }
        Ok(())
    }

    fn ensure_betting(&self, now_ms: u64) -> Result<(), Rejection> {
        self.ensure_running()?;
        let ends_at = self.phase_ends_at.unwrap_or(0);
        if !self.scheduler.is_betting_open(self.phase, ends_at, now_ms) {
            return Err(Rejection::WrongPhase(self.phase));
        }
        if let Some(overlay) = self.overlays.iter().next() {
            return Err(Rejection::Blocked(*overlay));
        }
        Ok(())
    }

    fn rejected(&self, intent: &'static str, err: Rejection) -> Rejection {
        debug!(round = self.round, phase = self.phase.as_str(), intent, %err, "intent rejected");
        err
    }

    fn stake_entries(
        &mut self,
        now_ms: u64,
        intent: &'static str,
        entries: &[(Item, u64)],
    ) -> Result<(), Rejection> {
        self.ensure_betting(now_ms)
            .map_err(|err| self.rejected(intent, err))?;
        let max_stakes = self.config.max_stakes;
        if let Err(err) = self.ledger.place_many(entries, max_stakes) {
            return Err(self.rejected(intent, err));
        }

        // Report the running balance after each item's debit.
        let remaining: u64 = entries.iter().map(|(_, amount)| *amount).sum();
        let mut balance = self.ledger.account().balance.saturating_add(remaining);
        for (item, amount) in entries {
            balance = balance.saturating_sub(*amount);
            debug!(round = self.round, item = item.as_str(), amount, balance, "stake accepted");
            self.notifier.notify(StakeEvent {
                player_id: self.player_id.clone(),
                balance,
                amount: *amount,
                item: *item,
            });
        }
        Ok(())
    }

    /// Stake `amount` on a single item.
    pub fn place_stake(&mut self, now_ms: u64, item: Item, amount: u64) -> Result<(), Rejection> {
        self.stake_entries(now_ms, "stake", &[(item, amount)])
    }

    /// Stake `amount` on each of the group's four items, all or nothing.
    pub fn place_group_stake(
        &mut self,
        now_ms: u64,
        group: Group,
        amount: u64,
    ) -> Result<(), Rejection> {
        let entries = group.items().map(|item| (item, amount));
        self.stake_entries(now_ms, "group_stake", &entries)
    }

    /// Re-place the most recent non-empty stake map, all or nothing.
    pub fn repeat_last_bet(&mut self, now_ms: u64) -> Result<(), Rejection> {
        if self.last_bet.is_empty() {
            return Err(self.rejected("rebet", Rejection::NothingToRepeat));
        }
        let entries: Vec<(Item, u64)> = self.last_bet.iter().collect();
        self.stake_entries(now_ms, "rebet", &entries)
    }

    pub fn select_chip(&mut self, index: usize) -> Result<(), Rejection> {
        self.ensure_running()
            .map_err(|err| self.rejected("chip", err))?;
        if index >= self.config.chips.len() {
            return Err(self.rejected("chip", Rejection::UnknownChip(index)));
        }
        if index >= self.available_chips().len() {
            return Err(self.rejected("chip", Rejection::ModeLocked));
        }
        self.selected_chip = index;
        Ok(())
    }

    fn selected_amount(&self) -> Result<u64, Rejection> {
        self.config
            .chips
            .get(self.selected_chip)
            .copied()
            .ok_or(Rejection::UnknownChip(self.selected_chip))
    }

    pub fn stake_selected_chip(&mut self, now_ms: u64, item: Item) -> Result<(), Rejection> {
        let amount = self
            .selected_amount()
            .map_err(|err| self.rejected("stake_chip", err))?;
        self.stake_entries(now_ms, "stake_chip", &[(item, amount)])
    }

    pub fn stake_selected_chip_on_group(
        &mut self,
        now_ms: u64,
        group: Group,
    ) -> Result<(), Rejection> {
        let amount = self
            .selected_amount()
            .map_err(|err| self.rejected("group_chip", err))?;
        let entries = group.items().map(|item| (item, amount));
        self.stake_entries(now_ms, "group_chip", &entries)
    }

    /// Claim a ready milestone. Returns the reward, which is tallied in `bonus_claimed`.
    pub fn open_milestone(&mut self, index: usize) -> Result<u64, Rejection> {
        self.ensure_running()
            .map_err(|err| self.rejected("open_milestone", err))?;
        let today_win = self.ledger.account().today_win;
        match self.progress.open(index, today_win) {
            Ok(reward) => {
                info!(index, reward, "milestone opened");
                Ok(reward)
            }
            Err(err) => Err(self.rejected("open_milestone", err)),
        }
    }

    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Rejection> {
        self.ensure_running()
            .map_err(|err| self.rejected("mode", err))?;
        if mode == Mode::Advanced && !self.advanced_unlocked() {
            return Err(self.rejected("mode", Rejection::ModeLocked));
        }
        self.mode = mode;
        self.selected_chip = self.selected_chip.min(self.available_chips().len().saturating_sub(1));
        Ok(())
    }

    pub fn open_overlay(&mut self, overlay: Overlay) -> Result<(), Rejection> {
        self.ensure_running()
            .map_err(|err| self.rejected("overlay", err))?;
        self.overlays.insert(overlay);
        Ok(())
    }

    pub fn close_overlay(&mut self, overlay: Overlay) -> Result<(), Rejection> {
        self.ensure_running()
            .map_err(|err| self.rejected("overlay", err))?;
        self.overlays.remove(&overlay);
        Ok(())
    }

    /// Zero today's winnings and re-arm every milestone.
    pub fn reset_progress(&mut self) -> Result<(), Rejection> {
        self.ensure_running()
            .map_err(|err| self.rejected("reset_progress", err))?;
        self.ledger.reset_today_win();
        self.progress.reset();
        info!(round = self.round, "progress reset");
        Ok(())
    }

    /// Stage provider values for the next round and remember any session-end hint.
    ///
    /// Returns the fields that failed validation; those keep their current values.
    pub fn stage_config(&mut self, overrides: &ConfigOverrides) -> Vec<ConfigError> {
        if let Some(end_ms) = overrides.session_end_ms {
            self.session_end_hint_ms = Some(end_ms);
        }
        let mut next = self
            .staged
            .take()
            .unwrap_or_else(|| GameConfig::clone(&self.config));
        let errors = next.apply(overrides);
        for err in &errors {
            debug!(%err, "override rejected");
        }
        self.staged = Some(next);
        errors
    }
}

impl<R, N> RoundEngine<R, N> {
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn round_type(&self) -> RoundType {
        self.round_type
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stage(&self) -> Option<IntermissionStage> {
        self.stage
    }

    pub fn phase_ends_at(&self) -> Option<u64> {
        self.phase_ends_at
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    pub fn account(&self) -> &Account {
        self.ledger.account()
    }

    pub fn stakes(&self) -> &Stakes {
        self.ledger.stakes()
    }

    pub fn config(&self) -> &Arc<GameConfig> {
        &self.config
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn history(&self) -> Vec<RoundRecord> {
        self.records.to_vec()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected_chip(&self) -> usize {
        self.selected_chip
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn advanced_unlocked(&self) -> bool {
        self.config.advanced_mode_override
            || self.ledger.account().lifetime_stake >= self.config.advanced_unlock_stake
    }

    /// Chips selectable in the current mode.
    pub fn available_chips(&self) -> &[u64] {
        let chips = &self.config.chips;
        match self.mode {
            Mode::Advanced => chips,
            Mode::Basic => &chips[..self.config.basic_chip_count.min(chips.len())],
        }
    }

    /// Normal rounds left before a jackpot round is forced.
    pub fn jackpot_in(&self) -> u32 {
        self.config
            .jackpot_every
            .saturating_sub(self.normal_since_jackpot)
    }

    pub fn snapshot(&self, now_ms: u64) -> EngineSnapshot {
        let account = self.ledger.account();
        let time_left_ms = self
            .phase_ends_at
            .map_or(0, |ends_at| ends_at.saturating_sub(now_ms));
        let time_left_secs = match (self.phase, self.phase_ends_at) {
            (Phase::Betting, Some(ends_at)) => self.scheduler.countdown_secs(ends_at, now_ms),
            _ => 0,
        };
        EngineSnapshot {
            round: self.round,
            round_type: self.round_type,
            phase: self.phase,
            stage: self.stage,
            time_left_ms,
            time_left_secs,
            stakes: *self.ledger.stakes(),
            winner: self.winner,
            payout: self.settlement.map(|settlement| settlement.payout),
            outcome: self.settlement.map(|settlement| settlement.outcome),
            balance: account.balance,
            lifetime_stake: account.lifetime_stake,
            today_win: account.today_win,
            bonus_claimed: self.progress.bonus_claimed(),
            milestones: self.progress.views(account.today_win),
            progress: self.progress.fraction(account.today_win),
            mode: self.mode,
            advanced_unlocked: self.advanced_unlocked(),
            chips: self.available_chips().to_vec(),
            selected_chip: self.selected_chip,
            overlays: self.overlays.iter().copied().collect(),
            jackpot_in: self.jackpot_in(),
            history: self.records.to_vec(),
        }
    }
}
