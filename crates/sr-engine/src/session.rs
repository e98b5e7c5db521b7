//! SpinSession — the spin lifecycle state machine
//!
//! The session is the only writer of credit, bet and state. Drive it with
//! [`SpinSession::tick`] once per animation frame; inputs (spin requests,
//! bet changes, turbo hold) may arrive between ticks.
//!
//! ```text
//! Idle ──spin──> Spinning ──all reels settled──> evaluate
//!  ^                                               │
//!  ├──────────────── win == 0 ─────────────────────┤
//!  └── pause elapsed ── Presenting <── win > 0 ────┘
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use sr_core::SrResult;
use sr_stage::{Cue, Stage, StageEvent, StagePayload, StageTrace};

use crate::config::MachineConfig;
use crate::easing::clamp01;
use crate::extract::{ResultGrid, extract_column, extract_grid};
use crate::motion::MotionController;
use crate::paytable::WinResult;
use crate::reel::{Reel, ReelFrame};
use crate::scheduler::{FrameScheduler, JoinStatus, SpinJoin};
use crate::stats::SessionStats;
use crate::symbols::SymbolCatalog;
use crate::timing::MotionProfile;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Accepting spin requests and bet changes
    Idle,
    /// Reels in motion
    Spinning { turbo: bool },
    /// Win on screen; `fast` selects the turbo pause and dim
    Presenting {
        fast: bool,
        since_ms: f64,
        until_ms: f64,
    },
}

/// Where a spin request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinSource {
    /// Spin button (plays the click cue)
    Button,
    /// Turbo hold input
    TurboHold,
    /// Programmatic caller
    External,
}

/// A request to start a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRequest {
    pub turbo: bool,
    pub source: SpinSource,
}

impl SpinRequest {
    pub fn new(turbo: bool) -> Self {
        Self {
            turbo,
            source: SpinSource::External,
        }
    }

    pub fn button() -> Self {
        Self {
            turbo: false,
            source: SpinSource::Button,
        }
    }

    pub fn turbo_hold() -> Self {
        Self {
            turbo: true,
            source: SpinSource::TurboHold,
        }
    }
}

/// Spin session
pub struct SpinSession {
    config: MachineConfig,
    catalog: SymbolCatalog,
    motion: MotionController,
    scheduler: FrameScheduler,
    reels: Vec<Reel>,
    rng: StdRng,

    state: SessionState,
    credit: f64,
    bet: u32,
    /// Amount actually debited for the spin in flight
    spin_debit: f64,

    turbo_held: bool,
    turbo_armed: bool,
    /// One turbo spin owed to the hold loop, issued on the next tick
    reissue_pending: bool,

    join: Option<SpinJoin>,
    last_grid: ResultGrid,
    last_win: Option<WinResult>,

    events: Vec<StageEvent>,
    trace: Option<StageTrace>,
    last_trace: Option<StageTrace>,
    stats: SessionStats,
    spin_count: u64,
    now_ms: f64,
}

impl SpinSession {
    /// Create a session with an OS-seeded RNG
    pub fn new(config: MachineConfig) -> SrResult<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a reproducible session
    pub fn with_seed(config: MachineConfig, seed: u64) -> SrResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: MachineConfig, mut rng: StdRng) -> SrResult<Self> {
        config.validate()?;

        let catalog = config.catalog();
        let mut reels: Vec<Reel> = (0..config.grid.reels)
            .map(|column| Reel::new(column, &config.grid, &catalog, &mut rng))
            .collect();
        for reel in reels.iter_mut() {
            reel.layout_frozen(&config.grid);
        }
        let last_grid = extract_grid(&reels, &config.grid);

        log::info!(
            "Session ready: '{}' {}x{} with {} symbols",
            config.name,
            config.grid.reels,
            config.grid.rows,
            catalog.len()
        );

        Ok(Self {
            motion: MotionController::new(config.normal.clone(), config.turbo.clone()),
            scheduler: FrameScheduler::new(config.blur_gain),
            credit: config.economy.starting_credit,
            bet: config.economy.default_bet,
            spin_debit: 0.0,
            catalog,
            reels,
            rng,
            state: SessionState::Idle,
            turbo_held: false,
            turbo_armed: false,
            reissue_pending: false,
            join: None,
            last_grid,
            last_win: None,
            events: Vec::new(),
            trace: None,
            last_trace: None,
            stats: SessionStats::default(),
            spin_count: 0,
            now_ms: 0.0,
            config,
        })
    }

    /// Reseed the RNG for reproducible spins
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// True while a spin or its win presentation is in progress
    pub fn is_spinning(&self) -> bool {
        !self.is_idle()
    }

    /// Spin button and bet controls accept input
    pub fn controls_enabled(&self) -> bool {
        self.is_idle()
    }

    pub fn credit(&self) -> f64 {
        self.credit
    }

    pub fn bet(&self) -> u32 {
        self.bet
    }

    pub fn turbo_held(&self) -> bool {
        self.turbo_held
    }

    /// A turbo re-issue is waiting for the next tick
    pub fn has_pending_reissue(&self) -> bool {
        self.reissue_pending
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn last_grid(&self) -> &ResultGrid {
        &self.last_grid
    }

    pub fn last_win(&self) -> Option<&WinResult> {
        self.last_win.as_ref()
    }

    /// Trace of the most recently completed spin
    pub fn last_trace(&self) -> Option<&StageTrace> {
        self.last_trace.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    /// Take all stage events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render snapshot of every reel
    pub fn frames(&self) -> Vec<ReelFrame> {
        self.reels
            .iter()
            .map(|reel| reel.frame(&self.config.grid))
            .collect()
    }

    /// Opacity of the win dim overlay
    pub fn dim_alpha(&self, now_ms: f64) -> f64 {
        match self.state {
            SessionState::Presenting { fast, since_ms, .. } => {
                let profile = self.presentation_profile(fast);
                if profile.dim_fade_ms <= 0.0 {
                    return profile.dim_alpha;
                }
                profile.dim_alpha * clamp01((now_ms - since_ms) / profile.dim_fade_ms)
            }
            _ => 0.0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INPUTS
    // ═══════════════════════════════════════════════════════════════════════

    /// Start a spin if idle. Returns false when the request was ignored.
    pub fn request_spin(&mut self, request: SpinRequest) -> bool {
        if !self.is_idle() {
            log::debug!("Spin request ignored: session is {:?}", self.state);
            self.emit(Stage::SpinRejected, StagePayload::default());
            return false;
        }
        let click = request.source == SpinSource::Button;
        self.start_spin(request.turbo, click);
        true
    }

    /// Spin button press: click cue and a normal spin
    pub fn press_spin_button(&mut self) -> bool {
        self.request_spin(SpinRequest::button())
    }

    pub fn increment_bet(&mut self) -> bool {
        self.set_bet(self.bet.saturating_add(1))
    }

    pub fn decrement_bet(&mut self) -> bool {
        self.set_bet(self.bet.saturating_sub(1))
    }

    /// Set the bet, clamped to the configured bounds. Ignored unless idle.
    pub fn set_bet(&mut self, bet: u32) -> bool {
        if !self.controls_enabled() {
            log::debug!("Bet change ignored while {:?}", self.state);
            return false;
        }
        let economy = &self.config.economy;
        let clamped = bet.clamp(economy.min_bet, economy.max_bet);
        if clamped == self.bet {
            return false;
        }
        self.bet = clamped;
        self.emit(Stage::BetChanged { bet: clamped }, StagePayload::default());
        true
    }

    /// Assert the turbo hold. Starts a turbo spin right away when idle.
    pub fn press_turbo_hold(&mut self, now_ms: f64) {
        if self.turbo_held {
            return;
        }
        self.now_ms = self.now_ms.max(now_ms);
        self.turbo_held = true;
        self.turbo_armed = true;
        self.emit(Stage::TurboHold { held: true }, StagePayload::default());

        if self.is_idle() {
            self.start_spin(true, false);
        }
    }

    /// Release the turbo hold. An in-flight spin still runs to completion.
    pub fn release_turbo_hold(&mut self) {
        if !self.turbo_held {
            return;
        }
        self.turbo_held = false;
        self.turbo_armed = false;
        self.reissue_pending = false;
        self.emit(Stage::TurboHold { held: false }, StagePayload::default());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FRAME LOOP
    // ═══════════════════════════════════════════════════════════════════════

    /// Advance the session to `now_ms`
    pub fn tick(&mut self, now_ms: f64) {
        self.now_ms = now_ms;

        if self.reissue_pending && self.is_idle() {
            self.reissue_pending = false;
            if self.turbo_held {
                log::debug!("Turbo hold re-issue");
                self.start_spin(true, false);
            }
        }

        match self.state {
            SessionState::Spinning { turbo } => self.advance_spin(turbo),
            SessionState::Presenting { until_ms, .. } if now_ms >= until_ms => {
                self.return_to_idle();
            }
            _ => {}
        }
    }

    fn start_spin(&mut self, turbo: bool, click: bool) {
        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);
        self.trace = Some(StageTrace::new(&spin_id, &self.config.name).with_turbo(turbo));
        self.state = SessionState::Spinning { turbo };
        self.reissue_pending = false;

        if click {
            self.emit_cue(Cue::SpinClick);
        }
        self.emit(Stage::Controls { enabled: false }, StagePayload::default());
        self.emit(Stage::WinClear, StagePayload::default());

        let debited = (self.bet as f64).min(self.credit);
        self.credit = (self.credit - self.bet as f64).max(0.0);
        self.spin_debit = debited;

        let payload = StagePayload::balance(self.credit)
            .with_bet(self.bet as f64)
            .with_spin_id(&spin_id);
        self.emit(Stage::SpinStart { turbo }, payload);
        self.emit_cue(Cue::ReelFall);

        self.scheduler.begin_spin();
        let plan = self
            .motion
            .plan(turbo, self.config.grid.reels, &mut self.rng);
        self.join = Some(self.motion.launch(&plan, &mut self.reels, self.now_ms));
        for column in 0..self.config.grid.reels {
            self.emit(
                Stage::ReelSpinning { reel_index: column },
                StagePayload::default(),
            );
        }

        log::info!(
            "{} started ({}, bet {}, credit {:.2}, longest reel {:.0}ms)",
            spin_id,
            plan.profile.display_name(),
            self.bet,
            self.credit,
            plan.longest_ms()
        );
    }

    fn advance_spin(&mut self, turbo: bool) {
        let settled = self.scheduler.advance(
            &mut self.reels,
            self.now_ms,
            &self.config.grid,
            &self.catalog,
            &mut self.rng,
        );
        for done in settled {
            let symbols = extract_column(&self.reels[done.column as usize], &self.config.grid);
            self.emit(
                Stage::ReelStop {
                    reel_index: done.column,
                    symbols,
                },
                StagePayload::default(),
            );
        }

        let joined = match self.join.as_mut() {
            Some(join) => matches!(join.poll(), JoinStatus::Complete(_)),
            None => true,
        };
        if joined && self.reels.iter().all(|r| !r.is_spinning()) {
            self.join = None;
            self.resolve_spin(turbo);
        }
    }

    fn resolve_spin(&mut self, turbo: bool) {
        self.scheduler.final_pass(&mut self.reels, &self.config.grid);
        let grid = extract_grid(&self.reels, &self.config.grid);
        for reel in self.reels.iter_mut() {
            reel.settle_visuals();
        }

        self.emit(
            Stage::EvaluateWins,
            StagePayload::balance(self.credit).with_grid(grid.to_rows()),
        );
        let result = self.config.paytable.evaluate(&grid);
        self.stats.record(self.spin_debit, &result, turbo);
        self.last_grid = grid;

        match result.cue() {
            Some(cue) => {
                self.credit += result.total;
                self.emit_cue(cue);
                let payload = StagePayload::balance(self.credit).with_win(
                    result.total,
                    result.win_lines(),
                    result.cell_pairs(),
                );
                self.emit(
                    Stage::WinPresent {
                        win_amount: result.total,
                        pattern_count: result.patterns.len().min(u8::MAX as usize) as u8,
                    },
                    payload,
                );

                let fast = turbo || self.turbo_held;
                let hold_ms = self.presentation_profile(fast).presentation_ms();
                self.state = SessionState::Presenting {
                    fast,
                    since_ms: self.now_ms,
                    until_ms: self.now_ms + hold_ms,
                };
                log::info!(
                    "Win {:.2} from {} pattern(s), presenting for {:.0}ms",
                    result.total,
                    result.patterns.len(),
                    hold_ms
                );
                self.last_win = Some(result);
            }
            None => {
                self.last_win = Some(result);
                self.return_to_idle();
            }
        }
    }

    fn return_to_idle(&mut self) {
        if matches!(self.state, SessionState::Presenting { .. }) {
            self.emit(Stage::WinClear, StagePayload::default());
        }
        self.state = SessionState::Idle;
        self.emit(Stage::Controls { enabled: true }, StagePayload::default());
        self.emit(Stage::SpinEnd, StagePayload::balance(self.credit));

        if let Some(trace) = self.trace.take() {
            let validation = trace.validate();
            if !validation.is_valid() {
                log::warn!(
                    "Trace {} incomplete: {}",
                    trace.spin_id,
                    validation.warnings().join(", ")
                );
            }
            log::info!(
                "{} finished (win {:.2}, credit {:.2})",
                trace.spin_id,
                trace.total_win(),
                self.credit
            );
            self.last_trace = Some(trace);
        }

        if self.turbo_armed && self.turbo_held {
            self.reissue_pending = true;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    fn presentation_profile(&self, fast: bool) -> &MotionProfile {
        self.motion.profile(fast)
    }

    fn emit_cue(&mut self, cue: Cue) {
        self.emit(Stage::Cue { cue }, StagePayload::default());
    }

    fn emit(&mut self, stage: Stage, payload: StagePayload) {
        let event = StageEvent::with_payload(stage, self.now_ms, payload);
        if let Some(trace) = self.trace.as_mut() {
            trace.push(event.clone());
        }
        self.events.push(event);
    }
}
