//! Timer engine implementation.
//!
//! The timer engine is a tick-counting state machine. It does not use
//! internal threads or wall-clock deltas: the caller delivers one `tick()`
//! per second, and each call advances the countdown by exactly one second.
//! Host sleep or delivery jitter only delays completion.
//!
//! ## State Transitions
//!
//! ```text
//! Work -> ShortBreak -> Work -> ... -> Work -> LongBreak -> Work
//!        (every `pomodoros_before_long_break`-th Work ends in LongBreak)
//! ```
//!
//! Phase durations are re-read from the [`TimerConfiguration`] passed to each
//! call, so a settings change takes effect at the next phase boundary (or
//! immediately on `reset`).
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(&config, store);
//! engine.toggle_run();
//! // Once per second:
//! if let Some(event) = engine.tick(&config)? { /* phase completed */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::config::TimerConfiguration;
use crate::error::UnsavedSession;
use crate::events::Event;
use crate::session::FocusSession;
use crate::storage::SessionStore;

/// Live countdown state. Never persisted; only completed Work phases are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub seconds_remaining: u32,
    /// Length of the current phase as computed when it began (or was reset).
    pub phase_total_seconds: u32,
    pub is_running: bool,
    /// Completed Work phases since the last long break.
    pub consecutive_work_periods: u32,
}

impl TimerState {
    /// Fresh state: a full Work phase, paused.
    pub fn initial(config: &TimerConfiguration) -> Self {
        let total = Phase::Work.duration_secs(config);
        Self {
            phase: Phase::Work,
            seconds_remaining: total,
            phase_total_seconds: total,
            is_running: false,
            consecutive_work_periods: 0,
        }
    }

    /// 0.0 .. 1.0 elapsed fraction of the current phase.
    pub fn progress(&self) -> f64 {
        if self.phase_total_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.seconds_remaining as f64 / self.phase_total_seconds as f64)
    }

    /// 1-based index of the pomodoro in the current set.
    pub fn pomodoro_number(&self) -> u32 {
        self.consecutive_work_periods + 1
    }
}

/// Core timer engine.
///
/// Owns the countdown state and an injected [`SessionStore`] that receives
/// one [`FocusSession`] per completed Work phase.
pub struct TimerEngine<S> {
    state: TimerState,
    store: S,
    clock: fn() -> DateTime<Utc>,
}

impl<S: SessionStore> TimerEngine<S> {
    /// Create an engine in the initial Work state.
    pub fn new(config: &TimerConfiguration, store: S) -> Self {
        Self {
            state: TimerState::initial(config),
            store,
            clock: Utc::now,
        }
    }

    /// Replace the clock used to stamp events and sessions.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.state.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn consecutive_work_periods(&self) -> u32 {
        self.state.consecutive_work_periods
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            seconds_remaining: self.state.seconds_remaining,
            total_seconds: self.state.phase_total_seconds,
            is_running: self.state.is_running,
            consecutive_work_periods: self.state.consecutive_work_periods,
            pomodoro_number: self.state.pomodoro_number(),
            progress: self.state.progress(),
            at: (self.clock)(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flip between running and paused. Countdown and phase are untouched.
    pub fn toggle_run(&mut self) -> Event {
        self.state.is_running = !self.state.is_running;
        Event::TimerToggled {
            is_running: self.state.is_running,
            phase: self.state.phase,
            seconds_remaining: self.state.seconds_remaining,
            at: (self.clock)(),
        }
    }

    /// Restart the current phase's countdown from `config`.
    ///
    /// Phase and run flag are preserved. Progress in an unfinished Work phase
    /// is discarded; nothing is recorded.
    pub fn reset(&mut self, config: &TimerConfiguration) -> Event {
        self.restart_phase(config);
        Event::TimerReset {
            phase: self.state.phase,
            seconds_remaining: self.state.seconds_remaining,
            at: (self.clock)(),
        }
    }

    /// Jump from a break straight back to Work.
    ///
    /// Returns `None` during Work or when `config.can_skip_breaks` is off.
    /// The Work counter is not incremented.
    pub fn skip_break(&mut self, config: &TimerConfiguration) -> Option<Event> {
        if !self.state.phase.is_break() || !config.can_skip_breaks {
            return None;
        }
        let from = self.state.phase;
        self.state.phase = Phase::Work;
        self.restart_phase(config);
        tracing::debug!(?from, "break skipped");
        Some(Event::BreakSkipped {
            from,
            seconds_remaining: self.state.seconds_remaining,
            at: (self.clock)(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Ok(Some(Event::PhaseCompleted))` when the countdown reaches
    /// zero, `Ok(None)` otherwise (including whenever the timer is paused).
    ///
    /// # Errors
    ///
    /// When a Work phase completes but its session cannot be appended, the
    /// transition still happens and [`UnsavedSession`] carries the event, the
    /// session to retry, and the store error.
    pub fn tick(&mut self, config: &TimerConfiguration) -> Result<Option<Event>, UnsavedSession> {
        if !self.state.is_running {
            return Ok(None);
        }

        debug_assert!(
            self.state.seconds_remaining <= self.state.phase_total_seconds,
            "seconds_remaining {} exceeds phase length {}",
            self.state.seconds_remaining,
            self.state.phase_total_seconds
        );
        self.state.seconds_remaining = self
            .state
            .seconds_remaining
            .min(self.state.phase_total_seconds)
            .saturating_sub(1);

        if self.state.seconds_remaining > 0 {
            return Ok(None);
        }
        self.complete_phase(config)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn restart_phase(&mut self, config: &TimerConfiguration) {
        let total = self.state.phase.duration_secs(config);
        self.state.seconds_remaining = total;
        self.state.phase_total_seconds = total;
    }

    fn complete_phase(
        &mut self,
        config: &TimerConfiguration,
    ) -> Result<Option<Event>, UnsavedSession> {
        let ended = self.state.phase;
        let at = (self.clock)();

        let session = match ended {
            Phase::Work => {
                self.state.consecutive_work_periods += 1;
                if self.state.consecutive_work_periods >= config.pomodoros_before_long_break {
                    self.state.phase = Phase::LongBreak;
                    self.state.consecutive_work_periods = 0;
                } else {
                    self.state.phase = Phase::ShortBreak;
                }
                Some(FocusSession::completed(config.effective_work_minutes(), at))
            }
            Phase::ShortBreak | Phase::LongBreak => {
                self.state.phase = Phase::Work;
                None
            }
        };

        self.restart_phase(config);
        self.state.is_running = config.auto_start_next_session;

        tracing::debug!(
            ?ended,
            next = ?self.state.phase,
            consecutive = self.state.consecutive_work_periods,
            "phase completed"
        );

        let event = Event::PhaseCompleted {
            ended,
            next: self.state.phase,
            session: session.clone(),
            auto_started: self.state.is_running,
            at,
        };

        match session {
            Some(session) => match self.store.append(&session) {
                Ok(()) => Ok(Some(event)),
                Err(source) => {
                    tracing::warn!(error = %source, "failed to persist completed focus session");
                    Err(UnsavedSession {
                        event,
                        session,
                        source,
                    })
                }
            },
            None => Ok(Some(event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::storage::MemorySessionStore;

    fn quick_config() -> TimerConfiguration {
        TimerConfiguration {
            work_duration: 1,
            short_break_duration: 1,
            long_break_duration: 2,
            pomodoros_before_long_break: 2,
            ..Default::default()
        }
    }

    fn run_out(engine: &mut TimerEngine<&MemorySessionStore>, cfg: &TimerConfiguration) -> Event {
        if !engine.is_running() {
            engine.toggle_run();
        }
        loop {
            if let Some(event) = engine.tick(cfg).unwrap() {
                return event;
            }
        }
    }

    struct FailingStore;

    impl SessionStore for FailingStore {
        fn append(&self, _: &FocusSession) -> Result<(), StoreError> {
            Err(StoreError::Locked)
        }
        fn query_range(
            &self,
            _: DateTime<Utc>,
            _: DateTime<Utc>,
        ) -> Result<Vec<FocusSession>, StoreError> {
            Ok(Vec::new())
        }
        fn delete_all(&self) -> Result<usize, StoreError> {
            Ok(0)
        }
    }

    #[test]
    fn starts_paused_in_full_work_phase() {
        let cfg = TimerConfiguration::default();
        let engine = TimerEngine::new(&cfg, MemorySessionStore::new());
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.seconds_remaining(), 1500);
        assert!(!engine.is_running());
        assert_eq!(engine.consecutive_work_periods(), 0);
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let cfg = quick_config();
        let store = MemorySessionStore::new();
        let mut engine = TimerEngine::new(&cfg, &store);
        for _ in 0..200 {
            assert!(engine.tick(&cfg).unwrap().is_none());
        }
        assert_eq!(engine.seconds_remaining(), 60);
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_run_keeps_countdown() {
        let cfg = quick_config();
        let mut engine = TimerEngine::new(&cfg, MemorySessionStore::new());
        engine.toggle_run();
        engine.tick(&cfg).unwrap();
        engine.tick(&cfg).unwrap();
        let event = engine.toggle_run();
        assert!(matches!(
            event,
            Event::TimerToggled {
                is_running: false,
                phase: Phase::Work,
                seconds_remaining: 58,
                ..
            }
        ));
        assert_eq!(engine.seconds_remaining(), 58);
    }

    #[test]
    fn work_completion_records_one_session() {
        let cfg = quick_config();
        let store = MemorySessionStore::new();
        let mut engine = TimerEngine::new(&cfg, &store);
        let event = run_out(&mut engine, &cfg);

        match event {
            Event::PhaseCompleted {
                ended,
                next,
                session,
                auto_started,
                ..
            } => {
                assert_eq!(ended, Phase::Work);
                assert_eq!(next, Phase::ShortBreak);
                assert_eq!(session.map(|s| s.duration_minutes), Some(1));
                assert!(!auto_started);
            }
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
        assert_eq!(store.len(), 1);
        assert_eq!(engine.consecutive_work_periods(), 1);
        assert!(!engine.is_running());

        // Paused after completion: further ticks must not complete again.
        for _ in 0..500 {
            assert!(engine.tick(&cfg).unwrap().is_none());
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn break_completion_records_nothing() {
        let cfg = quick_config();
        let store = MemorySessionStore::new();
        let mut engine = TimerEngine::new(&cfg, &store);
        run_out(&mut engine, &cfg);
        let event = run_out(&mut engine, &cfg);
        assert_eq!(event.completed_phase(), Some(Phase::ShortBreak));
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn long_break_after_configured_work_periods() {
        let cfg = quick_config();
        let store = MemorySessionStore::new();
        let mut engine = TimerEngine::new(&cfg, &store);

        run_out(&mut engine, &cfg); // work 1
        assert_eq!(engine.phase(), Phase::ShortBreak);
        run_out(&mut engine, &cfg); // short break
        run_out(&mut engine, &cfg); // work 2
        assert_eq!(engine.phase(), Phase::LongBreak);
        assert_eq!(engine.consecutive_work_periods(), 0);
        assert_eq!(engine.seconds_remaining(), 120);
    }

    #[test]
    fn auto_start_keeps_running() {
        let cfg = TimerConfiguration {
            auto_start_next_session: true,
            ..quick_config()
        };
        let mut engine = TimerEngine::new(&cfg, MemorySessionStore::new());
        engine.toggle_run();
        let mut completed = 0;
        for _ in 0..120 {
            if engine.tick(&cfg).unwrap().is_some() {
                completed += 1;
            }
        }
        assert_eq!(completed, 2);
        assert!(engine.is_running());
    }

    #[test]
    fn reset_restores_duration_only() {
        let cfg = quick_config();
        let mut engine = TimerEngine::new(&cfg, MemorySessionStore::new());
        engine.toggle_run();
        for _ in 0..30 {
            engine.tick(&cfg).unwrap();
        }
        let longer = TimerConfiguration {
            work_duration: 3,
            ..cfg.clone()
        };
        engine.reset(&longer);
        assert_eq!(engine.phase(), Phase::Work);
        assert!(engine.is_running());
        assert_eq!(engine.seconds_remaining(), 180);
        assert!(engine.store().is_empty());
    }

    #[test]
    fn config_change_applies_at_next_phase() {
        let cfg = quick_config();
        let store = MemorySessionStore::new();
        let mut engine = TimerEngine::new(&cfg, &store);
        engine.toggle_run();
        engine.tick(&cfg).unwrap();

        let changed = TimerConfiguration {
            short_break_duration: 4,
            ..cfg.clone()
        };
        // In-flight Work phase keeps its original length.
        for _ in 0..58 {
            assert!(engine.tick(&changed).unwrap().is_none());
        }
        assert!(engine.tick(&changed).unwrap().is_some());
        assert_eq!(engine.seconds_remaining(), 240);
    }

    #[test]
    fn shrinking_config_mid_phase_is_clamped_by_reset() {
        let cfg = TimerConfiguration::default();
        let mut engine = TimerEngine::new(&cfg, MemorySessionStore::new());
        let shorter = TimerConfiguration {
            work_duration: 10,
            ..cfg
        };
        engine.reset(&shorter);
        assert_eq!(engine.seconds_remaining(), 600);
        assert_eq!(engine.state().phase_total_seconds, 600);
    }

    #[test]
    fn skip_break_returns_to_work_without_counting() {
        let cfg = quick_config();
        let store = MemorySessionStore::new();
        let mut engine = TimerEngine::new(&cfg, &store);
        assert!(engine.skip_break(&cfg).is_none());

        run_out(&mut engine, &cfg);
        assert_eq!(engine.phase(), Phase::ShortBreak);
        let event = engine.skip_break(&cfg);
        assert!(matches!(
            event,
            Some(Event::BreakSkipped {
                from: Phase::ShortBreak,
                seconds_remaining: 60,
                ..
            })
        ));
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.consecutive_work_periods(), 1);
    }

    #[test]
    fn skip_break_respects_setting() {
        let cfg = TimerConfiguration {
            can_skip_breaks: false,
            ..quick_config()
        };
        let mut engine = TimerEngine::new(&cfg, MemorySessionStore::new());
        engine.toggle_run();
        while engine.tick(&cfg).unwrap().is_none() {}
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert!(engine.skip_break(&cfg).is_none());
        assert_eq!(engine.phase(), Phase::ShortBreak);
    }

    #[test]
    fn failed_append_still_transitions() {
        let cfg = quick_config();
        let mut engine = TimerEngine::new(&cfg, FailingStore);
        engine.toggle_run();
        let mut failure = None;
        for _ in 0..60 {
            if let Err(e) = engine.tick(&cfg) {
                failure = Some(e);
                break;
            }
        }
        let failure = failure.expect("append failure should surface");
        assert_eq!(failure.session.duration_minutes, 1);
        assert!(matches!(failure.source, StoreError::Locked));
        assert_eq!(failure.event.completed_phase(), Some(Phase::Work));
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.consecutive_work_periods(), 1);
    }

    #[test]
    fn injected_clock_stamps_sessions() {
        fn fixed() -> DateTime<Utc> {
            DateTime::from_timestamp(1_772_442_000, 0).unwrap_or_default()
        }
        let cfg = quick_config();
        let store = MemorySessionStore::new();
        let mut engine = TimerEngine::new(&cfg, &store).with_clock(fixed);
        run_out(&mut engine, &cfg);
        assert_eq!(store.all().unwrap()[0].completed_at, fixed());
    }

    #[test]
    fn snapshot_reports_progress() {
        let cfg = quick_config();
        let mut engine = TimerEngine::new(&cfg, MemorySessionStore::new());
        engine.toggle_run();
        for _ in 0..15 {
            engine.tick(&cfg).unwrap();
        }
        match engine.snapshot() {
            Event::StateSnapshot {
                seconds_remaining,
                total_seconds,
                progress,
                pomodoro_number,
                ..
            } => {
                assert_eq!(seconds_remaining, 45);
                assert_eq!(total_seconds, 60);
                assert!((progress - 0.25).abs() < 1e-9);
                assert_eq!(pomodoro_number, 1);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }
}
