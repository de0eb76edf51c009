//! Mining engine: a [`MiningSession`] wired to its persistence port and the
//! host tick clock, exposed to the UI as a yew reducer.
//!
//! The engine owns no timers. The host dispatches `MiningAction::Tick` with a
//! wall-clock reading and the engine turns that into a delta.

use std::rc::Rc;

use log::{debug, info, warn};
use yew::Reducible;

use crate::error::MiningError;
use crate::model::{MiningSession, PROGRESS_SAVE_INTERVAL_SECS};
use crate::state::{MemoryStore, ProgressSnapshot, SessionStore, StoredSession, TickClock};

/// Last thing worth telling the user about. Never blocks the session.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Claimed { amount: f64 },
    /// `restarted` is false when the upgrade happened before mining ever started.
    Upgraded { level: u8, restarted: bool },
    Rejected(MiningError),
    StorageDegraded(MiningError),
}

#[derive(Clone, Debug)]
pub enum MiningAction {
    Start,
    Tick { now_ms: f64 },
    Claim,
    Upgrade,
    Reset,
    DismissNotice,
}

#[derive(Clone)]
pub struct MiningEngine {
    session: MiningSession,
    clock: TickClock,
    store: Rc<dyn SessionStore>,
    /// False once a storage call failed; `store` is then an in-memory fallback.
    persistent: bool,
    unsaved_secs: f64,
    notice: Option<Notice>,
}

impl MiningEngine {
    /// Rehydrates from `store`. A failing store yields a fresh in-memory session.
    pub fn load(store: Rc<dyn SessionStore>) -> Self {
        let mut engine = Self {
            session: MiningSession::default(),
            clock: TickClock::default(),
            store,
            persistent: true,
            unsaved_secs: 0.0,
            notice: None,
        };
        match engine.store.load() {
            Ok(stored) => {
                let progress = stored.progress.unwrap_or_default();
                engine.session = MiningSession::restore(
                    stored.tier_level,
                    stored.has_started,
                    progress.elapsed_secs,
                    progress.total_balance,
                );
                if stored.has_started {
                    engine.clock = TickClock::seeded(progress.last_tick_ms);
                }
                info!(
                    "loaded mining session: tier {} {:?} elapsed {:.0}s",
                    engine.session.tier_level(),
                    engine.session.phase(),
                    engine.session.elapsed_secs()
                );
            }
            Err(e) => engine.degrade(e),
        }
        engine
    }

    pub fn session(&self) -> &MiningSession {
        &self.session
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn start(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        info!("mining started at tier {}", self.session.tier_level());
        self.clock.rebase();
        self.write(|s| s.mark_started());
        self.save_progress();
        true
    }

    /// Feeds a wall-clock reading. Returns true when the run completed.
    pub fn tick_at(&mut self, now_ms: f64) -> bool {
        let delta = self.clock.advance(now_ms);
        self.tick(delta)
    }

    pub fn tick(&mut self, delta_secs: f64) -> bool {
        let before = self.session.elapsed_secs();
        let finished = self.session.tick(delta_secs);
        self.unsaved_secs += self.session.elapsed_secs() - before;
        if finished {
            info!("mining run complete, ready to claim");
            self.save_progress();
        } else if self.unsaved_secs >= PROGRESS_SAVE_INTERVAL_SECS {
            self.save_progress();
        }
        finished
    }

    pub fn claim(&mut self) -> Result<f64, MiningError> {
        let amount = self.session.claim().inspect_err(|e| self.reject(e))?;
        info!(
            "claimed {:.8} AIQX, balance {:.8}",
            amount,
            self.session.total_balance()
        );
        self.notice = Some(Notice::Claimed { amount });
        self.clock.rebase();
        self.save_progress();
        Ok(amount)
    }

    pub fn upgrade(&mut self) -> Result<u8, MiningError> {
        let level = self.session.upgrade().inspect_err(|e| self.reject(e))?;
        info!(
            "upgraded to tier {} ({}h runs)",
            level,
            self.session.tier().hours()
        );
        let restarted = self.session.has_started();
        if restarted {
            self.clock.rebase();
        }
        self.notice = Some(Notice::Upgraded { level, restarted });
        self.write(|s| s.save_tier(level));
        self.save_progress();
        Ok(level)
    }

    /// Testing tool: back to a fresh client.
    pub fn reset(&mut self) {
        self.session.reset();
        self.unsaved_secs = 0.0;
        self.notice = None;
        warn!("mining session reset to tier 0");
        self.write(|s| s.clear());
    }

    fn save_progress(&mut self) {
        self.unsaved_secs = 0.0;
        if !self.session.has_started() {
            return;
        }
        let snapshot = ProgressSnapshot {
            elapsed_secs: self.session.elapsed_secs(),
            total_balance: self.session.total_balance(),
            last_tick_ms: self.clock.last_ms(),
        };
        self.write(|s| s.save_progress(&snapshot));
    }

    fn write(&mut self, op: impl FnOnce(&dyn SessionStore) -> Result<(), MiningError>) {
        if let Err(e) = op(self.store.as_ref()) {
            self.degrade(e);
        }
    }

    /// Swaps the failing store for an in-memory copy of the current state.
    fn degrade(&mut self, e: MiningError) {
        warn!("{e}; progress will not survive a reload");
        self.persistent = false;
        self.store = Rc::new(MemoryStore::with(self.stored_state()));
        self.notice = Some(Notice::StorageDegraded(e));
    }

    fn stored_state(&self) -> StoredSession {
        let started = self.session.has_started();
        StoredSession {
            tier_level: self.session.tier_level(),
            has_started: started,
            progress: started.then(|| ProgressSnapshot {
                elapsed_secs: self.session.elapsed_secs(),
                total_balance: self.session.total_balance(),
                last_tick_ms: self.clock.last_ms(),
            }),
        }
    }

    fn reject(&mut self, e: &MiningError) {
        debug!("rejected: {e}");
        self.notice = Some(Notice::Rejected(e.clone()));
    }
}

impl Reducible for MiningEngine {
    type Action = MiningAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use MiningAction::*;
        let mut new = (*self).clone();
        match action {
            Start => {
                new.start();
            }
            Tick { now_ms } => {
                new.tick_at(now_ms);
            }
            // outcomes are surfaced through `notice`
            Claim => {
                let _ = new.claim();
            }
            Upgrade => {
                let _ = new.upgrade();
            }
            Reset => new.reset(),
            DismissNotice => new.notice = None,
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Phase;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn engine_with(stored: StoredSession) -> (Rc<MemoryStore>, MiningEngine) {
        let store = Rc::new(MemoryStore::with(stored));
        let engine = MiningEngine::load(store.clone());
        (store, engine)
    }

    #[test]
    fn test_load_restores_persisted_tier() {
        let (_, engine) = engine_with(StoredSession {
            tier_level: 2,
            ..Default::default()
        });
        assert_eq!(engine.session().tier_level(), 2);
        assert_eq!(engine.session().tier().duration_secs, 43_200);
        assert_eq!(engine.session().phase(), Phase::Idle);
        assert!(engine.is_persistent());
    }

    #[test]
    fn test_start_is_persisted_and_survives_reload() {
        let (store, mut engine) = engine_with(StoredSession::default());
        assert!(engine.start());
        assert!(!engine.start());
        assert!(store.snapshot().has_started);

        let reloaded = MiningEngine::load(store.clone());
        assert_eq!(reloaded.session().phase(), Phase::Running);
    }

    #[test]
    fn test_full_run_claim_via_clock() {
        let (store, mut engine) = engine_with(StoredSession::default());
        engine.tick_at(0.0);
        engine.start();
        engine.tick_at(1_000.0);
        assert!(engine.tick_at(10_801_000.0));
        assert_eq!(engine.session().phase(), Phase::ReadyToClaim);

        let amount = engine.claim().unwrap();
        assert!(approx(amount, 0.03));
        assert!(matches!(engine.notice(), Some(Notice::Claimed { .. })));
        assert_eq!(engine.session().phase(), Phase::Running);

        let saved = store.snapshot().progress.unwrap();
        assert!(approx(saved.total_balance, 0.03));
        assert_eq!(saved.elapsed_secs, 0.0);
    }

    #[test]
    fn test_resume_applies_time_spent_closed() {
        let stored = StoredSession {
            tier_level: 0,
            has_started: true,
            progress: Some(ProgressSnapshot {
                elapsed_secs: 1_000.0,
                total_balance: 0.25,
                last_tick_ms: Some(0.0),
            }),
        };
        let (_, mut engine) = engine_with(stored.clone());
        engine.tick_at(3_600_000.0);
        assert_eq!(engine.session().elapsed_secs(), 4_600.0);
        assert_eq!(engine.session().total_balance(), 0.25);

        // a gap longer than the run clamps to the duration
        let (_, mut engine) = engine_with(stored);
        engine.tick_at(100_000_000.0);
        assert_eq!(engine.session().elapsed_secs(), 10_800.0);
        assert_eq!(engine.session().phase(), Phase::ReadyToClaim);
    }

    #[test]
    fn test_progress_saved_periodically() {
        let (store, mut engine) = engine_with(StoredSession::default());
        engine.start();
        engine.tick(4.0);
        assert_eq!(store.snapshot().progress.unwrap().elapsed_secs, 0.0);
        engine.tick(1.0);
        assert_eq!(store.snapshot().progress.unwrap().elapsed_secs, 5.0);
    }

    #[test]
    fn test_upgrade_persists_tier() {
        let (store, mut engine) = engine_with(StoredSession::default());
        engine.start();
        engine.tick(5_000.0);
        assert_eq!(engine.upgrade(), Ok(1));
        assert_eq!(store.snapshot().tier_level, 1);
        assert_eq!(engine.session().elapsed_secs(), 0.0);
        assert_eq!(
            engine.notice(),
            Some(&Notice::Upgraded {
                level: 1,
                restarted: true
            })
        );

        let reloaded = MiningEngine::load(store.clone());
        assert_eq!(reloaded.session().tier_level(), 1);
    }

    #[test]
    fn test_upgrade_at_max_reports_rejection() {
        let (store, mut engine) = engine_with(StoredSession {
            tier_level: 3,
            ..Default::default()
        });
        assert!(engine.upgrade().is_err());
        assert!(matches!(engine.notice(), Some(Notice::Rejected(_))));
        assert_eq!(store.snapshot().tier_level, 3);
    }

    #[test]
    fn test_storage_failure_keeps_upgrade_in_memory() {
        let (store, mut engine) = engine_with(StoredSession::default());
        engine.start();
        store.set_unavailable(true);
        assert_eq!(engine.upgrade(), Ok(1));
        assert_eq!(engine.session().tier_level(), 1);
        assert!(!engine.is_persistent());
        assert!(matches!(engine.notice(), Some(Notice::StorageDegraded(_))));

        // once degraded, writes go to the in-memory fallback even if storage recovers
        store.set_unavailable(false);
        engine.upgrade().unwrap();
        assert_eq!(store.snapshot().tier_level, 0);
    }

    #[test]
    fn test_load_failure_falls_back_to_defaults() {
        let store = Rc::new(MemoryStore::with(StoredSession {
            tier_level: 2,
            has_started: true,
            progress: None,
        }));
        store.set_unavailable(true);
        let engine = MiningEngine::load(store.clone());
        assert_eq!(engine.session().tier_level(), 0);
        assert_eq!(engine.session().phase(), Phase::Idle);
        assert!(!engine.is_persistent());
    }

    #[test]
    fn test_reset_clears_store() {
        let (store, mut engine) = engine_with(StoredSession::default());
        engine.start();
        engine.tick(10_800.0);
        engine.claim().unwrap();
        engine.upgrade().unwrap();
        engine.reset();

        assert_eq!(engine.session(), &MiningSession::new(0));
        assert_eq!(store.snapshot(), StoredSession::default());
        assert_eq!(engine.notice(), None);
    }

    #[test]
    fn test_clock_running_ahead_does_not_stall_mining() {
        let now = 1_700_000_000_000.0;
        let (_, mut engine) = engine_with(StoredSession {
            tier_level: 0,
            has_started: true,
            progress: Some(ProgressSnapshot {
                elapsed_secs: 100.0,
                total_balance: 0.0,
                last_tick_ms: Some(now + 3_600_000.0),
            }),
        });
        // 30 minutes of 250 ms ticks after the clock was corrected backwards
        for i in 0..7_200 {
            engine.tick_at(now + i as f64 * 250.0);
        }
        assert_eq!(engine.session().elapsed_secs(), 100.0 + 1_799.75);
    }

    #[test]
    fn test_new_run_does_not_inherit_earlier_time() {
        let (_, mut engine) = engine_with(StoredSession::default());
        engine.tick_at(0.0);
        engine.tick_at(200_000.0);
        engine.start();
        engine.tick_at(200_250.0);
        assert_eq!(engine.session().elapsed_secs(), 0.0);
        engine.tick_at(201_250.0);
        assert_eq!(engine.session().elapsed_secs(), 1.0);

        assert!(engine.tick_at(11_001_250.0));
        engine.tick_at(11_060_000.0);
        engine.claim().unwrap();
        engine.tick_at(11_090_000.0);
        assert_eq!(engine.session().elapsed_secs(), 0.0);
        engine.tick_at(11_092_000.0);
        assert_eq!(engine.session().elapsed_secs(), 2.0);
    }

    #[test]
    fn test_upgrade_before_first_start_does_not_restart() {
        let (store, mut engine) = engine_with(StoredSession::default());
        engine.upgrade().unwrap();
        assert_eq!(engine.session().phase(), Phase::Idle);
        assert_eq!(
            engine.notice(),
            Some(&Notice::Upgraded {
                level: 1,
                restarted: false
            })
        );
        assert_eq!(store.snapshot().tier_level, 1);
        assert!(!store.snapshot().has_started);
    }

    #[test]
    fn test_degraded_engine_keeps_working_in_memory() {
        let (store, mut engine) = engine_with(StoredSession::default());
        store.set_unavailable(true);
        engine.start();
        assert!(!engine.is_persistent());
        assert_eq!(engine.session().phase(), Phase::Running);

        engine.tick(10_800.0);
        assert!(approx(engine.claim().unwrap(), 0.03));
        assert!(approx(engine.session().total_balance(), 0.03));
        assert_eq!(engine.upgrade(), Ok(1));
        assert!(matches!(engine.notice(), Some(Notice::Upgraded { .. })));
    }

    #[test]
    fn test_reducer_claim_while_running_is_rejected() {
        let (_, engine) = engine_with(StoredSession::default());
        let engine = Rc::new(engine).reduce(MiningAction::Start);
        let engine = engine.reduce(MiningAction::Tick { now_ms: 1_000.0 });
        let engine = engine.reduce(MiningAction::Tick { now_ms: 61_000.0 });
        assert_eq!(engine.session().elapsed_secs(), 60.0);

        let before = engine.session().clone();
        let engine = engine.reduce(MiningAction::Claim);
        assert_eq!(engine.session(), &before);
        assert!(matches!(
            engine.notice(),
            Some(Notice::Rejected(MiningError::InvalidTransition { action: "claim", .. }))
        ));

        let engine = engine.reduce(MiningAction::DismissNotice);
        assert_eq!(engine.notice(), None);
    }
}
