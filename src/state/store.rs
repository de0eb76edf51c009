//! Persistence port for the mining session.
//!
//! The engine only sees [`SessionStore`]; the browser build plugs in
//! [`LocalStore`]. [`MemoryStore`] backs tests and takes over when
//! `localStorage` fails mid-visit.

use std::cell::{Cell, RefCell};

use log::warn;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::error::MiningError;
use crate::model::MAX_TIER_LEVEL;

pub const TIER_LEVEL_KEY: &str = "aiqx_upgrade_level";
pub const HAS_EVER_MINED_KEY: &str = "aiqx_has_ever_mined";
pub const SESSION_KEY: &str = "aiqx_mining_session";

/// Progress written periodically while mining.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub elapsed_secs: f64,
    pub total_balance: f64,
    /// Wall-clock ms of the last tick applied before the snapshot.
    #[serde(default)]
    pub last_tick_ms: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredSession {
    pub tier_level: u8,
    pub has_started: bool,
    pub progress: Option<ProgressSnapshot>,
}

pub trait SessionStore {
    fn load(&self) -> Result<StoredSession, MiningError>;
    fn save_tier(&self, tier_level: u8) -> Result<(), MiningError>;
    fn mark_started(&self) -> Result<(), MiningError>;
    fn save_progress(&self, progress: &ProgressSnapshot) -> Result<(), MiningError>;
    /// Drops every persisted key.
    fn clear(&self) -> Result<(), MiningError>;
}

/// Tier text from storage; junk reads as the free tier, out-of-range values clamp.
pub fn parse_tier_level(raw: Option<&str>) -> u8 {
    raw.and_then(|r| r.trim().parse::<i64>().ok())
        .map(|v| v.clamp(0, MAX_TIER_LEVEL as i64) as u8)
        .unwrap_or(0)
}

pub fn parse_has_started(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("true") | Some("1"))
}

pub fn parse_progress(raw: Option<&str>) -> Option<ProgressSnapshot> {
    let raw = raw?;
    match serde_json::from_str::<ProgressSnapshot>(raw) {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("ignoring malformed mining snapshot: {e}");
            None
        }
    }
}

fn js_err(e: JsValue) -> MiningError {
    MiningError::PersistenceUnavailable(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Browser `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Result<web_sys::Storage, MiningError> {
        let win = web_sys::window()
            .ok_or_else(|| MiningError::PersistenceUnavailable("no window".into()))?;
        win.local_storage()
            .map_err(js_err)?
            .ok_or_else(|| MiningError::PersistenceUnavailable("localStorage disabled".into()))
    }
}

impl SessionStore for LocalStore {
    fn load(&self) -> Result<StoredSession, MiningError> {
        let store = Self::storage()?;
        let tier = store.get_item(TIER_LEVEL_KEY).map_err(js_err)?;
        let started = store.get_item(HAS_EVER_MINED_KEY).map_err(js_err)?;
        let progress = store.get_item(SESSION_KEY).map_err(js_err)?;
        Ok(StoredSession {
            tier_level: parse_tier_level(tier.as_deref()),
            has_started: parse_has_started(started.as_deref()),
            progress: parse_progress(progress.as_deref()),
        })
    }

    fn save_tier(&self, tier_level: u8) -> Result<(), MiningError> {
        Self::storage()?
            .set_item(TIER_LEVEL_KEY, &tier_level.to_string())
            .map_err(js_err)
    }

    fn mark_started(&self) -> Result<(), MiningError> {
        Self::storage()?.set_item(HAS_EVER_MINED_KEY, "true").map_err(js_err)
    }

    fn save_progress(&self, progress: &ProgressSnapshot) -> Result<(), MiningError> {
        let raw = serde_json::to_string(progress)
            .map_err(|e| MiningError::PersistenceUnavailable(e.to_string()))?;
        Self::storage()?.set_item(SESSION_KEY, &raw).map_err(js_err)
    }

    fn clear(&self) -> Result<(), MiningError> {
        let store = Self::storage()?;
        for key in [TIER_LEVEL_KEY, HAS_EVER_MINED_KEY, SESSION_KEY] {
            store.remove_item(key).map_err(js_err)?;
        }
        Ok(())
    }
}

/// In-memory store. In tests, `set_unavailable(true)` makes every call fail
/// the way a disabled or full `localStorage` does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<StoredSession>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn with(data: StoredSession) -> Self {
        Self {
            data: RefCell::new(data),
            unavailable: Cell::new(false),
        }
    }

    #[cfg(test)]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn snapshot(&self) -> StoredSession {
        self.data.borrow().clone()
    }

    fn check(&self) -> Result<(), MiningError> {
        if self.unavailable.get() {
            return Err(MiningError::PersistenceUnavailable("memory store offline".into()));
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<StoredSession, MiningError> {
        self.check()?;
        Ok(self.snapshot())
    }

    fn save_tier(&self, tier_level: u8) -> Result<(), MiningError> {
        self.check()?;
        self.data.borrow_mut().tier_level = tier_level.min(MAX_TIER_LEVEL);
        Ok(())
    }

    fn mark_started(&self) -> Result<(), MiningError> {
        self.check()?;
        self.data.borrow_mut().has_started = true;
        Ok(())
    }

    fn save_progress(&self, progress: &ProgressSnapshot) -> Result<(), MiningError> {
        self.check()?;
        self.data.borrow_mut().progress = Some(*progress);
        Ok(())
    }

    fn clear(&self) -> Result<(), MiningError> {
        self.check()?;
        *self.data.borrow_mut() = StoredSession::default();
        Ok(())
    }
}
