// Turns host wall-clock readings into tick deltas.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TickClock {
    last_ms: Option<f64>,
    /// Next reading only re-baselines; set when a new run starts.
    rebased: bool,
}

impl TickClock {
    /// Clock that already saw `last_ms`, e.g. the last tick persisted before the app closed.
    pub fn seeded(last_ms: Option<f64>) -> Self {
        Self {
            last_ms: last_ms.filter(|ms| ms.is_finite()),
            rebased: false,
        }
    }

    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }

    /// Time read before this call does not count towards the next delta.
    pub fn rebase(&mut self) {
        self.rebased = true;
    }

    /// Seconds since the previous reading. The first reading, the reading
    /// after `rebase`, and readings that go backwards yield 0; every reading
    /// becomes the new baseline.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let delta = match self.last_ms {
            Some(prev) if now_ms > prev && !self.rebased => (now_ms - prev) / 1000.0,
            _ => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.rebased = false;
        delta
    }
}
