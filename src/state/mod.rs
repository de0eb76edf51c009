pub mod clock;
pub mod store;

pub use clock::TickClock;
pub use store::{LocalStore, MemoryStore, ProgressSnapshot, SessionStore, StoredSession};
