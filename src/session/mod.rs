//! Client-side session: who is logged in, and where that survives reloads.
//!
//! DESIGN
//! ======
//! `store::SessionStore` is the single owner of the session. Other components
//! get cloned snapshots and accessor methods; only `login`, `logout`,
//! `expire` and `refresh_profile` mutate it.

pub mod record;
pub mod role;
pub mod storage;
pub mod store;

pub use record::SessionRecord;
pub use role::Role;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{SessionState, SessionStore};
