//! Request-scoped session facade.
//!
//! A [`Session`] borrows the host's [`SessionStore`] for one request and
//! exposes login state, read-once flash messages (errors and successes) and a
//! generic key/value area that never sees the facade's reserved keys.

pub mod facade;
pub mod key;
pub mod messages;
pub mod store;

pub use {
    facade::Session,
    key::{RESERVED_KEYS, is_reserved},
    messages::Messages,
    store::{MemoryStore, SessionStatus, SessionStore},
};
