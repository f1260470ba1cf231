//! Session state: the in-memory model, its durable mirror and the store
//! that ties them to the identity service.

pub mod state;
pub mod storage;
pub mod store;

#[cfg(test)]
mod store_test;

pub use state::{Credentials, Session};
pub use storage::{BrowserStorage, DurableStorage, MemoryStorage};
pub use store::{RouteNavigator, SessionStore};
