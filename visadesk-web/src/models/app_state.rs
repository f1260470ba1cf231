use crate::session::Session;
use yewdux::Store;

/// Render-side mirror of the session store, refreshed on every commit.
#[derive(Default, Clone, PartialEq, Store)]
pub struct AppState {
    pub session: Session,
}
