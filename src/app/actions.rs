//! Side effects requested by the event handler.
//!
//! The handler only mutates [`AppState`](super::AppState); anything that
//! touches the network, the store or the user is returned as an [`Action`] and
//! carried out by the [`Session`](crate::session::Session) in order.

use crate::fetch::FetchTrigger;
use crate::notify::Notification;
use crate::storage::AdminConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Shows a message to the user.
    Notify(Notification),

    /// Runs the fetch fallback chain.
    ///
    /// The session feeds the outcome back as
    /// [`Event::FetchCompleted`](super::Event::FetchCompleted).
    RunFetch(FetchTrigger),

    /// Writes the admin config to the store.
    PersistAdminConfig(AdminConfig),

    /// Ends the session.
    Quit,
}
