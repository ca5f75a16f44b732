//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the front end (main.rs, via
//! [`Session`](crate::session::Session)) and the pipeline, fetch and storage
//! layers.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! Input line → Command → Event → handle_event → State mutation → Actions → Side effects
//!                                     ↑                                        ↓
//!                                     └──────────── FetchCompleted ────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`command`]: Text command parser for the interactive front end
//! - [`handler`]: Event processing and state transitions
//! - [`state`]: Central state container with the derived product list
//!
//! # Example
//!
//! ```rust
//! use ratelist::app::{handle_event, Action, AppState, Event};
//! use ratelist::fetch::FetchTrigger;
//!
//! let mut state = AppState::new(true);
//! let (_, actions) = handle_event(&mut state, &Event::Refresh(FetchTrigger::Manual))?;
//! assert_eq!(actions, vec![Action::RunFetch(FetchTrigger::Manual)]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod command;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use command::{parse_command, Command};
pub use handler::{handle_event, Event};
pub use state::AppState;
