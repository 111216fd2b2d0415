//! # Portfolio
//!
//! Client core of a personal site built around a "channel" metaphor: a home
//! grid of tiles, each opening a full-screen page that can be swiped or
//! stepped through in a fixed cyclic order.
//!
//!
//!
//! # General Infrastructure
//! - Browser talks to the axum server in `backend/server` for the guestbook,
//!   now-playing proxy, device status and resume download
//! - Server persists guestbook entries and status snapshots in Redis
//! - A small reporter agent on the tracked machine posts status snapshots
//! - This crate holds everything the pages need that is not styling
//!
//!
//!
//! # Navigation
//!
//! - [`channels::ChannelRegistry`]: ordered destinations, first one is the fallback
//! - [`route::Route`]: address bar path to home or channel
//! - [`navigation::Navigator`]: current channel, slide direction, 500ms input lock, zoom-out to home
//! - [`gesture::GestureInterpreter`]: drag session to at most one step command
//! - [`views::ChannelView`]: per-channel rendering handle, footer action and polling period
//! - [`refresh::Refresher`]: one polling task for the channel on screen
//!
//! Flow: key press, arrow button or drag end produces a
//! [`navigation::Command`], the navigator applies it and returns an
//! [`navigation::Effect`] for the host to perform (push history entry,
//! start zoom-out, leave for `/`).
//!
//!
//!
//! # Guestbook
//!
//! - Visitor derives a [`fingerprint::ClientTraits::fingerprint`]
//! - Page asks the server whether this fingerprint (and the request address) may sign
//! - On submit the server checks again, then the store's unique indexes decide
//! - The fingerprint doubles as the bearer credential for deleting your own entry
//!
//! One entry per address and one per fingerprint. Both are trivially spoofed,
//! this only discourages casual spam.
//!
//!
//!
//! # Setup
//!
//! Run tests.
//! ```sh
//! cargo test --workspace
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```

pub mod channels;
pub mod fingerprint;
pub mod gesture;
pub mod navigation;
pub mod refresh;
pub mod route;
pub mod views;

pub use channels::{Channel, ChannelRegistry};
pub use navigation::{Command, Direction, Effect, Navigator};
