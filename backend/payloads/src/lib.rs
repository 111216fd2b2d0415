//! # Payloads
//!
//! JSON bodies shared between the server, the reporter agent and the
//! browser. Field names are camelCase on the wire.

pub mod guestbook;
pub mod spotify;
pub mod status;
