//! One-click insertion of characters and snippets
//!
//! This library provides the state behind the panel: the ranked
//! recently-used tray, the persisted expand/collapse flags of each group,
//! settings, the message protocol spoken by the panel front end, and the
//! panel controller that ties them to a host editor.

pub mod config;
pub mod logging;
pub mod message;
pub mod panel;
pub mod store;
pub mod usage;
pub mod view_state;
