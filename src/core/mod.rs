//! # Core Application Logic
//!
//! This module contains Switchboard's business logic: who is signed in,
//! whether protected content may render, which apps exist, how they load,
//! and which tabs are open. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. Effects out.    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │   Tests    │
//!     │  Adapter   │                          │ (reducer + │
//!     │ (ratatui)  │                          │  settle)   │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`gate`]: Session gate, validate-then-render
//! - [`session`]: Credentials, epoch, persistence
//! - [`registry`]: Code → app descriptor lookup
//! - [`loader`]: Deduplicated, timed module instantiation
//! - [`tabs`]: Open tabs and the active pointer
//! - [`view`]: What a loaded module renders
//! - [`config`]: Layered settings

pub mod action;
pub mod config;
pub mod gate;
pub mod loader;
pub mod registry;
pub mod session;
pub mod state;
pub mod tabs;
pub mod view;
