//! # Core Application Logic
//!
//! This module contains Seekfirst's lookup logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Corpus (read-only)   │
//!                    │  • resolve() citations  │
//!                    │  • search() phrases     │
//!                    │  • process() tokens     │
//!                    │                         │
//!                    │  No terminal. No UI.    │
//!                    └───────────┬─────────────┘
//!                                │ Listing + Effect
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`corpus`]: Books → Chapters → Verses and the book-name lookup
//! - [`loader`]: Reads the corpus document and book table at startup
//! - [`address`]: Citation parsing and resolution
//! - [`search`]: Keyphrase search with per-book counts
//! - [`action`]: Token processing and reserved commands
//! - [`completion`]: Book-name tab completion
//! - [`listing`]: Styled output lines and highlight rotation
//! - [`state`]: The shared, read-only session context
//! - [`config`]: Settings and their override hierarchy

pub mod action;
pub mod address;
pub mod completion;
pub mod config;
pub mod corpus;
pub mod listing;
pub mod loader;
pub mod search;
pub mod state;
