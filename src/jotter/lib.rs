//! # Jotter Architecture
//!
//! Jotter is a notes library with a small CLI client (`jot`). Notes live in
//! books; every change to a note is recorded in an append-only action log so
//! that the history can be replayed elsewhere.
//!
//! The on-disk format has changed several times. Before any command runs, the
//! [`migrate`] engine brings the data directory up to the latest schema
//! version, one step at a time, committing each step atomically.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, print.rs)                           │
//! │  - Parses arguments, prints messages, owns exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade, fills in the current book and the clock     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌───────────────────────────────┬─────────────────────────────┐
//! │  Commands (commands/*.rs)     │  Migrations (migrate/)      │
//! │  - books, view, add, edit ... │  - versioned step registry  │
//! └───────────────────────────────┴─────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - StorageBackend trait, FsBackend and MemBackend           │
//! │  - WriteBatch: all-or-nothing multi-file commits            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing calls
//! `std::process::exit`. Diagnostics go through `tracing`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per command
//! - [`migrate`]: Schema migration engine and its steps
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Current data types (`Note`, `Book`, `Action`)
//! - [`legacy`]: Readers for older archive shapes
//! - [`archive`], [`actions`], [`schema`]: Typed access to each data file
//! - [`config`]: Paths and user configuration
//! - [`init`]: Home resolution and the process lock
//! - [`keyed`]: Insertion-ordered string map used for archives
//! - [`error`]: Error types

pub mod actions;
pub mod api;
pub mod archive;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod keyed;
pub mod legacy;
pub mod migrate;
pub mod model;
pub mod schema;
pub mod store;
