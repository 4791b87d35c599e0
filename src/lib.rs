//! DotStar control panel library - drive a networked LED controller.
//!
//! This library exposes the core functionality of the `dotstar` CLI for use in
//! tests and other front ends.
//!
//! # Modules
//!
//! - `model`: Display groups, colors, effects and LED ranges
//! - `request`: Controller commands and their JSON bodies
//! - `transport`: HTTP client and an in-memory mock controller
//! - `panel`: The control panel view-model
//! - `storage`: Local LED range store
//! - `shell`: Interactive line-based panel
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
//! - `config`: Configuration file handling
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod panel;
pub mod request;
pub mod shell;
pub mod storage;
pub mod theme;
pub mod transport;
