//! merge-pin - a pinned Telegram merge plan for labeled GitHub pull requests
//!
//! Pull requests labeled `to-be-merged` are collected per repository,
//! annotated with check and merge status, ordered (optionally by hand) and
//! published as a single pinned chat message that is edited on refresh.

pub mod bot;
pub mod chat;
pub mod command;
pub mod config;
pub mod error;
pub mod plan;
pub mod platform;
pub mod publish;
pub mod schedule;
pub mod service;
pub mod status;
pub mod types;
