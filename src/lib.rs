//! Converse - a terminal client for a multi-mode chat backend
//!
//! The backend answers in one of three operational modes (fast, thinking,
//! auto). This crate resolves which mode to ask for, remembers the user's
//! choice per conversation, normalizes backend messages into render-ready
//! parts and renders web-search tool output with sources and citations.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod cache;
pub mod citations;
pub mod cli;
pub mod config;
pub mod error;
pub mod mode;
pub mod models;
pub mod normalize;
pub mod search;
pub mod session;
pub mod traits;
pub mod ui;
