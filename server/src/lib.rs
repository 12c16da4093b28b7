//! imagedrop Server
//!
//! Accepts authenticated image uploads, checks them by content, writes them to
//! disk and records one metadata row per upload in `SQLite`.

pub mod api;
pub mod config;
pub mod db;
pub mod upload;
