//! A small news reader for the Guardian content API.
//!
//! The library side is the fetch pipeline ([`feed`]) plus the pieces the
//! `newsfeed` binary builds on: configuration, list state and rendering.

pub mod app;
pub mod config;
pub mod feed;
pub mod ui;
pub mod util;
