//! Edicola hydrates article-grid block placeholders in WordPress-backed
//! pages. It scans a page for block instances, fetches each instance's posts
//! from the site's REST API, renders a markup fragment per instance, and
//! injects the fragments into their placeholder containers.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
