//! Browser client for the visa application desk.
//!
//! The session store owns authentication state and its durable mirror; the
//! navigation guard consults it before every route renders.

pub mod api;
pub mod app;
mod components;
pub mod config;
mod containers;
pub mod guard;
pub mod models;
mod pages;
pub mod routes;
pub mod session;
