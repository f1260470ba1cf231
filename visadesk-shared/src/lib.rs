#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Wire models shared by the web client and any future server or CLI.

pub mod models;
