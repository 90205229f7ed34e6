#![deny(warnings, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub(crate) mod api;
pub mod app;
pub(crate) mod clients;
pub mod config;
pub mod error;
pub mod export;
pub mod observability;
pub mod review;
pub mod sentiment;
pub mod source;
pub mod text;
pub(crate) mod util;
