//! Himla - weather search and forecasts from Open-Meteo
//!
//! The library holds the display-ready forecast model and its clients
//! (`data`), the latest-request-wins sessions (`session`), preference storage
//! (`store`) and the text front end used by the binary (`cli`, `config`,
//! `render`).

pub mod cli;
pub mod config;
pub mod data;
pub mod render;
pub mod session;
pub mod store;
