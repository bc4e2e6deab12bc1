//! deepdish-engine: Headless conversation engine for the `DeepDish` chat client
//!
//! This crate provides everything below the user interface:
//! - The conversation controller state machine and its data model
//! - Word-chunk reveal of received answers
//! - An effect runner executing controller commands on tokio
//! - Answer service and city locator ports with HTTP adapters
//! - Configuration loading and saving

pub mod answer;
pub mod config;
pub mod controller;
pub mod geo;
pub mod message;
pub mod profile;
pub mod request;
pub mod reveal;
pub mod runner;
pub mod session;

// Re-export commonly used types
pub use answer::{parse_reply, Answer, AnswerError, AnswerService, HttpAnswerService};
pub use config::{Config, ConfigError, RevealConfig};
pub use controller::{Command, Controller, Phase, Reply, RequestId, RevealId, Status};
pub use geo::{resolve_city, CityLocator, Coordinates, GeoError, HttpCityLocator};
pub use message::{Message, Sender, ERROR_MESSAGE, NO_RESULTS_MESSAGE};
pub use profile::{parse_allergy_list, UserProfile};
pub use request::QueryRequest;
pub use reveal::WordReveal;
pub use runner::{EngineEvent, RevealTimer, Runner};
pub use session::Session;

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
