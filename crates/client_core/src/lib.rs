pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod service;

pub use config::{load_settings, Settings};
pub use controller::{ControllerEvent, StoriesController, ViewState, FETCH_ERROR_MESSAGE};
pub use debounce::Debouncer;
pub use error::FetchError;
pub use service::{HttpStoryService, StoryService};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
