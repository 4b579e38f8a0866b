//! Terminal presentation for Nimbus: intents in, dashboard text out.
//!
//! The controller owns all session state. Network work runs on a tokio
//! runtime and reports back over an mpsc channel that the controller drains
//! on its own thread.

pub mod controller;
pub mod error_mapping;
pub mod intent;
pub mod services;
pub mod session;
pub mod suggestions;
pub mod view;

pub use controller::DashboardController;
pub use error_mapping::IntoAppError;
pub use intent::Intent;
pub use services::{
    CountdownTicker, SpeechRecognizer, StdinDictation, UnsupportedSpeech, WeatherServiceMessage,
    WeatherServices,
};
pub use session::SessionState;
pub use suggestions::{CitySuggestions, MAJOR_CITIES};
pub use view::DashboardView;
