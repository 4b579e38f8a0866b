//! Background work for the dashboard. Everything here runs off the
//! controller's thread and reports back through channels or shared cells.

pub mod countdown_service;
pub mod speech;
pub mod weather_service;

pub use countdown_service::CountdownTicker;
pub use speech::{SpeechRecognizer, StdinDictation, UnsupportedSpeech};
pub use weather_service::{WeatherServiceMessage, WeatherServices};
