//! Core library for the Atmos forecast chat client.
//!
//! This crate defines:
//! - The request/response models of `/api/generate_forecast`
//! - An HTTP client with user-facing error messages
//! - Chat transcript and weather card rendering, parameterized by [`Variant`]
//! - Error reporting with timed auto-hide
//! - Configuration on disk
//!
//! It is used by `atmos-cli`, but can also be embedded by other front ends.

pub mod card;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod markdown;
pub mod model;
pub mod page;
pub mod picker;
pub mod report;
pub mod session;
pub mod style;
pub mod toggle;
pub mod transcript;

pub use card::WeatherCard;
pub use client::{ForecastClient, ForecastError, HttpForecastClient};
pub use config::Config;
pub use endpoint::{Deployment, Endpoint};
pub use markdown::{CommonMark, MarkdownRenderer};
pub use model::{ForecastRequest, ForecastResponse, ForecastStyle, HealthStatus, WeatherData};
pub use picker::DatePickerConfig;
pub use report::{ErrorBanner, ErrorReporter};
pub use session::{ForecastSession, FormState};
pub use style::{RenderStyle, Variant};
pub use toggle::ToggleState;
pub use transcript::{ChatMessage, MessageBody, Sender, Transcript};
