// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Client library for OpenWeatherMap current-weather lookups by city name.
//!
//! The library is split in two layers that can be used on their own:
//!
//! - **Model layer**: decoding and classification of response bodies into a
//!   [`WeatherReport`] or a [`LookupError`] (no I/O, easy to test with
//!   canned bodies)
//! - **Client layer**: URL construction and a single async GET per lookup
//!
//! # Quick Start
//!
//! ```no_run
//! use owm_client::{Client, ClientConfig, Units};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::new(ClientConfig {
//!         api_key: std::env::var("OPENWEATHERMAP_API_KEY").unwrap_or_default(),
//!         ..Default::default()
//!     })
//!     .expect("http client");
//!
//!     match client.current_weather("London", Units::Metric).await {
//!         Ok(report) => println!("{}: {}°C", report.name, report.temperature),
//!         Err(e) => eprintln!("lookup failed: {e}"),
//!     }
//! }
//! ```
//!
//! # Decoding Only
//!
//! ```
//! use owm_client::{interpret_body, LookupError, Units};
//!
//! let body = br#"{"cod": "404", "message": "city not found"}"#;
//! match interpret_body(body, Units::Imperial) {
//!     Err(LookupError::Rejected { code, message }) => {
//!         assert_eq!(code, 404);
//!         assert_eq!(message, "city not found");
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod units;

pub use client::{Client, ClientConfig, DEFAULT_ENDPOINT};
pub use error::LookupError;
pub use model::{interpret_body, Condition, ConditionKind, Coordinates, WeatherReport, SUCCESS_CODE};
pub use units::{ParseUnitsError, Units};
