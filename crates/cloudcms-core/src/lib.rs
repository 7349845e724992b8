//! cloudcms-core - Core types and traits for the Cloud CMS client.

pub mod config;
pub mod credentials;
pub mod error;
pub mod job;
pub mod json;
pub mod params;
pub mod result_map;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::CloudcmsConfig;
pub use credentials::Credentials;
pub use error::Error;
pub use job::{JobState, WaitPolicy};
pub use json::{JsonObject, extract_id};
pub use params::QueryParams;
pub use result_map::ResultMap;
pub use tokens::{AccessToken, RefreshToken, TokenAction, TokenSet, TokenState};
pub use traits::{JobSource, NoopObserver, RequestInfo, RequestObserver};
pub use types::{BaseUrl, Direction, Directionality};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
