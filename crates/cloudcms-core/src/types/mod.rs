//! Validated and wire-level value types.

mod association;
mod base_url;

pub use association::{Direction, Directionality};
pub use base_url::BaseUrl;
