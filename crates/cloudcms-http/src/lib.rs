//! cloudcms-http - HTTP-backed Cloud CMS session.
//!
//! [`CloudCmsSession`] authenticates with the OAuth2 password grant and
//! exposes one async method per API operation.

mod association;
mod attachment;
mod auth;
mod branch;
mod client;
mod graphql;
mod job;
mod node;
mod observer;
mod paths;
mod platform;
mod project;
mod repository;
mod session;
mod stream;
mod version;

pub use association::CHILD_ASSOCIATION;
pub use attachment::DEFAULT_ATTACHMENT;
pub use job::wait_for_job;
pub use node::{CreateNodeOptions, TreeOptions};
pub use observer::TracingObserver;
pub use reqwest::Method;
pub use session::CloudCmsSession;
pub use stream::ByteStream;
