//! Seams between the core types and a transport.

mod job;
mod observer;

pub use job::JobSource;
pub use observer::{NoopObserver, RequestInfo, RequestObserver};
