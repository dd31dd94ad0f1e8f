//! Git publishing for Quire sites.
//!
//! [`Publisher`] copies a generated site into a fresh clone of the target
//! repository and either commits and pushes it ([`Publisher::publish`]) or
//! reports what would change ([`Publisher::plan`]).
//!
//! Both operations work in a temporary directory that is removed on every
//! exit path, including errors, timeouts and cancellation. Push is always the
//! last step, so a failure never leaves the remote half-updated.

mod config;
mod error;
mod plan;
mod publisher;
mod staging;

pub use config::PublisherConfig;
pub use error::{PublishError, Stage};
pub use plan::{PlanReport, parse_status};
pub use publisher::Publisher;
