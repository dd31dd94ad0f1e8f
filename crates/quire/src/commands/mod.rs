//! CLI command implementations.

mod build;
mod plan;
mod publish;
mod target;

pub(crate) use build::BuildArgs;
pub(crate) use plan::PlanArgs;
pub(crate) use publish::PublishArgs;
