//! Deployment process module

mod api;
mod commands;
mod models;

pub use commands::run_process_command;
pub use models::{
    DeploymentAction, DeploymentProcess, DeploymentStep, PackageReference, StartTrigger,
    StepCondition, CONDITION_EXPRESSION_PROPERTY,
};
