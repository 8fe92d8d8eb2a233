//! Docflow Integration
//!
//! Everything a task needs to know about the way it is wired to the workflow
//! engine, derived from its [`IntegrationPattern`]:
//!
//! - the resource identifier suffix the engine expects (`""`, `.sync`,
//!   `.waitForTaskToken`)
//! - the callback actions the engine must be allowed to perform
//! - the access policy attached to the role running the workflow
//!
//! All functions here are pure lookups over a closed set of patterns.

mod arn;
mod error;
mod grant;
mod pattern;
mod policy;

pub use arn::ServiceIntegration;
pub use docflow_config::IntegrationPattern;
pub use error::IntegrationError;
pub use grant::{BucketAccess, BucketGrant};
pub use pattern::{required_actions_for, suffix_for, validate_supported};
pub use policy::{
  AccessPolicy, AccessPolicyBuilder, Effect, PolicyScope, PolicyStatement, build_access_policy,
};
