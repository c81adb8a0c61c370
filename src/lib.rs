pub mod constants;

mod config;
mod context;
mod corpus;
mod cors;
mod errors;
mod headers;
mod options;
mod origin;
mod pattern;
mod tables;
mod util;

pub use context::RequestContext;
pub use cors::{Cors, CorsDecision};
pub use errors::{InvalidPolicy, PolicyIssue};
pub use headers::Headers;
pub use options::{AnonymousCorsOption, CorsOption};
pub use pattern::PatternError;
