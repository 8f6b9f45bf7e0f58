//! Terraform code-review logic shared by both transports.
//!
//! The REST handler and the gateway serve loop are both thin callers of
//! [`service::CodeReviewer::handle_run`]; neither embeds review logic of
//! its own.

pub mod comments;
pub mod errors;
pub mod prompt;
pub mod request;
pub mod response;
pub mod run;
pub mod service;

pub use comments::{ReviewComment, ReviewComments};
pub use errors::ReviewError;
pub use request::{ChangedFile, ContextFile, FileContent, ReviewRequest};
pub use response::ReviewResponse;
pub use run::{Message, RunCreateStateless, RunInput};
pub use service::CodeReviewer;
