//! Record models
//!
//! Job listings and companies as stored in the data store and mirrored
//! to the search engine. Field names serialize in camelCase to match the
//! public API; unknown payload fields are preserved verbatim and loosely
//! typed values are coerced rather than rejected.

mod company;
mod job;
mod lenient;

pub use company::Company;
pub use job::{Job, ScoredJob};
