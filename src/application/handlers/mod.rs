//! Command and query handlers, one module per concern.

pub mod account;
pub mod billing;
pub mod copywriting;
pub mod credits;

/// Upper bound on optimistic commit attempts before surfacing
/// `AccountError::Contention`.
pub(crate) const MAX_COMMIT_ATTEMPTS: u32 = 4;
