//! Account lifecycle handlers.

mod check_access;
mod register_account;

pub use check_access::{CheckAccessHandler, CheckAccessQuery, CheckAccessResult};
pub use register_account::{RegisterAccountCommand, RegisterAccountHandler, RegisterAccountResult};
