//! Credit ledger handlers.

mod consume_credit;

pub use consume_credit::{ConsumeCreditCommand, ConsumeCreditHandler, ConsumeCreditResult};
