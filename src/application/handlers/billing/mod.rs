//! Billing handlers: event reconciliation and checkout initiation.

mod begin_checkout;
mod reconcile_event;

pub use begin_checkout::{
    BeginCheckoutCommand, BeginCheckoutHandler, BeginCheckoutResult, CheckoutSettings,
};
pub use reconcile_event::{ReconcileBillingEventHandler, ReconcileOutcome};
