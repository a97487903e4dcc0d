//! Stripe billing adapter.

mod adapter;
mod api_types;
mod mock;

pub use adapter::{StripeBillingAdapter, StripeConfig};
pub use mock::MockBillingProvider;
