//! Stripe API response shapes, limited to the fields this adapter reads.

use serde::Deserialize;

/// Response from `POST /v1/customers`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response from `POST /v1/checkout/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_parses_with_and_without_email() {
        let with: StripeCustomer =
            serde_json::from_str(r#"{"id":"cus_1","email":"a@b.co"}"#).unwrap();
        assert_eq!(with.email.as_deref(), Some("a@b.co"));

        let without: StripeCustomer = serde_json::from_str(r#"{"id":"cus_1"}"#).unwrap();
        assert!(without.email.is_none());
    }

    #[test]
    fn checkout_session_parses_redirect_url() {
        let session: StripeCheckoutSession =
            serde_json::from_str(r#"{"id":"cs_1","url":"https://checkout.stripe.com/cs_1"}"#)
                .unwrap();
        assert_eq!(session.url, "https://checkout.stripe.com/cs_1");
    }
}
