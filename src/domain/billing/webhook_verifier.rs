//! Billing webhook signature verification.
//!
//! Events are authenticated with HMAC-SHA256 over `"{timestamp}.{payload}"`
//! using a shared signing secret. The signature header carries the
//! timestamp so stale deliveries can be rejected before the MAC check.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{BillingEvent, WebhookError};

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted event age (replay window).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Tolerance for events stamped slightly in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed `Billing-Signature` header.
///
/// Format: `t=<unix seconds>,v1=<hex hmac>`. Unknown keys are ignored
/// for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses the signature header string.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("malformed signature header".into()))?;

            match key {
                "t" => {
                    timestamp = Some(
                        value
                            .parse()
                            .map_err(|_| WebhookError::ParseError("invalid timestamp".into()))?,
                    );
                }
                "v1" => {
                    signature = Some(
                        hex::decode(value)
                            .map_err(|_| WebhookError::ParseError("invalid signature hex".into()))?,
                    );
                }
                _ => {}
            }
        }

        Ok(SignatureHeader {
            timestamp: timestamp
                .ok_or_else(|| WebhookError::ParseError("missing timestamp".into()))?,
            signature: signature
                .ok_or_else(|| WebhookError::ParseError("missing v1 signature".into()))?,
        })
    }
}

/// Verifier for inbound billing webhooks.
pub struct BillingWebhookVerifier {
    secret: SecretString,
}

impl BillingWebhookVerifier {
    /// Creates a verifier with the given signing secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Verifies the signature and parses the event envelope.
    ///
    /// Steps: parse the header, bound the timestamp, recompute the MAC,
    /// compare in constant time, then deserialize the payload. Events
    /// failing any step never reach the reconciler.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<BillingEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;
        self.check_timestamp(header.timestamp)?;

        let expected = self.compute_signature(header.timestamp, payload);
        if !constant_time_eq(&expected, &header.signature) {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    fn check_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let age = chrono::Utc::now().timestamp() - timestamp;
        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::StaleTimestamp);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::FutureTimestamp);
        }
        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time byte comparison; avoids leaking the expected MAC via timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Signs a payload the way the billing provider would. Test fixture helper.
#[cfg(test)]
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
