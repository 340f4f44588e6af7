// src/actions/payment.rs
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::models::lenient_text;
use crate::api::{endpoints, ApiRequest, Id, Transport};
use crate::errors::{ClientError, ClientResult};

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

/// Body of a mobile-money payment for a listing (boost, verification).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MobilePayment {
    pub phone_number: String,
    pub amount: u64,
    pub post_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[serde(
        default,
        alias = "transactionId",
        alias = "reference_id",
        deserialize_with = "lenient_text"
    )]
    pub reference: Option<String>,
    /// Kept as text; some gateways answer with a numeric code such as `200`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

/// Strip separators and check the number shape. International numbers keep a leading `+`.
pub fn normalize_phone(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Validation("Enter a phone number.".into()));
    }

    let (international, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix("00") {
        (true, rest)
    } else {
        (false, trimmed)
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => {
                return Err(ClientError::Validation(
                    "Phone number may only contain digits.".into(),
                ))
            }
        }
    }

    if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
        return Err(ClientError::Validation(format!(
            "Phone number must have between {MIN_DIGITS} and {MAX_DIGITS} digits."
        )));
    }

    Ok(if international {
        format!("+{digits}")
    } else {
        digits
    })
}

#[derive(Clone)]
pub struct Payments {
    transport: Arc<dyn Transport>,
}

impl Payments {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Validate, then hand the payment to the backend. Nothing is sent when validation fails.
    pub fn submit_mobile_payment(
        &self,
        post_id: &Id,
        phone: &str,
        amount: u64,
        operator: Option<&str>,
    ) -> ClientResult<PaymentReceipt> {
        if amount == 0 {
            return Err(ClientError::Validation("Amount must be above zero.".into()));
        }

        let payment = MobilePayment {
            phone_number: normalize_phone(phone)?,
            amount,
            post_id: post_id.clone(),
            operator: operator.map(str::to_string),
        };

        let body = serde_json::to_value(&payment)?;
        let resp = self
            .transport
            .send(&ApiRequest::post(endpoints::SUBMIT_MOBILE_PAYMENT, body))?;

        let receipt = if resp.is_null() {
            PaymentReceipt::default()
        } else {
            serde_json::from_value(resp)?
        };
        log::info!(
            "payment of {amount} for {post_id} submitted: {:?}",
            receipt.status
        );
        Ok(receipt)
    }
}
