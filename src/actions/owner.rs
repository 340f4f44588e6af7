// src/actions/owner.rs
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::{endpoints, ApiRequest, Id, Transport};
use crate::errors::{ClientError, ClientResult};

/// Requests only the owner of a listing may make.
#[derive(Clone)]
pub struct OwnerActions {
    transport: Arc<dyn Transport>,
}

impl OwnerActions {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Hide a visible listing or show a hidden one. Returns the new hidden state
    /// when the server reports it.
    pub fn toggle_hide(&self, post_id: &Id) -> ClientResult<Option<bool>> {
        let resp = self.transport.send(&ApiRequest::post(
            endpoints::toggle_hide_post(post_id),
            json!({}),
        ))?;
        let hidden = hidden_flag(&resp);
        log::info!("toggled visibility of {post_id}: hidden={hidden:?}");
        Ok(hidden)
    }

    /// Bid to boost a listing into the top section.
    pub fn bid_top(&self, post_id: &Id, amount: u64) -> ClientResult<()> {
        if amount == 0 {
            return Err(ClientError::Validation("Enter a bid amount above zero.".into()));
        }
        self.transport.send(&ApiRequest::patch(
            endpoints::bid_top_post(post_id),
            json!({ "amount": amount }),
        ))?;
        log::info!("bid {amount} to boost {post_id}");
        Ok(())
    }
}

fn hidden_flag(resp: &Value) -> Option<bool> {
    let obj = resp.get("data").unwrap_or(resp);
    ["hidden", "isHidden"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_bool))
}
