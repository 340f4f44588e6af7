mod poller;

pub use poller::{Backoff, CommentsPoller};

use serde_json::json;
use std::sync::Arc;

use crate::api::{endpoints, extract_list, ApiRequest, Comment, Id, Transport};
use crate::cancel::CancelToken;
use crate::errors::{ClientError, ClientResult};

#[derive(Clone)]
pub struct CommentsClient {
    transport: Arc<dyn Transport>,
}

impl CommentsClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn fetch(&self, post_id: &Id, token: &CancelToken) -> ClientResult<Vec<Comment>> {
        token.check()?;
        let body = self
            .transport
            .send(&ApiRequest::get(endpoints::post_comments(post_id)))?;
        token.check()?;
        extract_list(body)
    }

    /// Comment on a listing, or reply to `parent` when given.
    pub fn reply(&self, post_id: &Id, parent: Option<&Id>, text: &str) -> ClientResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation("Write something before sending.".into()));
        }

        let mut body = json!({
            "postId": post_id,
            "text": text,
        });
        if let Some(parent) = parent {
            body["parentId"] = json!(parent);
        }

        self.transport
            .send(&ApiRequest::post(endpoints::COMMENT_REPLY, body))?;
        log::info!("comment posted on {post_id}");
        Ok(())
    }
}
