// src/domain/notices.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::errors::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message meant for the user (toast, inline banner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    /// What was being attempted, e.g. "Loading hot listings".
    pub context: String,
    pub message: String,
}

/// Shared queue of user-facing notices. Clones point at the same queue.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    inner: Arc<Mutex<VecDeque<Notice>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, context: &str, message: impl Into<String>) {
        self.push(Notice {
            level: NoticeLevel::Info,
            context: context.to_string(),
            message: message.into(),
        });
    }

    /// Log the failure and queue a readable message. Cancellations are dropped silently.
    pub fn report(&self, context: &str, err: &ClientError) {
        if err.is_cancelled() {
            log::debug!("{context}: cancelled");
            return;
        }
        log::error!("{context} failed: {err}");
        self.push(Notice {
            level: NoticeLevel::Error,
            context: context.to_string(),
            message: user_message(err),
        });
    }

    pub fn drain(&self) -> Vec<Notice> {
        match self.inner.lock() {
            Ok(mut q) => q.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(q) => q.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, notice: Notice) {
        match self.inner.lock() {
            Ok(mut q) => q.push_back(notice),
            Err(poisoned) => poisoned.into_inner().push_back(notice),
        }
    }
}

fn user_message(err: &ClientError) -> String {
    match err {
        ClientError::Network(_) => "Could not reach the server. Check your connection.".into(),
        ClientError::Status { status, .. } if *status == 401 || *status == 403 => {
            "Please sign in again.".into()
        }
        ClientError::Status { status, .. } => {
            format!("The server could not complete the request (HTTP {status}).")
        }
        ClientError::Decode(_) => "Received an unexpected response from the server.".into(),
        ClientError::Storage(_) => "Could not access data saved on this device.".into(),
        ClientError::Validation(msg) => msg.clone(),
        ClientError::Config(msg) => msg.clone(),
        ClientError::Cancelled => String::new(),
    }
}
