// poller.rs
use rand::Rng;
use std::time::{Duration, Instant};

use crate::api::{Comment, Id};
use crate::cancel::CancelToken;
use crate::comments::CommentsClient;
use crate::domain::Notices;

const SLEEP_SLICE: Duration = Duration::from_millis(100);
const MIN_BASE: Duration = Duration::from_millis(100);

/// Poll interval that doubles on each failure up to `max` and snaps back to
/// `base` on success. `base` is never below 100ms, so a failing server is
/// never polled in a tight loop.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
    jitter: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(MIN_BASE);
        Self {
            base,
            max: max.max(base),
            current: base,
            jitter: Duration::ZERO,
        }
    }

    /// Random extra wait in `0..=jitter` added by [`Backoff::delay`].
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn on_success(&mut self) {
        self.current = self.base;
    }

    pub fn on_failure(&mut self) {
        self.current = std::cmp::min(self.current.saturating_mul(2), self.max);
    }

    pub fn delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.current;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.current + Duration::from_millis(extra)
    }
}

/// Keeps the comments of one listing fresh while its comments overlay is open.
pub struct CommentsPoller {
    client: CommentsClient,
    post_id: Id,
    backoff: Backoff,
    notices: Notices,
    comments: Vec<Comment>,
    failures: u32,
}

impl CommentsPoller {
    pub fn new(client: CommentsClient, post_id: Id, backoff: Backoff, notices: Notices) -> Self {
        Self {
            client,
            post_id,
            backoff,
            notices,
            comments: Vec::new(),
            failures: 0,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    /// One fetch. Returns `true` when the comment list was replaced.
    pub fn poll_once(&mut self, token: &CancelToken) -> bool {
        match self.client.fetch(&self.post_id, token) {
            Ok(comments) => {
                self.comments = comments;
                self.failures = 0;
                self.backoff.on_success();
                true
            }
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                self.failures += 1;
                self.backoff.on_failure();
                log::warn!(
                    "comments for {} failed (attempt {}), next poll in {:?}: {e}",
                    self.post_id,
                    self.failures,
                    self.backoff.current()
                );
                // Only the first failure of a streak reaches the user.
                if self.failures == 1 {
                    self.notices.report("Loading comments", &e);
                }
                false
            }
        }
    }

    /// Poll until the token is cancelled. `on_update` runs after each successful fetch.
    pub fn run<F>(&mut self, token: &CancelToken, mut on_update: F)
    where
        F: FnMut(&[Comment]),
    {
        while !token.is_cancelled() {
            if self.poll_once(token) {
                on_update(&self.comments);
            }
            sleep_unless_cancelled(self.backoff.delay(), token);
        }
        log::debug!("comments poller for {} stopped", self.post_id);
    }
}

fn sleep_unless_cancelled(total: Duration, token: &CancelToken) {
    let deadline = Instant::now() + total;
    while !token.is_cancelled() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(std::cmp::min(SLEEP_SLICE, deadline - now));
    }
}
