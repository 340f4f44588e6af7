// src/store/session.rs
use serde::{Deserialize, Serialize};

use crate::api::Id;
use crate::errors::ClientError;
use crate::store::{LocalStore, KEY_ONBOARDING_SEEN, KEY_USER_INFO};

/// The signed-in user as cached on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(alias = "_id")]
    pub id: Id,
    #[serde(default)]
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    store: LocalStore,
}

impl SessionStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// The cached user, or `None` when signed out. An unreadable record counts as signed out.
    pub fn load(&self) -> Result<Option<UserSession>, ClientError> {
        match self.store.get_json::<UserSession>(KEY_USER_INFO) {
            Err(ClientError::Decode(msg)) => {
                log::warn!("ignoring unreadable user record: {msg}");
                Ok(None)
            }
            other => other,
        }
    }

    pub fn save(&self, user: &UserSession) -> Result<(), ClientError> {
        self.store.put_json(KEY_USER_INFO, user)
    }

    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.store.remove(KEY_USER_INFO)
    }

    pub fn onboarding_seen(&self) -> Result<bool, ClientError> {
        Ok(self
            .store
            .get_raw(KEY_ONBOARDING_SEEN)?
            .map(|v| v == "true")
            .unwrap_or(false))
    }

    pub fn mark_onboarding_seen(&self) -> Result<(), ClientError> {
        self.store.put_raw(KEY_ONBOARDING_SEEN, "true")
    }
}
