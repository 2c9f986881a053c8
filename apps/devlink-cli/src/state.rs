//! Local profile state: a mirror of the server's canonical record.
//!
//! The mirror is an explicit instance (constructed per session, or per test)
//! over an injected transport — not a process-wide singleton. After every
//! successful submission it is replaced wholesale with the server's response;
//! it is never patch-merged locally, so it cannot drift from the canonical
//! record. On failure it is left exactly as it was.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use devlink_proto::{ProfileRecord, UpdateProfileRequest};

use crate::client::{ClientError, ProfileTransport};

pub struct ProfileStore<T: ProfileTransport> {
    transport: T,
    user: Mutex<Option<ProfileRecord>>,
    in_flight: AtomicBool,
}

impl<T: ProfileTransport> ProfileStore<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            user: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Current local mirror of the canonical record.
    pub fn user(&self) -> Option<ProfileRecord> {
        self.user.lock().ok().and_then(|guard| guard.clone())
    }

    /// Seed the mirror (e.g. from a login response).
    pub fn set_user(&self, user: ProfileRecord) {
        if let Ok(mut guard) = self.user.lock() {
            *guard = Some(user);
        }
    }

    /// Submit an encoded profile update.
    ///
    /// A submission while another is in flight is rejected without touching
    /// the transport or the mirror.
    pub async fn submit(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<ProfileRecord, ClientError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(ClientError::UpdateInFlight);
        }

        let result = self.submit_inner(request).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn submit_inner(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<ProfileRecord, ClientError> {
        let record = self.transport.update_profile(request).await?;

        if let Ok(mut guard) = self.user.lock() {
            *guard = Some(record.clone());
        }

        Ok(record)
    }
}
