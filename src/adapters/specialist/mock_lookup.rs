//! Mock specialist lookup for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::doctor::DoctorListing;
use crate::ports::{LookupError, LookupRequest, SpecialistLookup};

/// Returns queued listings or errors; an empty queue yields no listings.
#[derive(Debug, Clone, Default)]
pub struct MockSpecialistLookup {
    replies: Arc<Mutex<VecDeque<Result<Vec<DoctorListing>, LookupError>>>>,
    calls: Arc<Mutex<Vec<LookupRequest>>>,
    delay: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockSpecialistLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(self, listings: Vec<DoctorListing>) -> Self {
        lock(&self.replies).push_back(Ok(listings));
        self
    }

    pub fn with_error(self, error: LookupError) -> Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<LookupRequest> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl SpecialistLookup for MockSpecialistLookup {
    async fn find_nearby(&self, request: LookupRequest) -> Result<Vec<DoctorListing>, LookupError> {
        lock(&self.calls).push(request);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        let reply = lock(&self.replies).pop_front();
        reply.unwrap_or_else(|| Ok(Vec::new()))
    }
}
