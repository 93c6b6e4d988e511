//! Single-flight guard for purchase submission
//!
//! While one executor call is outstanding every other submission attempt
//! fails fast with `SubmissionInProgress`. The flag is released when the
//! guard drops, including on early returns and cancelled futures.

use crate::common::{SubmitError, SubmitResult};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    pub fn acquire(flag: &'a AtomicBool) -> SubmitResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| SubmissionGuard { flag })
            .map_err(|_| SubmitError::SubmissionInProgress)
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
