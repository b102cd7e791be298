//! Retention sweeper for "Recently Deleted" bookmarks.
//!
//! # Responsibility
//! - Permanently erase soft-deleted bookmarks once the recovery window ends.
//!
//! # Invariants
//! - Sweeping is idempotent: a second run with the same `now` purges nothing.
//! - Per-bookmark failures are counted and logged, never returned.

use crate::clock::{days_to_ms, now_epoch_ms};
use crate::events::{EventBus, StoreEvent};
use crate::repo::bookmark_repo::BookmarkRepository;
use crate::repo::error::RepoError;
use crate::service::error::StoreResult;
use log::{debug, info, warn};

/// Days a soft-deleted bookmark stays recoverable.
pub const RETENTION_WINDOW_DAYS: i64 = 10;

/// Counters from one sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub purged: usize,
    /// Candidates that disappeared before they could be purged.
    pub skipped: usize,
    /// Candidates whose purge failed in the store.
    pub failed: usize,
}

/// Background housekeeping over the bookmark repository.
pub struct RetentionSweeper<R: BookmarkRepository> {
    repo: R,
    events: EventBus,
}

impl<R: BookmarkRepository> RetentionSweeper<R> {
    pub fn new(repo: R, events: EventBus) -> Self {
        Self { repo, events }
    }

    /// Purges bookmarks removed more than [`RETENTION_WINDOW_DAYS`] before `now`.
    ///
    /// `now` is epoch milliseconds. The removal timestamp is used when
    /// recorded, otherwise `date_saved`.
    ///
    /// # Errors
    /// - Only when the candidate query itself fails.
    pub fn sweep(&self, now: i64) -> StoreResult<SweepReport> {
        let cutoff = now.saturating_sub(days_to_ms(RETENTION_WINDOW_DAYS));
        let candidates = self.repo.list_purge_candidates(cutoff)?;

        let mut report = SweepReport::default();
        for bookmark_uuid in candidates {
            match self.repo.delete_bookmark(bookmark_uuid) {
                Ok(_) => report.purged += 1,
                Err(RepoError::BookmarkNotFound(_)) => {
                    debug!(
                        "event=retention_sweep module=retention status=skipped reason=already_removed bookmark_uuid={bookmark_uuid}"
                    );
                    report.skipped += 1;
                }
                Err(err) => {
                    warn!(
                        "event=retention_sweep module=retention status=error bookmark_uuid={bookmark_uuid} error={err}"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            "event=retention_sweep module=retention status=ok purged={} skipped={} failed={}",
            report.purged, report.skipped, report.failed
        );
        if report.purged > 0 {
            self.events.publish(StoreEvent::BookmarksPurged {
                count: report.purged,
            });
        }
        Ok(report)
    }

    /// Runs [`Self::sweep`] against the system clock.
    pub fn sweep_now(&self) -> StoreResult<SweepReport> {
        self.sweep(now_epoch_ms())
    }
}
