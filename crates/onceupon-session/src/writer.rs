//! Background task that applies profile writes in order.

use crate::error::{Error, Result};
use onceupon_core::UserProfile;
use onceupon_db::ProfileRepository;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum WriteJob {
    Save(Box<UserProfile>),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Handle to the single writer of a session.
///
/// Jobs run one at a time in submission order, so a later snapshot can
/// never be overwritten by an earlier one.
pub(crate) struct ProfileWriter {
    jobs: mpsc::UnboundedSender<WriteJob>,
    handle: JoinHandle<()>,
}

impl ProfileWriter {
    pub fn spawn(repository: ProfileRepository) -> Self {
        let (jobs, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(writer_loop(repository, receiver));
        Self { jobs, handle }
    }

    /// Queue a snapshot; returns without waiting for the write.
    pub fn save(&self, profile: UserProfile) {
        self.submit(WriteJob::Save(Box::new(profile)));
    }

    /// Queue removal of the stored record.
    pub fn clear(&self) {
        self.submit(WriteJob::Clear);
    }

    /// Wait until every job queued so far has run.
    pub async fn flush(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.jobs
            .send(WriteJob::Flush(ack))
            .map_err(|_| Error::WriterClosed)?;
        done.await.map_err(|_| Error::WriterClosed)
    }

    /// Finish queued jobs and stop the task.
    pub async fn shutdown(self) {
        drop(self.jobs);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "profile writer ended abnormally");
        }
    }

    fn submit(&self, job: WriteJob) {
        if self.jobs.send(job).is_err() {
            tracing::warn!("profile writer stopped, write dropped");
        }
    }
}

async fn writer_loop(repository: ProfileRepository, mut jobs: mpsc::UnboundedReceiver<WriteJob>) {
    tracing::debug!("profile writer started");

    while let Some(job) = jobs.recv().await {
        match job {
            WriteJob::Save(profile) => match repository.save(&profile).await {
                Ok(true) => tracing::debug!("profile saved"),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "failed to save profile"),
            },
            WriteJob::Clear => match repository.clear().await {
                Ok(()) => tracing::debug!("stored profile removed"),
                Err(e) => tracing::warn!(error = %e, "failed to remove stored profile"),
            },
            WriteJob::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    tracing::debug!("profile writer shutting down");
}
