//! Background dashboard refresh.
//!
//! A refresher recomputes the dashboard snapshot on a fixed interval and
//! publishes it through a watch channel. The task is owned by its
//! [`RefreshHandle`]: dropping the handle stops the task.

use crate::models::DashboardSnapshot;
use crate::services::dashboard::DashboardService;
use chrono::{DateTime, FixedOffset};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::Stream;

pub struct DashboardRefresher;

impl DashboardRefresher {
    /// Start refreshing immediately and then every `every`.
    ///
    /// `clock` supplies the instant each refresh is anchored to.
    pub fn spawn<C>(
        service: DashboardService,
        owner: Option<String>,
        every: Duration,
        clock: C,
    ) -> RefreshHandle
    where
        C: Fn() -> DateTime<FixedOffset> + Send + 'static,
    {
        let (tx, rx) = watch::channel(DashboardSnapshot::empty(&clock()));

        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let now = clock();
                match service.snapshot(&now, owner.as_deref()).await {
                    Ok(snapshot) => {
                        if tx.send(snapshot).is_err() {
                            tracing::debug!("No dashboard subscribers left, stopping refresh");
                            break;
                        }
                    }
                    // keep whatever was published last
                    Err(e) => tracing::debug!("Dashboard refresh failed: {}", e),
                }
            }
        });

        RefreshHandle { task, rx }
    }
}

/// Scoped ownership of a running refresher.
pub struct RefreshHandle {
    task: JoinHandle<()>,
    rx: watch::Receiver<DashboardSnapshot>,
}

impl RefreshHandle {
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.rx.clone()
    }

    pub fn current(&self) -> DashboardSnapshot {
        self.rx.borrow().clone()
    }

    pub fn cancel(self) {
        // Drop does the work
    }

    /// Stream of snapshots that keeps the refresher alive while polled.
    pub fn into_stream(self) -> SnapshotStream {
        SnapshotStream {
            inner: WatchStream::new(self.rx.clone()),
            _handle: self,
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct SnapshotStream {
    inner: WatchStream<DashboardSnapshot>,
    _handle: RefreshHandle,
}

impl Stream for SnapshotStream {
    type Item = DashboardSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
