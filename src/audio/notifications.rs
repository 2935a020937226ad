// Notification propagator
//
// Forwards changed-property addresses to the host and runs the two deferred
// round-trips the driver needs: identify (fire after a delay) and
// configuration-change requests (fire and forget). Deferred work runs on a
// background tokio runtime so no host thread is ever held up by it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::hal;
use super::host::DriverHost;
use super::types::{ChangedProperties, ObjectId, PropertyAddress};

/// Runtime handle for deferred notifications.
///
/// Reuses the caller's tokio runtime when there is one, otherwise owns a
/// single-worker runtime that is shut down (without blocking) on drop.
pub struct BackgroundScheduler {
    handle: Handle,
    runtime: Option<Runtime>,
}

impl BackgroundScheduler {
    pub fn new() -> std::io::Result<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self {
                handle,
                runtime: None,
            });
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("vac-notify")
            .enable_time()
            .build()?;
        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
        })
    }

    pub fn owns_runtime(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn spawn<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(task)
    }

    /// Run `task` once after `delay`
    pub fn spawn_after<F>(&self, delay: Duration, task: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        })
    }
}

impl Drop for BackgroundScheduler {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// A deferred notification that has not necessarily fired yet
#[derive(Debug)]
pub struct ScheduledNotification {
    handle: JoinHandle<()>,
}

impl ScheduledNotification {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

pub struct NotificationDispatcher {
    host: Arc<dyn DriverHost>,
    scheduler: BackgroundScheduler,
    pending_identify: Mutex<Vec<ScheduledNotification>>,
}

impl NotificationDispatcher {
    pub fn new(host: Arc<dyn DriverHost>, scheduler: BackgroundScheduler) -> Self {
        Self {
            host,
            scheduler,
            pending_identify: Mutex::new(Vec::new()),
        }
    }

    pub fn host(&self) -> &Arc<dyn DriverHost> {
        &self.host
    }

    /// Forward one Set call's changes in a single batched host call.
    /// Nothing is sent for an empty list.
    pub fn dispatch(&self, object_id: ObjectId, changes: &ChangedProperties) {
        if changes.is_empty() {
            return;
        }
        let addresses = changes.to_vec();
        debug!(
            "{}: object {} changed {:?}",
            "NOTIFY".cyan(),
            object_id,
            addresses
                .iter()
                .map(|a| hal::fourcc_to_string(a.selector))
                .collect::<Vec<_>>()
        );
        self.host.properties_changed(object_id, &addresses);
    }

    /// Send a notification from the background runtime
    pub fn notify_async(&self, object_id: ObjectId, addresses: Vec<PropertyAddress>) {
        let host = Arc::clone(&self.host);
        self.scheduler.spawn(async move {
            host.properties_changed(object_id, &addresses);
        });
    }

    /// Ask the host, asynchronously, to schedule a configuration change.
    /// Returns before the host has seen the request.
    pub fn request_configuration_change(&self, device_id: ObjectId, change_action: u64) {
        info!(
            "📨 {}: device {} asks host to switch to {} Hz",
            "RATE_REQUEST".on_blue().white(),
            device_id,
            change_action
        );
        let host = Arc::clone(&self.host);
        self.scheduler.spawn(async move {
            host.request_device_configuration_change(device_id, change_action);
        });
    }

    /// Fire `address` on `object_id` once `delay` has elapsed
    pub fn schedule_identify(&self, object_id: ObjectId, address: PropertyAddress, delay: Duration) {
        let host = Arc::clone(&self.host);
        let handle = self.scheduler.spawn_after(delay, move || {
            host.properties_changed(object_id, &[address]);
        });

        info!(
            "💡 {}: object {} will signal identify in {:?}",
            "IDENTIFY".on_yellow().black(),
            object_id,
            delay
        );

        let mut pending = self.pending_identify.lock();
        pending.retain(|n| !n.is_finished());
        pending.push(ScheduledNotification { handle });
    }

    /// Identify notifications scheduled but not yet fired
    pub fn pending_identify_count(&self) -> usize {
        let mut pending = self.pending_identify.lock();
        pending.retain(|n| !n.is_finished());
        pending.len()
    }

    pub fn cancel_pending(&self) {
        for notification in self.pending_identify.lock().drain(..) {
            notification.cancel();
        }
    }
}

impl Drop for NotificationDispatcher {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
