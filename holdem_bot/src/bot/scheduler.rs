//! Paced, serialized execution of bot actions.
//!
//! Bot decisions are computed instantly, but the table should observe them
//! at a human pace. The scheduler is an actor draining a FIFO inbox: each
//! action waits the configured delay and then runs alone, so consecutive
//! actions are always at least one delay apart.

use super::errors::{BotError, BotResult};
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::{
    sync::mpsc,
    time::{Duration, sleep},
};

/// Delay before each bot action
pub const DEFAULT_ACTION_DELAY: Duration = Duration::from_millis(1500);

/// A deferred bot action. Errors are logged by the scheduler and never stop
/// the queue.
pub type BotAction = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Wait before every action
    pub action_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            action_delay: DEFAULT_ACTION_DELAY,
        }
    }
}

impl SchedulerConfig {
    pub fn with_delay_ms(ms: u64) -> Self {
        Self {
            action_delay: Duration::from_millis(ms),
        }
    }
}

enum SchedulerMessage {
    Run(BotAction),
    /// Stop once everything enqueued before this has run
    Close,
}

/// Scheduler handle for enqueuing actions
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: mpsc::UnboundedSender<SchedulerMessage>,
    pending: Arc<AtomicUsize>,
}

impl SchedulerHandle {
    /// Queue an action behind everything already enqueued.
    pub fn enqueue<F>(&self, action: F) -> BotResult<()>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.sender
            .send(SchedulerMessage::Run(Box::new(action)))
            .map_err(|_| {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                BotError::SchedulerClosed
            })
    }

    /// Stop the scheduler after the actions already queued.
    pub fn close(&self) -> BotResult<()> {
        self.sender
            .send(SchedulerMessage::Close)
            .map_err(|_| BotError::SchedulerClosed)
    }

    /// Actions enqueued but not yet finished
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Actor that runs bot actions one at a time
pub struct BotActionScheduler {
    config: SchedulerConfig,

    /// Message inbox
    inbox: mpsc::UnboundedReceiver<SchedulerMessage>,

    /// Shared with every handle
    pending: Arc<AtomicUsize>,

    executed: u64,

    failed: u64,
}

impl BotActionScheduler {
    /// Create a new scheduler
    ///
    /// # Returns
    ///
    /// * `(BotActionScheduler, SchedulerHandle)` - Actor and handle for enqueuing actions
    pub fn new(config: SchedulerConfig) -> (Self, SchedulerHandle) {
        let (sender, inbox) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let scheduler = Self {
            config,
            inbox,
            pending: pending.clone(),
            executed: 0,
            failed: 0,
        };
        let handle = SchedulerHandle { sender, pending };

        (scheduler, handle)
    }

    /// Run the scheduler until closed or every handle is dropped
    pub async fn run(mut self) {
        log::info!(
            "Bot action scheduler starting ({}ms delay)",
            self.config.action_delay.as_millis()
        );

        while let Some(message) = self.inbox.recv().await {
            match message {
                SchedulerMessage::Run(action) => {
                    sleep(self.config.action_delay).await;
                    self.execute(action);
                }
                SchedulerMessage::Close => break,
            }
        }

        self.inbox.close();
        let mut dropped = 0;
        while let Ok(message) = self.inbox.try_recv() {
            if let SchedulerMessage::Run(_) = message {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::warn!("Bot action scheduler dropped {dropped} actions queued after close");
        }

        log::info!(
            "Bot action scheduler closed ({} executed, {} failed)",
            self.executed,
            self.failed
        );
    }

    fn execute(&mut self, action: BotAction) {
        match catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(())) => self.executed += 1,
            Ok(Err(e)) => {
                self.failed += 1;
                log::error!("Bot action failed: {e:#}");
            }
            Err(panic) => {
                self.failed += 1;
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("Bot action panicked: {reason}");
            }
        }
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}
