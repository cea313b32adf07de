//! Lead-capture form embed.
//!
//! The form script is loaded globally at an unknown time. [`wait_until_ready`]
//! polls for it with a bounded wait and a cancellation token; [`FormBridge`]
//! renders into its mount point at most once per instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use blastsite_core::FormEmbedConfig;
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::EmbedError;

/// Options passed to the form script's create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub region: String,
    pub portal_id: String,
    pub form_id: String,
    /// Selector of the element the form renders into.
    pub target: String,
}

impl FormOptions {
    pub fn new(config: &FormEmbedConfig, target: impl Into<String>) -> Self {
        Self {
            region: config.region.clone(),
            portal_id: config.portal_id.clone(),
            form_id: config.form_id.clone(),
            target: target.into(),
        }
    }
}

/// The globally loaded form-rendering capability.
pub trait FormHost: Send + Sync {
    fn is_ready(&self) -> bool;

    /// # Errors
    ///
    /// Returns [`EmbedError::FormHost`] if the script rejects the options.
    fn create_form(&self, options: &FormOptions) -> Result<(), EmbedError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollConfig {
    #[must_use]
    pub fn from_millis(interval_ms: u64, timeout_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms.max(1)),
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from_millis(100, 10_000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut,
    Cancelled,
}

/// Resolves once `host` is ready, the timeout elapses, or `cancel` fires.
///
/// Readiness is checked immediately and then once per interval.
pub async fn wait_until_ready<H: FormHost + ?Sized>(
    host: &H,
    config: PollConfig,
    cancel: &CancellationToken,
) -> Readiness {
    if cancel.is_cancelled() {
        return Readiness::Cancelled;
    }
    if host.is_ready() {
        return Readiness::Ready;
    }

    let deadline = tokio::time::sleep(config.timeout);
    tokio::pin!(deadline);

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; readiness was just checked.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Readiness::Cancelled,
            () = &mut deadline => return Readiness::TimedOut,
            _ = ticker.tick() => {
                if host.is_ready() {
                    return Readiness::Ready;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// The latch was already set by an earlier or concurrent mount.
    AlreadyRendered,
    TimedOut,
    Cancelled,
    /// The host was ready but its create call failed; the latch stays set.
    Failed,
}

/// One form mount point.
///
/// The rendered latch is one-shot for the lifetime of the instance.
/// [`update_config`](Self::update_config) does not reset it: a different
/// portal or form needs a fresh `FormBridge`.
#[derive(Debug)]
pub struct FormBridge {
    options: FormOptions,
    poll: PollConfig,
    rendered: AtomicBool,
    cancel: CancellationToken,
}

impl FormBridge {
    pub fn new(options: FormOptions, poll: PollConfig) -> Self {
        Self {
            options,
            poll,
            rendered: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.rendered.load(Ordering::SeqCst)
    }

    /// Waits for the host and renders the form unless already rendered.
    ///
    /// Safe to call repeatedly or concurrently: at most one call ever reaches
    /// `create_form`. Timeouts and cancellation are silent.
    pub async fn mount<H: FormHost + ?Sized>(&self, host: &H) -> RenderOutcome {
        if self.is_rendered() {
            return RenderOutcome::AlreadyRendered;
        }

        match wait_until_ready(host, self.poll, &self.cancel).await {
            Readiness::Ready => {}
            Readiness::TimedOut => {
                tracing::debug!(
                    form_id = %self.options.form_id,
                    timeout_ms = self.poll.timeout.as_millis(),
                    "form script never became ready; giving up"
                );
                return RenderOutcome::TimedOut;
            }
            Readiness::Cancelled => return RenderOutcome::Cancelled,
        }

        if self
            .rendered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return RenderOutcome::AlreadyRendered;
        }

        match host.create_form(&self.options) {
            Ok(()) => {
                tracing::debug!(form_id = %self.options.form_id, target = %self.options.target, "form rendered");
                RenderOutcome::Rendered
            }
            Err(err) => {
                tracing::warn!(form_id = %self.options.form_id, error = %err, "form render failed");
                RenderOutcome::Failed
            }
        }
    }

    /// Replaces the form identifiers without touching the rendered latch.
    pub fn update_config(&mut self, config: &FormEmbedConfig) {
        let target = std::mem::take(&mut self.options.target);
        self.options = FormOptions::new(config, target);
    }

    /// Cancels any pending wait. Every in-flight `mount` resolves `Cancelled`.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for FormBridge {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
