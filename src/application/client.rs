use crate::application::system::{DashboardCommand, DashboardEvent, SystemHandle};
use crate::domain::market::TimeInterval;
use anyhow::Result;
use crossbeam_channel::Receiver;

/// Unified event type for the User Interface
#[derive(Clone, Debug)]
pub enum SystemEvent {
    Dashboard(DashboardEvent),
    Log(String),
}

/// A client interface for talking to the dashboard runtime.
/// Abstracts away channel management and provides a clean API for the UI.
pub struct SystemClient {
    log_rx: Receiver<String>,
    handle: SystemHandle,
}

impl SystemClient {
    pub fn new(handle: SystemHandle, log_rx: Receiver<String>) -> Self {
        Self { handle, log_rx }
    }

    /// Poll for the next available event. Non-blocking; data results come
    /// before log lines.
    pub fn poll_next(&mut self) -> Option<SystemEvent> {
        if let Ok(event) = self.handle.event_rx.try_recv() {
            return Some(SystemEvent::Dashboard(event));
        }

        if let Ok(msg) = self.log_rx.try_recv() {
            return Some(SystemEvent::Log(msg));
        }

        None
    }

    // --- Command Methods ---

    pub fn send(&self, command: DashboardCommand) -> Result<()> {
        self.handle
            .command_tx
            .try_send(command)
            .map_err(|e| anyhow::anyhow!("Failed to send dashboard command: {}", e))
    }

    pub fn default_interval(&self) -> TimeInterval {
        self.handle.default_interval
    }
}
