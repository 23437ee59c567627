//! Rollout controller.
//!
//! Per-episode state machine: push the configuration, patch the
//! workload's pod template to trigger a rolling restart, then poll
//! until the workload reports ready. No internal timeout; the episode
//! loop's own structure is the only bound.

use crate::client::OrchestratorClient;
use crate::error::RolloutError;
use std::sync::Arc;
use std::time::Duration;

/// Poll interval while waiting for rollout readiness: 2s.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RolloutState {
    Idle,
    ConfigPushed,
    Rolling,
    Ready,
    Failed,
}

pub struct RolloutController {
    client: Arc<dyn OrchestratorClient>,
    state: RolloutState,
}

impl RolloutController {
    pub fn new(client: Arc<dyn OrchestratorClient>) -> Self {
        Self {
            client,
            state: RolloutState::Idle,
        }
    }

    pub fn state(&self) -> RolloutState {
        self.state
    }

    /// Drive one full episode rollout: push config, patch workload,
    /// wait for readiness. Returns to `Idle` on success; leaves the
    /// controller in `Failed` on any orchestrator error.
    pub async fn roll(
        &mut self,
        document: &str,
        identifier: &str,
    ) -> Result<(), RolloutError> {
        self.push_config(document).await?;
        self.patch_workload(identifier).await?;
        self.wait_ready().await?;
        self.state = RolloutState::Idle;
        Ok(())
    }

    async fn push_config(&mut self, document: &str) -> Result<(), RolloutError> {
        match self.client.push_config(document).await {
            Ok(()) => {
                self.state = RolloutState::ConfigPushed;
                Ok(())
            }
            Err(e) => {
                self.state = RolloutState::Failed;
                Err(e)
            }
        }
    }

    async fn patch_workload(&mut self, identifier: &str) -> Result<(), RolloutError> {
        match self.client.patch_workload(identifier).await {
            Ok(()) => {
                self.state = RolloutState::Rolling;
                Ok(())
            }
            Err(e) => {
                self.state = RolloutState::Failed;
                Err(e)
            }
        }
    }

    async fn wait_ready(&mut self) -> Result<(), RolloutError> {
        loop {
            match self.client.replica_status().await {
                Ok((desired, available)) if available >= desired => {
                    self.state = RolloutState::Ready;
                    return Ok(());
                }
                Ok(_) => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(e) => {
                    self.state = RolloutState::Failed;
                    return Err(e);
                }
            }
        }
    }
}
