//! Drawing-surface attachment.
//!
//! A canvas-backed tier can only draw once its surface exists. In a UI the
//! surface appears some time after the component starts rendering; here the
//! caller flips a shared flag. Tiers poll it on a fixed budget and fail with
//! [`LabelError::CanvasUnavailable`] if it never shows up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::LabelConfig;
use crate::error::LabelError;

/// How long to wait for a surface: `attempts` sleeps of `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_millis(100),
        }
    }
}

impl PollBudget {
    pub fn from_config(config: &LabelConfig) -> Self {
        Self {
            attempts: config.surface_poll_attempts,
            interval: config.surface_poll_interval(),
        }
    }
}

/// Shared handle to a drawing surface that may or may not be attached yet.
///
/// Cloning shares the same flag, so one side can attach while another waits.
#[derive(Debug, Clone, Default)]
pub struct SurfaceSlot {
    attached: Arc<AtomicBool>,
}

impl SurfaceSlot {
    /// A surface that is already available (offscreen rendering).
    pub fn attached() -> Self {
        Self {
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A surface that has not been attached yet.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn attach(&self) {
        self.attached.store(true, Ordering::Release);
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::Release);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Wait until the surface is attached, polling up to `budget.attempts`
    /// times.
    pub async fn wait_attached(&self, budget: PollBudget) -> Result<(), LabelError> {
        let mut attempts = 0;
        while !self.is_attached() && attempts < budget.attempts {
            tokio::time::sleep(budget.interval).await;
            attempts += 1;
        }

        if self.is_attached() {
            Ok(())
        } else {
            Err(LabelError::CanvasUnavailable { attempts })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> PollBudget {
        PollBudget {
            attempts: 3,
            interval: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_attached_is_immediate() {
        let slot = SurfaceSlot::attached();
        assert!(slot.wait_attached(quick()).await.is_ok());
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let slot = SurfaceSlot::detached();
        let err = slot.wait_attached(quick()).await.unwrap_err();
        assert!(matches!(err, LabelError::CanvasUnavailable { attempts: 3 }));
    }

    #[tokio::test]
    async fn test_late_attach_is_seen() {
        let slot = SurfaceSlot::detached();
        let other = slot.clone();
        let budget = PollBudget {
            attempts: 50,
            interval: Duration::from_millis(5),
        };
        let attach = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            other.attach();
        });
        assert!(slot.wait_attached(budget).await.is_ok());
        attach.await.unwrap();
    }

    #[test]
    fn test_default_budget() {
        assert_eq!(PollBudget::default(), PollBudget::from_config(&LabelConfig::default()));
    }
}
