use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::domain::Projection;
use tokio::sync::RwLock;
use tracing::debug;

use crate::ProjectionOrchestrator;

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied(Projection),
    /// A newer refresh started while this one was in flight; its result was
    /// dropped.
    Superseded { ticket: u64, latest: u64 },
}

/// View-model holding the projection on screen.
///
/// Every refresh takes a ticket; only the holder of the newest ticket may
/// publish, so a slow response for an old topic can never replace the
/// result of a newer one.
pub struct ProjectionBoard {
    orchestrator: Arc<ProjectionOrchestrator>,
    generation: AtomicU64,
    current: RwLock<Option<Projection>>,
}

impl ProjectionBoard {
    pub fn new(orchestrator: Arc<ProjectionOrchestrator>) -> Self {
        Self {
            orchestrator,
            generation: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    pub async fn refresh(&self, topic: &str) -> RefreshOutcome {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let projection = self.orchestrator.project(topic).await;

        let mut current = self.current.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != ticket {
            debug!(ticket, latest, topic, "projection board: dropping stale result");
            return RefreshOutcome::Superseded { ticket, latest };
        }
        *current = Some(projection.clone());
        RefreshOutcome::Applied(projection)
    }

    pub async fn current(&self) -> Option<Projection> {
        self.current.read().await.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
