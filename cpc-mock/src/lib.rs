//! In-memory stand-in for the game-data service.
//!
//! [`MockGameData`] answers every endpoint the calculator uses from a
//! [`MockWorld`] built in code, and can be steered at runtime through a
//! [`MockController`] (injected failures, per-resource overrides, latency).
//! [`fixtures`] holds ready-made worlds for tests and demos.

use std::sync::Arc;

use async_trait::async_trait;
use cpc_core::{ApiRequest, ApiResponse, ApiTarget, CpcError, GameDataApi};
use tokio::sync::Mutex;

mod dynamic;
pub mod fixtures;
mod world;

pub use crate::dynamic::{MockBehavior, MockController};
use crate::dynamic::{InternalState, Step};
pub use crate::world::{
    AUCTION_DESCRIPTION, MockWorld, REALM_HREF_BASE, VENDOR_DESCRIPTION, not_found_body,
};

/// Mock connector serving a [`MockWorld`].
pub struct MockGameData {
    world: MockWorld,
    state: Arc<Mutex<InternalState>>,
}

impl Default for MockGameData {
    fn default() -> Self {
        Self::new(MockWorld::default())
    }
}

impl MockGameData {
    /// Serve `world`.
    #[must_use]
    pub fn new(world: MockWorld) -> Self {
        Self {
            world,
            state: Arc::new(Mutex::new(InternalState::default())),
        }
    }

    /// Serve `world` and return a controller for it.
    #[must_use]
    pub fn with_controller(world: MockWorld) -> (Arc<Self>, MockController) {
        let mock = Arc::new(Self::new(world));
        let ctrl = mock.controller();
        (mock, ctrl)
    }

    /// A controller sharing this connector's state.
    #[must_use]
    pub fn controller(&self) -> MockController {
        MockController {
            state: Arc::clone(&self.state),
        }
    }

    /// The world being served.
    #[must_use]
    pub const fn world(&self) -> &MockWorld {
        &self.world
    }
}

#[async_trait]
impl GameDataApi for MockGameData {
    fn name(&self) -> &'static str {
        "cpc-mock"
    }

    async fn fetch(&self, req: &ApiRequest) -> Result<ApiResponse, CpcError> {
        let target = match &req.target {
            ApiTarget::Path(p) | ApiTarget::Href(p) => p.as_str(),
        };
        let (step, latency) = {
            let mut guard = self.state.lock().await;
            (guard.record(target), guard.latency)
        };
        if let Some(d) = latency {
            tokio::time::sleep(d).await;
        }
        match step {
            Step::Answer => Ok(ApiResponse::new(self.world.answer(target, &req.query))),
            Step::Return(body) => Ok(ApiResponse::new(body)),
            Step::Fail(e) => Err(e),
            Step::Hang => match std::future::pending::<std::convert::Infallible>().await {},
        }
    }
}
