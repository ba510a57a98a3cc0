use tokio::sync::watch;

/// Readiness of the external player API.
///
/// Owned and passed around explicitly: whoever loads the API calls
/// [`mark_ready`](Self::mark_ready), controllers await [`wait_ready`](Self::wait_ready),
/// and [`teardown`](Self::teardown) puts it back to the initial state.
#[derive(Debug)]
pub struct PlayerApiRegistry {
    ready: watch::Sender<bool>,
}

impl Default for PlayerApiRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerApiRegistry {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self { ready }
    }

    pub fn mark_ready(&self) {
        if !self.ready.send_replace(true) {
            tracing::info!("Player API is ready");
        }
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    pub async fn wait_ready(&self) {
        let mut rx = self.ready.subscribe();
        // the sender lives in self, so the channel cannot close while we wait
        let _ = rx.wait_for(|ready| *ready).await;
    }

    pub fn teardown(&self) {
        self.ready.send_replace(false);
    }
}
