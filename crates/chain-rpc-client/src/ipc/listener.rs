//! Response listener: pumps inbound frames into the completion router.

use crate::ipc::router::CompletionRouter;
use crate::ports::outbound::FrameSource;
use tracing::{error, info};

pub struct ResponseListener {
    router: CompletionRouter,
    source: Box<dyn FrameSource>,
}

impl ResponseListener {
    pub fn new(router: CompletionRouter, source: Box<dyn FrameSource>) -> Self {
        Self { router, source }
    }

    /// Run the listener loop until the source closes.
    ///
    /// Closing resolves every request still pending.
    pub async fn run(mut self) {
        loop {
            match self.source.next_frame().await {
                Ok(Some(frame)) => {
                    self.router.on_frame(&frame);
                }
                Ok(None) => {
                    info!("Frame source closed, stopping listener");
                    self.router.on_shutdown("connection closed by peer");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Error receiving reply frame, stopping listener");
                    self.router.on_shutdown(&e.to_string());
                    break;
                }
            }
        }
    }
}
