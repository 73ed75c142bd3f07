use tokio::sync::broadcast;

/// Source of the process-wide stop signal.
pub trait Shutdown {
    fn subscribe(&self) -> broadcast::Receiver<()>;
}

#[derive(Clone)]
pub struct ShutdownChannel {
    sender: broadcast::Sender<()>,
}

impl ShutdownChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    /// Signals every subscriber. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        self.sender.send(()).unwrap_or(0)
    }
}

impl Default for ShutdownChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown for ShutdownChannel {
    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_subscribers() {
        let shutdown = ShutdownChannel::new();
        let mut first = shutdown.subscribe();
        let mut second = shutdown.subscribe();

        assert_eq!(shutdown.trigger(), 2);
        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_subscribers() {
        assert_eq!(ShutdownChannel::new().trigger(), 0);
    }
}
