use tokio::sync::broadcast;

/// Out-of-band notification from the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSignal {
    /// A request came back 401; the presentation layer should route the
    /// user back to the login screen.
    SessionExpired,
}

/// Small typed broadcaster built on `tokio::sync::broadcast`.
/// Send errors are ignored: no active subscriber is a normal state.
#[derive(Debug, Clone)]
pub struct AuthSignalBroadcaster {
    tx: broadcast::Sender<AuthSignal>,
}

impl AuthSignalBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn send(&self, signal: AuthSignal) {
        let _ = self.tx.send(signal);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthSignal> {
        self.tx.subscribe()
    }
}

impl Default for AuthSignalBroadcaster {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_every_subscriber() {
        let broadcaster = AuthSignalBroadcaster::new(4);
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();

        broadcaster.send(AuthSignal::SessionExpired);

        assert_eq!(a.recv().await.unwrap(), AuthSignal::SessionExpired);
        assert_eq!(b.recv().await.unwrap(), AuthSignal::SessionExpired);
    }

    #[test]
    fn send_without_subscribers_is_a_no_op() {
        let broadcaster = AuthSignalBroadcaster::new(4);
        broadcaster.send(AuthSignal::SessionExpired);
    }
}
