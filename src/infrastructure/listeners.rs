//! Completion listener implementations

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::debug;

use crate::domain::CompletionListener;

/// Forwards completion results to a receiver, typically the thread that
/// owns the terminal.
#[derive(Debug)]
pub struct ChannelListener {
    tx: Sender<String>,
}

impl ChannelListener {
    /// Listener plus the receiving end of its channel.
    pub fn channel() -> (Self, Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl CompletionListener for ChannelListener {
    fn on_solve_complete(&mut self, result: &str) {
        if self.tx.send(result.to_string()).is_err() {
            debug!(result, "completion receiver gone, dropping result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_listener_forwards_and_survives_dropped_receiver() {
        let (mut listener, results) = ChannelListener::channel();
        listener.on_solve_complete("Cost: 7");
        assert_eq!(results.try_recv().unwrap(), "Cost: 7");

        drop(results);
        listener.on_solve_complete("Cost: 8");
    }
}
