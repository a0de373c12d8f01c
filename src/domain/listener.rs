//! Outward notification seam of the tour engine.

/// Receives the human readable result once a tour cycle completes.
///
/// This is the only notification the engine emits; everything else is read
/// from the snapshot.
pub trait CompletionListener: Send {
    fn on_solve_complete(&mut self, result: &str);
}

impl<F> CompletionListener for F
where
    F: FnMut(&str) + Send,
{
    fn on_solve_complete(&mut self, result: &str) {
        self(result)
    }
}
