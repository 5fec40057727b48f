use super::Failure;

/// Observer notified of every failed gateway call.
///
/// Handlers run with the raw failure before the normalized error is returned
/// to the caller, in registration order.
pub trait ErrorHandler: Send + Sync {
    fn on_failure(&self, failure: &Failure);
}

impl<F> ErrorHandler for F
where
    F: Fn(&Failure) + Send + Sync,
{
    fn on_failure(&self, failure: &Failure) {
        self(failure)
    }
}
