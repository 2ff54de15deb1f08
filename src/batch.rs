//! Outcome of a batch command.

/// What a batch command produced.
///
/// `R` is the command's detailed report; the message is the short status
/// text handed back to the caller.
#[derive(Clone, Debug)]
pub enum BatchOutcome<R> {
    /// The selection was empty, so no image was processed.
    NothingToProcess { message: String },
    /// Every selected image was processed or skipped.
    Finished { message: String, report: R },
}

impl<R> BatchOutcome<R> {
    /// The status message of the batch.
    pub fn message(&self) -> &str {
        match self {
            BatchOutcome::NothingToProcess { message } => message,
            BatchOutcome::Finished { message, .. } => message,
        }
    }

    /// The detailed report, if any image was processed.
    pub fn report(&self) -> Option<&R> {
        match self {
            BatchOutcome::NothingToProcess { .. } => None,
            BatchOutcome::Finished { report, .. } => Some(report),
        }
    }

    pub fn is_nothing_to_process(&self) -> bool {
        matches!(self, BatchOutcome::NothingToProcess { .. })
    }
}
