use super::Record;

/// Metrics sink of the training loop.
///
/// The [`Trainer`](crate::Trainer) writes one [`Record`] per episode and
/// flushes right after, so a recorder never needs to aggregate.
pub trait Recorder {
    /// Writes a record to the sink.
    fn write(&mut self, record: Record);

    /// Flushes buffered output, if any. Does nothing by default.
    fn flush(&mut self) {}
}
