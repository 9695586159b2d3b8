//! Types and traits for recording per-episode training metrics.
//!
//! A [`Record`] is a map from names to values. The [`Trainer`](crate::Trainer)
//! builds one record at the end of every episode and hands it to a
//! [`Recorder`], the metrics sink of the training loop.
//!
//! ```rust
//! use vizdqn_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("episode", 3.0);
//! record.insert("average_q", RecordValue::Scalar(0.42));
//! assert_eq!(record.get_scalar("average_q").unwrap(), 0.42);
//! ```
//!
//! * [`NullRecorder`] discards everything.
//! * [`BufferedRecorder`] keeps records in memory, which is handy in tests.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
