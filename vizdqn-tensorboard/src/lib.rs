//! TensorBoard output of training metrics.
use anyhow::Result;
use chrono::Local;
use log::warn;
use std::path::{Path, PathBuf};
use tensorboard_rs::summary_writer::SummaryWriter;
use vizdqn_core::{
    metrics::EPISODE,
    record::{Record, RecordValue, Recorder},
};

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    logdir: PathBuf,
    step_key: String,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`. Records are indexed by their episode.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Result<Self> {
        let logdir = logdir.as_ref().to_path_buf();
        std::fs::create_dir_all(&logdir)?;
        Ok(Self {
            writer: SummaryWriter::new(&logdir),
            logdir,
            step_key: EPISODE.to_string(),
        })
    }

    /// Construct a [`TensorboardRecorder`] writing in a fresh directory of a run.
    ///
    /// The directory is `<logdir>/<train_name>/<%d%m%Y-%H%M%S>/train`, so that
    /// successive runs of the same training are shown side by side.
    pub fn for_run<P: AsRef<Path>>(logdir: P, train_name: &str) -> Result<Self> {
        let stamp = Local::now().format("%d%m%Y-%H%M%S").to_string();
        Self::new(logdir.as_ref().join(train_name).join(stamp).join("train"))
    }

    /// Directory the TFRecord is stored in.
    pub fn logdir(&self) -> &Path {
        &self.logdir
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// Every value is written at the step given by the episode index. A record
    /// without the episode index is skipped.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            None => {
                warn!("Record without a scalar {:?}, skipped", self.step_key);
                return;
            }
        };

        for (k, v) in record.iter() {
            if *k == self.step_key {
                continue;
            }
            let RecordValue::Scalar(v) = v;
            self.writer.add_scalar(k, *v, step);
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;
    use vizdqn_core::metrics::{AVERAGE_LOSS, AVERAGE_Q, EPISODE_REWARD};

    #[test]
    fn test_run_directory() -> Result<()> {
        let tmp = TempDir::new("vizdqn_tensorboard")?;
        let recorder = TensorboardRecorder::for_run(tmp.path(), "basic")?;

        let logdir = recorder.logdir();
        assert!(logdir.is_dir());
        assert_eq!(logdir.file_name().unwrap(), "train");
        assert!(logdir.starts_with(tmp.path().join("basic")));
        Ok(())
    }

    fn event_bytes(dir: &Path) -> Result<Vec<u8>> {
        let mut bytes = vec![];
        for entry in std::fs::read_dir(dir)? {
            bytes.extend(std::fs::read(entry?.path())?);
        }
        Ok(bytes)
    }

    fn contains(bytes: &[u8], tag: &str) -> bool {
        bytes.windows(tag.len()).any(|w| w == tag.as_bytes())
    }

    #[test]
    fn test_write_scalars() -> Result<()> {
        let tmp = TempDir::new("vizdqn_tensorboard")?;
        let mut recorder = TensorboardRecorder::new(tmp.path().join("train"))?;
        let logdir = recorder.logdir().to_path_buf();

        let mut record = Record::from_scalar(EPISODE, 0.0);
        record.insert(AVERAGE_Q, RecordValue::Scalar(1.5));
        record.insert(EPISODE_REWARD, RecordValue::Scalar(-0.5));
        recorder.write(record);
        // Without the episode index
        recorder.write(Record::from_scalar(AVERAGE_LOSS, 2.0));
        recorder.flush();

        // The event file is written by a background thread joined on drop
        drop(recorder);
        let bytes = event_bytes(&logdir)?;
        assert!(contains(&bytes, AVERAGE_Q));
        assert!(contains(&bytes, EPISODE_REWARD));
        assert!(!contains(&bytes, AVERAGE_LOSS));
        Ok(())
    }
}
