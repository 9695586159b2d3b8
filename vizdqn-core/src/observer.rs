//! Observation pipeline: screen, preprocessing and frame stacking.
use crate::{error::VizdqnError, FramePreprocessor, FrameStack, Game, StackedObs};
use anyhow::Result;

/// Turns engine screens into stacked observations.
///
/// The episode runner and the dry run share this type, so evaluation states are
/// built exactly like training states.
#[derive(Debug, Clone)]
pub struct Observer {
    preprocessor: FramePreprocessor,
    stack: FrameStack,
}

impl Observer {
    /// Constructs an observer stacking `n_frames` frames.
    pub fn new(preprocessor: FramePreprocessor, n_frames: usize) -> Self {
        Self {
            preprocessor,
            stack: FrameStack::new(n_frames),
        }
    }

    /// `[height, width, frames]` of observations.
    pub fn obs_shape(&self) -> [usize; 3] {
        let (h, w) = self.preprocessor.output_shape();
        [h, w, self.stack.capacity()]
    }

    /// Clears the frame stack.
    pub fn reset(&mut self) {
        self.stack.reset();
    }

    /// The frame stack.
    pub fn stack(&self) -> &FrameStack {
        &self.stack
    }

    /// Pushes the current screen and returns the resulting observation.
    pub fn observe<G: Game + ?Sized>(&mut self, game: &mut G) -> Result<StackedObs> {
        let frame = self.preprocessor.preprocess(&game.screen()?)?;
        self.stack.push(frame);
        Ok(self.stack.snapshot().ok_or(VizdqnError::EmptyFrameStack)?)
    }

    /// Returns the observation with the current screen pushed, without modifying the stack.
    pub fn peek<G: Game + ?Sized>(&self, game: &mut G) -> Result<StackedObs> {
        let frame = self.preprocessor.preprocess(&game.screen()?)?;
        Ok(self
            .stack
            .with_pushed(frame)
            .snapshot()
            .ok_or(VizdqnError::EmptyFrameStack)?)
    }
}
