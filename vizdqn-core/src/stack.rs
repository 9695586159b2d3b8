//! Temporal stacking of preprocessed frames.
use crate::frame::ProcessedFrame;
use ndarray::{Array3, ArrayView2, Axis};
use std::rc::Rc;

/// Shape of a [`StackedObs`], `[height, width, frames]`.
pub type ObsShape = [usize; 3];

/// The input of the learner: the `K` most recent frames as a channel-last tensor.
///
/// Channel `0` is the oldest frame, channel `K - 1` the newest.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedObs(Array3<f32>);

impl StackedObs {
    /// Returns `[height, width, frames]`.
    pub fn shape(&self) -> ObsShape {
        let (h, w, k) = self.0.dim();
        [h, w, k]
    }

    /// Returns the underlying tensor.
    pub fn as_array(&self) -> &Array3<f32> {
        &self.0
    }

    /// Consumes the observation, returning the underlying tensor.
    pub fn into_array(self) -> Array3<f32> {
        self.0
    }

    /// Returns the `i`-th frame, `0` being the oldest.
    pub fn frame(&self, i: usize) -> ArrayView2<f32> {
        self.0.index_axis(Axis(2), i)
    }
}

impl From<Array3<f32>> for StackedObs {
    fn from(array: Array3<f32>) -> Self {
        Self(array)
    }
}

/// A fixed-capacity ring buffer of the most recent frames.
///
/// The first push after construction or [`FrameStack::reset`] fills every slot
/// with the given frame, so a partially filled stack is never observable.
/// Frames are shared, so cloning a stack is cheap; this is what
/// [`FrameStack::with_pushed`] relies on to build next-state observations.
#[derive(Debug, Clone)]
pub struct FrameStack {
    slots: Vec<Rc<ProcessedFrame>>,
    capacity: usize,

    // Slot to be overwritten next, which holds the oldest frame.
    next_slot: usize,
}

impl FrameStack {
    /// Constructs an empty stack of `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity of a frame stack must be positive");
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            next_slot: 0,
        }
    }

    /// Clears the stack, at episode boundaries.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.next_slot = 0;
    }

    /// Pushes a frame, evicting the oldest one.
    pub fn push(&mut self, frame: ProcessedFrame) {
        let frame = Rc::new(frame);
        if self.slots.is_empty() {
            self.slots = vec![frame; self.capacity];
            self.next_slot = 0;
        } else {
            self.slots[self.next_slot] = frame;
            self.next_slot = (self.next_slot + 1) % self.capacity;
        }
    }

    /// Returns a copy of this stack with `frame` pushed, leaving `self` untouched.
    pub fn with_pushed(&self, frame: ProcessedFrame) -> Self {
        let mut stack = self.clone();
        stack.push(frame);
        stack
    }

    /// Number of frames held, either `0` or the capacity.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` before the first push of an episode.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The number of frames in an observation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the frames from the oldest to the newest.
    pub fn frames(&self) -> impl Iterator<Item = &ProcessedFrame> + '_ {
        let n = self.slots.len();
        (0..n).map(move |i| &*self.slots[(self.next_slot + i) % n])
    }

    /// Builds the observation of the current frames, `None` if the stack is empty.
    pub fn snapshot(&self) -> Option<StackedObs> {
        let (h, w) = self.slots.first()?.dim();
        let mut array = Array3::zeros((h, w, self.capacity));
        for (i, frame) in self.frames().enumerate() {
            array.index_axis_mut(Axis(2), i).assign(frame);
        }
        Some(StackedObs(array))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::Array2;

    fn frame(v: f32) -> ProcessedFrame {
        Array2::from_elem((3, 2), v)
    }

    fn channels(obs: &StackedObs) -> Vec<f32> {
        (0..obs.shape()[2]).map(|i| obs.frame(i)[[0, 0]]).collect()
    }

    #[test]
    fn test_first_push_fills_every_slot() {
        let mut stack = FrameStack::new(4);
        assert!(stack.snapshot().is_none());

        stack.push(frame(0.5));
        let obs = stack.snapshot().unwrap();
        assert_eq!(stack.len(), 4);
        assert_eq!(obs.shape(), [3, 2, 4]);
        for i in 0..4 {
            assert_eq!(obs.frame(i), frame(0.5));
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut stack = FrameStack::new(4);
        stack.push(frame(0.0));
        for v in 1..=6 {
            stack.push(frame(v as f32));
            assert_eq!(stack.len(), 4);
        }
        assert_eq!(channels(&stack.snapshot().unwrap()), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_with_pushed_keeps_original() {
        let mut stack = FrameStack::new(3);
        stack.push(frame(1.0));
        stack.push(frame(2.0));

        let next = stack.with_pushed(frame(3.0));
        assert_eq!(channels(&stack.snapshot().unwrap()), vec![1.0, 1.0, 2.0]);
        assert_eq!(channels(&next.snapshot().unwrap()), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reset_restarts_warmup() {
        let mut stack = FrameStack::new(2);
        stack.push(frame(1.0));
        stack.push(frame(2.0));
        stack.reset();
        assert!(stack.is_empty());

        stack.push(frame(7.0));
        assert_eq!(channels(&stack.snapshot().unwrap()), vec![7.0, 7.0]);
    }
}
