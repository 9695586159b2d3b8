//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum VizdqnError {
    /// The engine produced a frame of a resolution the preprocessor is not configured for.
    #[error("Unexpected frame shape: expected {expected:?} (w, h), got {actual:?}")]
    FrameShape {
        /// Configured input resolution.
        expected: (u32, u32),
        /// Resolution of the given frame.
        actual: (u32, u32),
    },

    /// No scenario to choose from.
    #[error("Scenario pool is empty")]
    EmptyScenarioPool,

    /// Average Q can not be computed without states.
    #[error("Evaluation state set is empty")]
    EmptyEvalStates,

    /// There is no action to choose from.
    #[error("Action space is empty")]
    EmptyActionSpace,

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The episode timeout is zero in decision steps.
    #[error("Invalid episode timeout: {tics} tics with frame repeat {frame_repeat}")]
    InvalidTimeout {
        /// Timeout reported by the engine.
        tics: usize,
        /// Engine tics per decision.
        frame_repeat: usize,
    },

    /// The distance to the goal at episode start can not normalize distances.
    #[error("Invalid initial distance: {0}")]
    InvalidInitialDistance(f64),

    /// A snapshot was requested before any frame was pushed.
    #[error("Frame stack is empty")]
    EmptyFrameStack,

    /// The game session was used after it had been closed.
    #[error("Game session is closed")]
    SessionClosed,

    /// The learner returned Q-values not matching the queried batch.
    #[error("Malformed Q-values: {0}")]
    QValues(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKey(String),
}
