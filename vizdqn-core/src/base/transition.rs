use crate::{Action, StackedObs};

/// A transition `(s_t, a_t, r_t, s_t+1, terminal)`.
///
/// For a terminal step `next_state` is `state`, since no frame follows.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Observation before the action.
    pub state: StackedObs,

    /// Action taken.
    pub action: Action,

    /// Shaped reward.
    pub reward: f32,

    /// Observation after the action.
    pub next_state: StackedObs,

    /// Whether the episode ended with this step.
    pub terminal: bool,
}

impl Transition {
    /// Constructs a transition.
    pub fn new(
        state: StackedObs,
        action: Action,
        reward: f32,
        next_state: StackedObs,
        terminal: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            terminal,
        }
    }
}
