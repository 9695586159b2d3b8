//! Discrete one-hot actions.

/// A combination of engine buttons with exactly one button pressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    buttons: Vec<bool>,
    index: usize,
}

impl Action {
    /// Constructs the action pressing button `index` out of `n_buttons`.
    ///
    /// Panics if `index >= n_buttons`.
    pub fn one_hot(n_buttons: usize, index: usize) -> Self {
        assert!(
            index < n_buttons,
            "action index {} out of {} buttons",
            index,
            n_buttons
        );
        Self {
            buttons: (0..n_buttons).map(|i| i == index).collect(),
            index,
        }
    }

    /// Index of the pressed button.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Button states as given to the engine.
    pub fn buttons(&self) -> &[bool] {
        &self.buttons
    }

    /// Number of buttons.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Always `false`; an action presses one of at least one button.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

/// Returns every one-hot action over `n` buttons, ordered by index.
pub fn all_actions(n: usize) -> Vec<Action> {
    (0..n).map(|i| Action::one_hot(n, i)).collect()
}

/// The set of actions available to the agent.
#[derive(Debug, Clone)]
pub struct ActionSpace {
    actions: Vec<Action>,
}

impl ActionSpace {
    /// Builds the space of one-hot actions over `n_buttons` buttons.
    pub fn new(n_buttons: usize) -> Self {
        Self {
            actions: all_actions(n_buttons),
        }
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if there is no button.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the action with the given index.
    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    /// Returns all actions, ordered by index.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}
