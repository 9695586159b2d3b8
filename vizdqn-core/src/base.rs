//! Collaborators of the training loop.
mod game;
mod learner;
mod transition;
pub use game::{Game, GameVariable};
pub use learner::Learner;
pub use transition::Transition;
