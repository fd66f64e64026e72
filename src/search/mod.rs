//! Game-agnostic Monte-Carlo tree search
//!
//! Architecture: Trait + arena
//! - `Simulator` is the only thing the search knows about a game
//! - `SearchTree` is a flat arena rebuilt for every decision
//! - `UctAgent` runs select/expand/simulate/backpropagate over it

pub mod node;
pub mod uct;

pub use node::{SearchNode, SearchTree, ROOT};
pub use uct::{ChildStats, SearchReport, UctAgent};

use std::fmt::Debug;

/// Pure model of a game, as seen by the search.
///
/// Implementations must never touch live game objects: `apply_action`
/// returns a fresh state and the reward earned by the move, higher being
/// better for the deciding side.
pub trait Simulator {
    type State: Clone;
    type Action: Clone + PartialEq + Debug;

    /// State the search starts from
    fn initial_state(&self) -> &Self::State;

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> (Self::State, f64);

    fn is_terminal(&self, state: &Self::State) -> bool;
}
