//! Hydroq AI - UCT planning for a territory-capture strategy game

pub mod ai;
pub mod core;
pub mod map;
pub mod search;
