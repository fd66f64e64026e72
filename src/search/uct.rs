//! UCT agent: Upper Confidence Bound applied to Trees
//!
//! One iteration walks the tree with the UCT rule, expands one untried
//! action, plays a random rollout from the new node and pushes the
//! discounted return back up the path. After the budget is spent the root
//! child with the most visits wins.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::core::config::SearchConfig;
use crate::search::node::{SearchTree, ROOT};
use crate::search::Simulator;

/// Visit statistics of one root child
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<A> {
    pub action: A,
    pub visits: u32,
    pub mean_reward: f64,
}

/// Outcome of one search
#[derive(Debug, Clone)]
pub struct SearchReport<A> {
    /// Most visited root action, `None` when the root had no legal action
    pub best_action: Option<A>,
    /// Root children in expansion order
    pub root_children: Vec<ChildStats<A>>,
    pub iterations: u32,
    pub tree_size: usize,
}

impl<A> SearchReport<A> {
    fn empty() -> Self {
        Self {
            best_action: None,
            root_children: Vec::new(),
            iterations: 0,
            tree_size: 1,
        }
    }

    /// Sum of visits over the root's children
    pub fn root_child_visits(&self) -> u32 {
        self.root_children.iter().map(|c| c.visits).sum()
    }
}

/// Generic UCT search agent
pub struct UctAgent {
    name: String,
    config: SearchConfig,
    rng: ChaCha8Rng,
}

impl UctAgent {
    /// Create an agent whose rollouts are seeded from `config.seed`
    pub fn new(name: impl Into<String>, config: SearchConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            name: name.into(),
            config,
            rng,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Best immediate action from the simulator's initial state
    pub fn choose_action<S: Simulator>(&mut self, simulator: &S) -> Option<S::Action> {
        self.search(simulator).best_action
    }

    /// Run the full iteration budget and report root statistics
    pub fn search<S: Simulator>(&mut self, simulator: &S) -> SearchReport<S::Action> {
        let root_state = simulator.initial_state().clone();
        if simulator.is_terminal(&root_state) {
            return SearchReport::empty();
        }
        let actions = simulator.legal_actions(&root_state);
        if actions.is_empty() {
            return SearchReport::empty();
        }

        let mut tree = SearchTree::new(root_state, actions, false);

        for _ in 0..self.config.iterations {
            self.iterate(simulator, &mut tree);
        }

        let root = tree.root();
        let root_children: Vec<ChildStats<S::Action>> = root
            .children
            .iter()
            .filter_map(|&index| {
                let child = tree.get(index);
                child.action.clone().map(|action| ChildStats {
                    action,
                    visits: child.visits,
                    mean_reward: child.mean_reward(),
                })
            })
            .collect();

        // Robust child: most visits, first one wins ties
        let mut best: Option<&ChildStats<S::Action>> = None;
        for child in &root_children {
            if best.map_or(true, |b| child.visits > b.visits) {
                best = Some(child);
            }
        }
        let best_action = best.map(|c| c.action.clone());

        trace!(
            "{}: {} iterations, {} nodes, best {:?}",
            self.name,
            self.config.iterations,
            tree.len(),
            best_action
        );

        SearchReport {
            best_action,
            root_children,
            iterations: self.config.iterations,
            tree_size: tree.len(),
        }
    }

    fn iterate<S: Simulator>(&mut self, simulator: &S, tree: &mut SearchTree<S::State, S::Action>) {
        // Select
        let mut current = ROOT;
        loop {
            let node = tree.get(current);
            if node.terminal || !node.is_fully_expanded() || node.children.is_empty() {
                break;
            }
            current = self.select_child(tree, current);
        }

        // Expand
        let node = tree.get_mut(current);
        if !node.terminal && !node.untried.is_empty() {
            let action = node.untried.remove(0);
            let (state, reward) = simulator.apply_action(&node.state, &action);
            let terminal = simulator.is_terminal(&state);
            let actions = if terminal {
                Vec::new()
            } else {
                simulator.legal_actions(&state)
            };
            let terminal = terminal || actions.is_empty();
            current = tree.add_child(current, state, action, reward, actions, terminal);
        }

        // Simulate
        let rollout = if tree.get(current).terminal {
            0.0
        } else {
            let state = tree.get(current).state.clone();
            self.rollout(simulator, state)
        };

        // Backpropagate
        let mut ret = rollout;
        let mut index = Some(current);
        while let Some(i) = index {
            let node = tree.get_mut(i);
            ret = node.edge_reward + self.config.discount * ret;
            node.visits += 1;
            node.total_reward += ret;
            index = node.parent;
        }
    }

    /// Child with the highest UCT score; earlier children win ties
    fn select_child<St, A>(&self, tree: &SearchTree<St, A>, parent: usize) -> usize {
        let node = tree.get(parent);
        let mut best_index = node.children[0];
        let mut best_score = f64::NEG_INFINITY;

        for &child in &node.children {
            let score = tree
                .get(child)
                .uct_score(node.visits, self.config.exploration);
            if score > best_score {
                best_score = score;
                best_index = child;
            }
        }

        best_index
    }

    /// Random playout, discounted sum of rewards
    fn rollout<S: Simulator>(&mut self, simulator: &S, mut state: S::State) -> f64 {
        let mut total = 0.0;
        let mut weight = 1.0;

        for _ in 0..self.config.rollout_depth {
            if simulator.is_terminal(&state) {
                break;
            }
            let actions = simulator.legal_actions(&state);
            let Some(action) = actions.choose(&mut self.rng) else {
                break;
            };

            let (next, reward) = simulator.apply_action(&state, action);
            total += weight * reward;
            weight *= self.config.discount;
            state = next;
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One-shot bandit: pick an arm, collect its reward, game over
    struct BanditSim {
        rewards: Vec<f64>,
        start: Option<usize>,
    }

    impl Simulator for BanditSim {
        type State = Option<usize>;
        type Action = usize;

        fn initial_state(&self) -> &Option<usize> {
            &self.start
        }

        fn legal_actions(&self, state: &Option<usize>) -> Vec<usize> {
            match state {
                None => (0..self.rewards.len()).collect(),
                Some(_) => Vec::new(),
            }
        }

        fn apply_action(&self, _state: &Option<usize>, action: &usize) -> (Option<usize>, f64) {
            (Some(*action), self.rewards[*action])
        }

        fn is_terminal(&self, state: &Option<usize>) -> bool {
            state.is_some()
        }
    }

    /// Walk along a line; stepping right pays, stepping left does not
    struct LineSim {
        start: i32,
    }

    impl Simulator for LineSim {
        type State = i32;
        type Action = i32;

        fn initial_state(&self) -> &i32 {
            &self.start
        }

        fn legal_actions(&self, _state: &i32) -> Vec<i32> {
            vec![-1, 1]
        }

        fn apply_action(&self, state: &i32, action: &i32) -> (i32, f64) {
            (state + action, if *action > 0 { 1.0 } else { 0.0 })
        }

        fn is_terminal(&self, state: &i32) -> bool {
            state.abs() >= 10
        }
    }

    fn config(iterations: u32, seed: u64) -> SearchConfig {
        SearchConfig {
            iterations,
            seed,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_picks_dominant_arm() {
        let sim = BanditSim {
            rewards: vec![0.0, 0.0, 1.0, 0.0, 0.0],
            start: None,
        };
        let mut agent = UctAgent::new("test", config(500, 7));
        assert_eq!(agent.choose_action(&sim), Some(2));
    }

    #[test]
    fn test_root_visits_match_budget() {
        let sim = LineSim { start: 0 };
        for iterations in [1, 2, 37, 200] {
            let mut agent = UctAgent::new("test", config(iterations, 3));
            let report = agent.search(&sim);
            assert_eq!(report.root_child_visits(), iterations);
            assert_eq!(report.iterations, iterations);
        }
    }

    #[test]
    fn test_line_prefers_paying_direction() {
        let sim = LineSim { start: 0 };
        let mut agent = UctAgent::new("test", config(300, 11));
        assert_eq!(agent.choose_action(&sim), Some(1));
    }

    #[test]
    fn test_no_legal_action_is_noop() {
        let sim = BanditSim {
            rewards: vec![],
            start: None,
        };
        let mut agent = UctAgent::new("test", config(50, 1));
        let report = agent.search(&sim);
        assert!(report.best_action.is_none());
        assert!(report.root_children.is_empty());
    }

    #[test]
    fn test_terminal_root_is_noop() {
        let sim = BanditSim {
            rewards: vec![1.0],
            start: Some(0),
        };
        let mut agent = UctAgent::new("test", config(50, 1));
        assert!(agent.choose_action(&sim).is_none());
    }

    #[test]
    fn test_same_seed_same_statistics() {
        let sim = LineSim { start: 0 };
        let mut a = UctAgent::new("a", config(120, 99));
        let mut b = UctAgent::new("b", config(120, 99));

        let ra = a.search(&sim);
        let rb = b.search(&sim);
        assert_eq!(ra.root_children, rb.root_children);
        assert_eq!(ra.best_action, rb.best_action);
    }

    #[test]
    fn test_single_iteration_expands_first_action() {
        let sim = BanditSim {
            rewards: vec![0.3, 0.9],
            start: None,
        };
        let mut agent = UctAgent::new("test", config(1, 5));
        let report = agent.search(&sim);
        assert_eq!(report.root_children.len(), 1);
        assert_eq!(report.best_action, Some(0));
        assert_eq!(report.tree_size, 2);
    }
}
