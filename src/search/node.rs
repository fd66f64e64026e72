//! Arena-backed search tree
//!
//! Nodes refer to each other by index. The tree lives for one search call
//! and is dropped in one piece afterwards.

/// A single node in the search tree
#[derive(Debug, Clone)]
pub struct SearchNode<S, A> {
    pub state: S,
    /// Action that produced this node from its parent (`None` for the root)
    pub action: Option<A>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Legal actions not yet expanded, in the order they will be tried
    pub untried: Vec<A>,
    pub terminal: bool,
    pub visits: u32,
    pub total_reward: f64,
    /// Reward earned by the action leading here
    pub edge_reward: f64,
}

impl<S, A> SearchNode<S, A> {
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// UCT score of this node seen from a parent with `parent_visits` visits.
    /// Unvisited nodes score infinitely high.
    pub fn uct_score(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let parent = (parent_visits.max(1) as f64).ln();
        self.mean_reward() + exploration * (parent / self.visits as f64).sqrt()
    }
}

/// Index of the root node in every tree
pub const ROOT: usize = 0;

/// Flat tree; index 0 is the root
#[derive(Debug, Clone)]
pub struct SearchTree<S, A> {
    nodes: Vec<SearchNode<S, A>>,
}

impl<S, A> SearchTree<S, A> {
    pub fn new(state: S, actions: Vec<A>, terminal: bool) -> Self {
        Self {
            nodes: vec![SearchNode {
                state,
                action: None,
                parent: None,
                children: Vec::new(),
                untried: actions,
                terminal,
                visits: 0,
                total_reward: 0.0,
                edge_reward: 0.0,
            }],
        }
    }

    pub fn root(&self) -> &SearchNode<S, A> {
        &self.nodes[ROOT]
    }

    pub fn get(&self, index: usize) -> &SearchNode<S, A> {
        &self.nodes[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut SearchNode<S, A> {
        &mut self.nodes[index]
    }

    /// Attach a new child below `parent` and return its index
    pub fn add_child(
        &mut self,
        parent: usize,
        state: S,
        action: A,
        edge_reward: f64,
        actions: Vec<A>,
        terminal: bool,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(SearchNode {
            state,
            action: Some(action),
            parent: Some(parent),
            children: Vec::new(),
            untried: actions,
            terminal,
            visits: 0,
            total_reward: 0.0,
            edge_reward,
        });
        self.nodes[parent].children.push(index);
        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Path from the root down to `index`
    pub fn path_to(&self, mut index: usize) -> Vec<usize> {
        let mut path = vec![index];
        while let Some(parent) = self.nodes[index].parent {
            path.push(parent);
            index = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_root_only() {
        let tree: SearchTree<u32, char> = SearchTree::new(0, vec!['a', 'b'], false);
        assert_eq!(tree.len(), 1);
        assert!(tree.root().action.is_none());
        assert!(!tree.root().is_fully_expanded());
    }

    #[test]
    fn test_add_child_links_parent() {
        let mut tree: SearchTree<u32, char> = SearchTree::new(0, vec!['a'], false);
        let child = tree.add_child(ROOT, 1, 'a', 0.5, vec![], true);

        assert_eq!(child, 1);
        assert_eq!(tree.root().children, vec![1]);
        assert_eq!(tree.get(child).parent, Some(0));
        assert_eq!(tree.get(child).action, Some('a'));
        assert_eq!(tree.path_to(child), vec![0, 1]);
    }

    #[test]
    fn test_mean_reward() {
        let mut tree: SearchTree<u32, char> = SearchTree::new(0, vec![], false);
        assert_eq!(tree.root().mean_reward(), 0.0);

        let root = tree.get_mut(0);
        root.visits = 4;
        root.total_reward = 2.0;
        assert_eq!(root.mean_reward(), 0.5);
    }

    #[test]
    fn test_uct_score_prefers_unvisited() {
        let mut tree: SearchTree<u32, char> = SearchTree::new(0, vec![], false);
        assert_eq!(tree.root().uct_score(10, 1.0), f64::INFINITY);

        let root = tree.get_mut(0);
        root.visits = 10;
        root.total_reward = 5.0;
        let expected = 0.5 + (10f64.ln() / 10.0).sqrt();
        assert!((root.uct_score(10, 1.0) - expected).abs() < 1e-9);
    }
}
