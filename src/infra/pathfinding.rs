use std::collections::HashMap;

use crate::infra::{GridBounds, ObstacleSet, Position};

/// Index of a node inside a [`NodeArena`].
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub g: i32,
    pub h: i32,
}

impl Score {
    pub fn new(g: i32, h: i32) -> Self {
        Self { g, h }
    }

    pub fn total(&self) -> i32 {
        self.g + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Frontier,
    Visited,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    pos: Position,
    score: Score,
    previous: Option<NodeId>,
    state: NodeState,
}

/// Fixed-capacity node pool for one search. At most one node per cell.
struct NodeArena {
    nodes: Vec<Node>,
    by_position: HashMap<Position, NodeId>,
    capacity: usize,
}

impl NodeArena {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            by_position: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    fn alloc(&mut self, pos: Position, score: Score, previous: Option<NodeId>) -> NodeId {
        assert!(
            self.nodes.len() < self.capacity,
            "node arena capacity {} exceeded at {}",
            self.capacity,
            pos
        );
        debug_assert!(!self.by_position.contains_key(&pos), "{} allocated twice", pos);

        let id = self.nodes.len();
        self.nodes.push(Node {
            pos,
            score,
            previous,
            state: NodeState::Frontier,
        });
        self.by_position.insert(pos, id);
        id
    }

    fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    fn find(&self, pos: &Position) -> Option<NodeId> {
        self.by_position.get(pos).copied()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Open set, kept in insertion order so ties go to the earliest node.
#[derive(Default)]
struct Frontier {
    ids: Vec<NodeId>,
}

impl Frontier {
    fn push(&mut self, id: NodeId) {
        self.ids.push(id);
    }

    fn pop_min(&mut self, arena: &NodeArena) -> Option<NodeId> {
        let mut best: Option<(usize, i32)> = None;
        for (slot, &id) in self.ids.iter().enumerate() {
            let total = arena.get(id).score.total();
            if best.is_none_or(|(_, best_total)| total < best_total) {
                best = Some((slot, total));
            }
        }
        best.map(|(slot, _)| self.ids.remove(slot))
    }
}

/// Closed set, in settle order.
#[derive(Default)]
struct Visited {
    ids: Vec<NodeId>,
}

impl Visited {
    fn insert(&mut self, arena: &mut NodeArena, id: NodeId) {
        arena.get_mut(id).state = NodeState::Visited;
        self.ids.push(id);
    }

    fn find(&self, arena: &NodeArena, pos: &Position) -> Option<NodeId> {
        arena
            .find(pos)
            .filter(|&id| arena.get(id).state == NodeState::Visited)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// How a frontier node reached again from a new parent decides whether to
/// switch its predecessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Relaxation {
    /// Switch when the new parent's total score beats the total score of the
    /// node's current predecessor.
    #[default]
    PredecessorScore,
    /// Switch when the path through the new parent is strictly shorter than
    /// the node's own g.
    NodeScore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Cells after the start up to and including the goal. Empty if unreachable.
    pub route: Vec<Position>,
    pub expansions: usize,
    pub nodes_allocated: usize,
}

pub struct AStar;

impl AStar {
    /// Route from `start` to `goal` avoiding `obstacles`. The start cell never
    /// blocks itself, so callers may pass the whole body including the head.
    pub fn find_path(
        start: Position,
        goal: Position,
        obstacles: &[Position],
        bounds: GridBounds,
    ) -> Vec<Position> {
        Self::search(start, goal, obstacles, bounds, Relaxation::default()).route
    }

    #[tracing::instrument(level = "trace", skip(obstacles), fields(start_x = start.x, start_y = start.y, goal_x = goal.x, goal_y = goal.y))]
    pub fn search(
        start: Position,
        goal: Position,
        obstacles: &[Position],
        bounds: GridBounds,
        relaxation: Relaxation,
    ) -> SearchReport {
        if !bounds.is_inside(&start) {
            tracing::warn!(%start, size = bounds.size(), "Start outside grid, nothing to search");
            return SearchReport::default();
        }

        let obstacles = ObstacleSet::new(obstacles);
        tracing::trace!(blocked = obstacles.len(), "Searching");
        let mut arena = NodeArena::with_capacity(bounds.cell_count());
        let mut frontier = Frontier::default();
        let mut visited = Visited::default();

        let start_id = arena.alloc(start, Score::new(0, heuristic(start, goal)), None);
        frontier.push(start_id);

        let mut expansions = 0;

        while let Some(current) = frontier.pop_min(&arena) {
            visited.insert(&mut arena, current);
            expansions += 1;

            if let Some(goal_id) = visited.find(&arena, &goal) {
                let route = reconstruct_path(&arena, goal_id);
                tracing::trace!(expansions, steps = route.len(), "Path found");
                return SearchReport {
                    route,
                    expansions,
                    nodes_allocated: arena.len(),
                };
            }

            let parent = *arena.get(current);

            for neighbor in obstacles.walkable_neighbors(&bounds, parent.pos) {
                match arena.find(&neighbor) {
                    None => {
                        let score = Score::new(parent.score.g + 1, heuristic(neighbor, goal));
                        let id = arena.alloc(neighbor, score, Some(current));
                        frontier.push(id);
                    }
                    Some(id) if arena.get(id).state == NodeState::Visited => continue,
                    Some(id) => relax(&mut arena, id, current, relaxation),
                }
            }
        }

        tracing::trace!(expansions, visited = visited.len(), "No path found");
        SearchReport {
            route: Vec::new(),
            expansions,
            nodes_allocated: arena.len(),
        }
    }
}

fn heuristic(a: Position, b: Position) -> i32 {
    a.euclidean_distance(&b)
}

fn relax(arena: &mut NodeArena, id: NodeId, parent_id: NodeId, relaxation: Relaxation) {
    let node = *arena.get(id);
    let parent = *arena.get(parent_id);
    let candidate_g = parent.score.g + 1;

    let improved = match relaxation {
        Relaxation::PredecessorScore => node
            .previous
            .is_some_and(|prev| parent.score.total() < arena.get(prev).score.total()),
        Relaxation::NodeScore => candidate_g < node.score.g,
    };
    let aligned = node.pos.x == parent.pos.x || node.pos.y == parent.pos.y;

    if improved && aligned {
        let node = arena.get_mut(id);
        node.previous = Some(parent_id);
        node.score.g = candidate_g;
    }
}

fn reconstruct_path(arena: &NodeArena, goal_id: NodeId) -> Vec<Position> {
    let mut path = Vec::new();
    let mut current = arena.get(goal_id);
    while let Some(prev) = current.previous {
        path.push(current.pos);
        current = arena.get(prev);
    }
    path.reverse();
    path
}
