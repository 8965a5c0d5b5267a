use std::cmp::Ordering;
use std::collections::BinaryHeap;

use indexmap::map::Entry;
use thiserror::Error;

use crate::{Board, Heuristic};

type IndexMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("puzzle is not solvable")]
    Unsolvable,
    #[error("puzzle is already solved")]
    AlreadySolved,
    #[error("frontier exhausted without solution")]
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: Self = Self(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
    pub depth: u32,
    pub parent: Option<NodeId>,
}

impl Node {
    pub const ROOT: Self = Self {
        depth: 0,
        parent: None,
    };
}

// Insertion order is kept, so the index of a board doubles as its `NodeId`.
#[derive(Debug, Default)]
pub struct Explored {
    nodes: IndexMap<Board, Node>,
}

impl Explored {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, board: Board, node: Node) -> Option<NodeId> {
        match self.nodes.entry(board) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                let id = NodeId(entry.index());
                entry.insert(node);
                Some(id)
            }
        }
    }

    // Only a strictly smaller depth relinks.
    pub fn reopen(&mut self, board: &Board, node: Node) -> Option<NodeId> {
        let (idx, _, known) = self.nodes.get_full_mut(board)?;
        (node.depth < known.depth).then(|| {
            *known = node;
            NodeId(idx)
        })
    }

    pub fn contains(&self, board: &Board) -> bool {
        self.nodes.contains_key(board)
    }

    pub fn get(&self, id: NodeId) -> Option<(&Board, &Node)> {
        self.nodes.get_index(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn trace(&self, id: NodeId) -> Vec<Board> {
        let mut boards = std::iter::successors(self.get(id), |(_, node)| {
            node.parent.and_then(|parent| self.get(parent))
        })
        .map(|(board, _)| *board)
        .collect::<Vec<_>>();
        boards.reverse();
        boards
    }
}

// `depth` is the depth the node had when it was queued.
#[derive(Debug, Clone, Copy)]
pub struct Pending {
    pub id: NodeId,
    pub depth: u32,
    pub f: u32,
}

// Ordered by `f` alone, reversed for a min-heap. Entries with equal `f` come out in
// whatever order the heap yields them.
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f)
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Pending>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId, depth: u32, estimate: u32) {
        self.heap.push(Pending {
            id,
            depth,
            f: depth + estimate,
        });
    }

    pub fn pop(&mut self) -> Option<Pending> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub path: Vec<Board>,
    // Sum of the successor counts of every expanded node.
    pub nodes_generated: u64,
    pub explored: usize,
}

impl Solution {
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    pub fn start(&self) -> &Board {
        &self.path[0]
    }

    pub fn goal(&self) -> &Board {
        &self.path[self.path.len() - 1]
    }
}

// Frontier and explored set are empty between runs, whatever the outcome.
#[derive(Debug, Default)]
pub struct Search {
    frontier: Frontier,
    explored: Explored,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(
        &mut self,
        start: Board,
        heuristic: impl Fn(&Board) -> u32,
        mut on_push: impl FnMut(&Board, u32),
    ) -> Result<Solution, SolveError> {
        if !start.is_solvable() {
            return Err(SolveError::Unsolvable);
        }
        if start.is_goal() {
            return Err(SolveError::AlreadySolved);
        }

        self.clear();
        let ret = self.drive(start, &heuristic, &mut on_push);
        match &ret {
            Ok(solution) => tracing::debug!(
                start = %start,
                depth = solution.depth(),
                nodes_generated = solution.nodes_generated,
                explored = solution.explored,
                "Search finished",
            ),
            Err(err) => tracing::warn!(start = %start, explored = self.explored.len(), "{err}"),
        }
        self.clear();
        ret
    }

    fn clear(&mut self) {
        self.frontier.clear();
        self.explored.clear();
    }

    fn drive(
        &mut self,
        start: Board,
        heuristic: &impl Fn(&Board) -> u32,
        on_push: &mut impl FnMut(&Board, u32),
    ) -> Result<Solution, SolveError> {
        self.explored.insert(start, Node::ROOT);
        let mut current = NodeId::ROOT;
        let mut nodes_generated = 0u64;
        loop {
            #[cfg(feature = "coz")]
            coz::scope!("Expand");

            nodes_generated += self.expand(current, heuristic, on_push) as u64;

            let (id, board) = loop {
                let pending = self.frontier.pop().ok_or(SolveError::Exhausted)?;
                match self.explored.get(pending.id) {
                    Some((&board, node)) if node.depth == pending.depth => {
                        break (pending.id, board)
                    }
                    // Relinked since it was queued.
                    _ => continue,
                }
            };
            current = id;

            #[cfg(feature = "coz")]
            coz::progress!("Pop");

            if board.is_goal() {
                break;
            }
        }

        Ok(Solution {
            path: self.explored.trace(current),
            nodes_generated,
            explored: self.explored.len(),
        })
    }

    fn expand(
        &mut self,
        id: NodeId,
        heuristic: &impl Fn(&Board) -> u32,
        on_push: &mut impl FnMut(&Board, u32),
    ) -> usize {
        let Some((&board, node)) = self.explored.get(id) else {
            return 0;
        };
        let child = Node {
            depth: node.depth + 1,
            parent: Some(id),
        };

        let successors = board.successors();
        for next in &successors {
            // Always holds for successors of a solvable board.
            if !next.is_solvable() {
                continue;
            }
            let Some(next_id) = self
                .explored
                .insert(*next, child)
                .or_else(|| self.explored.reopen(next, child))
            else {
                continue;
            };
            self.frontier.push(next_id, child.depth, heuristic(next));
            on_push(next, child.depth);
        }
        successors.len()
    }
}

pub fn solve(start: Board, heuristic: Heuristic) -> Result<Solution, SolveError> {
    Search::new().run(start, |board| heuristic.estimate(board), |_, _| {})
}
