use std::collections::HashSet;

use crate::infra::{GridBounds, Position};

/// Cells blocked for the duration of one planning call.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    cells: HashSet<Position>,
}

impl ObstacleSet {
    pub fn new(cells: &[Position]) -> Self {
        Self {
            cells: cells.iter().copied().collect(),
        }
    }

    pub fn is_blocked(&self, pos: &Position) -> bool {
        self.cells.contains(pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Inside the grid and not blocked.
    pub fn is_walkable(&self, bounds: &GridBounds, pos: &Position) -> bool {
        bounds.is_inside(pos) && !self.is_blocked(pos)
    }

    /// Walkable orthogonal neighbors of `pos`, in search order.
    pub fn walkable_neighbors<'a>(
        &'a self,
        bounds: &'a GridBounds,
        pos: Position,
    ) -> impl Iterator<Item = Position> + 'a {
        pos.neighbors()
            .into_iter()
            .filter(move |neighbor| self.is_walkable(bounds, neighbor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_cells_collapse() {
        let cell = Position::new(1, 1);
        let obstacles = ObstacleSet::new(&[cell, cell, Position::new(2, 1)]);
        assert_eq!(obstacles.len(), 2);
        assert!(!obstacles.is_empty());
        assert!(obstacles.is_blocked(&cell));
        assert!(!obstacles.is_blocked(&Position::new(0, 0)));
    }

    #[test]
    fn test_walkable_neighbors_filters_bounds_and_obstacles() {
        let bounds = GridBounds::new(4);
        let obstacles = ObstacleSet::new(&[Position::new(1, 0)]);

        let neighbors: Vec<Position> = obstacles
            .walkable_neighbors(&bounds, Position::new(0, 0))
            .collect();

        assert_eq!(neighbors, vec![Position::new(0, 1)]);
    }

    #[test]
    fn test_walkable_neighbors_keeps_search_order() {
        let bounds = GridBounds::new(5);
        let obstacles = ObstacleSet::default();
        assert!(obstacles.is_empty());

        let neighbors: Vec<Position> = obstacles
            .walkable_neighbors(&bounds, Position::new(2, 2))
            .collect();

        assert_eq!(neighbors, Position::new(2, 2).neighbors().to_vec());
    }
}
