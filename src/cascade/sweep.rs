//! Group discovery by sweep pass.

use smallvec::SmallVec;

use crate::grid::{Cell, CellId, Grid};
use crate::pieces::Piece;

/// Cells of one connected group, in discovery order.
pub type Group = SmallVec<[CellId; 16]>;

/// Flood-fill the group containing `start` in a fresh sweep.
///
/// A cell belongs to the group when `member` accepts it. Returns an empty
/// group if `start` itself is not a member.
pub fn collect_group<P, F>(grid: &mut Grid<P>, start: CellId, member: F) -> Group
where
    P: Piece,
    F: Fn(&Cell<P>) -> bool,
{
    grid.begin_sweep();
    extend_group(grid, start, &member)
}

/// Flood-fill within the current sweep.
///
/// Cells marked earlier in the same sweep are skipped, so calling this for
/// several starts in one sweep yields disjoint groups and never revisits a
/// cell.
pub fn extend_group<P, F>(grid: &mut Grid<P>, start: CellId, member: &F) -> Group
where
    P: Piece,
    F: Fn(&Cell<P>) -> bool,
{
    let mut group = Group::new();
    if grid.is_marked(start) || !member(grid.cell(start)) {
        return group;
    }

    grid.mark(start);
    group.push(start);
    let mut next = 0;
    while next < group.len() {
        let id = group[next];
        next += 1;
        let neighbors: SmallVec<[CellId; 8]> = grid.neighbors(id).collect();
        for n in neighbors {
            if !grid.is_marked(n) && member(grid.cell(n)) {
                grid.mark(n);
                group.push(n);
            }
        }
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::digest::mix64;
    use crate::grid::Coord;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    struct Stone(u8);

    impl Piece for Stone {
        fn id(self) -> u16 {
            u16::from(self.0)
        }

        fn digest_tag(self) -> u64 {
            mix64(u64::from(self.0))
        }
    }

    fn at(grid: &Grid<Stone>, col: char, row: i32) -> CellId {
        grid.find(Coord::new(col, row)).unwrap()
    }

    #[test]
    fn test_collect_group() {
        let mut grid: Grid<Stone> = Grid::hexagon(3, 0);
        let a = at(&grid, 'C', 3);
        let b = at(&grid, 'D', 3);
        let c = at(&grid, 'A', 5);
        for id in [a, b, c] {
            grid.push(id, Stone(1));
        }

        let group = collect_group(&mut grid, a, |cell| cell.top() == Some(Stone(1)));
        assert_eq!(group.len(), 2);
        assert!(group.contains(&b));
        assert!(!group.contains(&c));
    }

    #[test]
    fn test_non_member_start() {
        let mut grid: Grid<Stone> = Grid::hexagon(3, 0);
        let a = at(&grid, 'C', 3);
        let group = collect_group(&mut grid, a, |cell| !cell.is_empty());
        assert!(group.is_empty());
    }

    #[test]
    fn test_extend_group_is_disjoint_within_sweep() {
        let mut grid: Grid<Stone> = Grid::hexagon(3, 0);
        let a = at(&grid, 'C', 3);
        let b = at(&grid, 'D', 3);
        grid.push(a, Stone(2));
        grid.push(b, Stone(2));

        let member = |cell: &Cell<Stone>| cell.top() == Some(Stone(2));
        grid.begin_sweep();
        let first = extend_group(&mut grid, a, &member);
        let second = extend_group(&mut grid, b, &member);
        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }
}
