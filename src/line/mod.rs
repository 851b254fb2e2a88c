// vim: set ai et ts=4 sw=4 sts=4:
mod solver;

use std::fmt;
use std::ops::Range;
use ansi_term::{Colour, Style, ANSIString};

use super::util::{Direction, Direction::*};
use super::grid::{Grid, Square, SquareStatus, Error};

pub trait DirectionalSequence
{
    fn get_row_index(&self) -> usize;
    fn get_direction(&self) -> Direction;

    fn square_index(&self, at: usize) -> (usize, usize) {
        match self.get_direction() {
            Horizontal => (at, self.get_row_index()),
            Vertical   => (self.get_row_index(), at),
        }
    }
    fn square<'a>(&self, grid: &'a Grid, at: usize) -> &'a Square {
        let (x, y) = self.square_index(at);
        grid.get_square(x, y)
    }
    fn square_mut<'a>(&self, grid: &'a mut Grid, at: usize) -> &'a mut Square {
        let (x, y) = self.square_index(at);
        grid.get_square_mut(x, y)
    }
}

// -------------------------------------------------------------

/// Stable identifier of one candidate placement; squares keep sets of these
/// as their ownership index.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct PlacementId {
    pub direction:  Direction,
    pub line_index: usize,
    pub run_index:  usize,
    pub start:      usize,
}

/// One still-possible contiguous location for a clue run within its line.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Placement {
    pub start:  usize,
    pub length: usize,
}
impl Placement {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
    /// True if the given (non-empty) range of squares falls entirely within this placement.
    pub fn contains(&self, range: &Range<usize>) -> bool {
        self.start <= range.start && range.start < range.end && range.end <= self.end()
    }
}

// -------------------------------------------------------------

/// Live tracking state for one clue within one line: the clue's required
/// length plus the sorted set of start positions it could still occupy.
#[derive(Debug)]
pub struct ClueRun {
    pub direction:  Direction,
    pub line_index: usize,
    pub index:      usize,
    pub length:     usize,
    pub starts:     Vec<usize>, // ascending; never empty while the clues are consistent
    completed:      bool,
}

impl ClueRun {
    fn new(direction: Direction,
           line_index: usize,
           index: usize,
           length: usize,
           first_start: usize,
           last_end: usize) -> Self
    {
        ClueRun {
            direction,
            line_index,
            index,
            length,
            starts: (first_start..=(last_end - length)).collect(),
            completed: false,
        }
    }

    pub fn first_start(&self) -> usize { self.starts[0] }
    pub fn last_start(&self)  -> usize { self.starts[self.starts.len()-1] }
    pub fn first_end(&self)   -> usize { self.first_start() + self.length }
    pub fn last_end(&self)    -> usize { self.last_start() + self.length }

    pub fn is_fixed(&self) -> bool {
        self.starts.len() == 1
    }
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn placement_at(&self, start: usize) -> Placement {
        Placement { start, length: self.length }
    }
    pub fn placements(&self) -> impl Iterator<Item=Placement> + '_ {
        let length = self.length;
        self.starts.iter().map(move |&start| Placement { start, length })
    }
    pub fn id_at(&self, start: usize) -> PlacementId {
        PlacementId {
            direction:  self.direction,
            line_index: self.line_index,
            run_index:  self.index,
            start,
        }
    }

    /// The range of squares covered under every surviving placement, if any.
    pub fn overlap(&self) -> Option<Range<usize>> {
        if self.last_start() < self.first_end() {
            Some(self.last_start()..self.first_end())
        } else {
            None
        }
    }

    /// True if some surviving placement covers the entire given range.
    pub fn can_contain(&self, range: &Range<usize>) -> bool {
        if range.end - range.start > self.length {
            return false;
        }
        for &start in &self.starts {
            if start > range.start {
                break;
            }
            if range.end <= start + self.length {
                return true;
            }
        }
        false
    }

    /// True if every surviving placement covers the entire given range; such
    /// squares are guaranteed to belong to this run.
    pub fn must_contain(&self, range: &Range<usize>) -> bool {
        if !self.can_contain(range) {
            return false;
        }
        self.placements().all(|p| p.contains(range))
    }

    pub fn to_colored_string(&self) -> ANSIString {
        let style = match self.completed {
            true  => Style::new().fg(Colour::Fixed(241)),
            false => Style::default(),
        };
        style.paint(self.to_string())
    }
}
impl DirectionalSequence for ClueRun {
    fn get_row_index(&self) -> usize { self.line_index }
    fn get_direction(&self) -> Direction { self.direction }
}
impl fmt::Display for ClueRun {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.length)
    }
}

// -------------------------------------------------------------

#[derive(Debug)]
pub struct Line {
    pub direction: Direction,
    pub index:     usize,
    pub length:    usize,
    pub runs:      Vec<ClueRun>,
}

impl Line {
    pub fn new(grid: &mut Grid,
               direction: Direction,
               index: usize,
               run_lengths: &[usize]) -> Result<Self, Error>
    {
        let length = match direction {
            Horizontal => grid.width(),
            Vertical   => grid.height(),
        };
        let lengths = run_lengths.iter()
                                 .copied()
                                 .filter(|&len| len > 0)
                                 .collect::<Vec<_>>();
        let mut runs = Vec::<ClueRun>::new();
        if !lengths.is_empty() {
            // every clue needs its own squares plus a single-square gap between neighbors
            let occupied: usize = lengths.iter().sum::<usize>() + lengths.len() - 1;
            if occupied > length {
                return Err(Error::Construction(
                    format!("clues {:?} require {} squares, but {} line {} has only {}",
                            lengths, occupied, direction, index, length)));
            }
            let slack = length - occupied;
            let mut run_start: usize = 0;
            for (i, &len) in lengths.iter().enumerate() {
                runs.push(ClueRun::new(direction, index, i, len, run_start, run_start + len + slack));
                run_start += len + 1;
            }
        }
        let line = Line {
            direction,
            index,
            length,
            runs,
        };
        line.register_placements(grid);
        Ok(line)
    }

    fn register_placements(&self, grid: &mut Grid) {
        for run in &self.runs {
            for &start in &run.starts {
                for at in run.placement_at(start).range() {
                    self.square_mut(grid, at).register_placement(run.id_at(start));
                }
            }
        }
    }

    pub fn is_trivially_empty(&self) -> bool {
        self.runs.is_empty()
    }
    pub fn is_completed(&self) -> bool {
        self.runs.iter().all(|r| r.is_completed())
    }
    pub fn candidate_count(&self) -> usize {
        self.runs.iter().map(|r| r.starts.len()).sum()
    }

    fn ranges_of_squares<P>(&self, grid: &Grid, pred: P) -> Vec<Range<usize>>
        where P: Fn(&Square) -> bool
    {
        // given a predicate on a square, returns a set of mutually exclusive maximal
        // ranges within this line for which the predicate holds for all squares
        let mut result = Vec::<Range<usize>>::new();
        let mut x: usize = 0;
        while x < self.length {
            // skip past squares for which the predicate does not hold
            while x < self.length && !pred(self.square(grid, x)) {
                x += 1;
            }
            if x >= self.length { break; }

            // skip past squares for which the predicate does hold
            let range_start = x;
            x += 1; // we already tested the predicate on x at the end of the previous loop
            while x < self.length && pred(self.square(grid, x)) {
                x += 1;
            }
            let range_end = x;
            result.push(range_start..range_end);

            x += 1;
        }
        result
    }

    /// The maximal ranges of contiguous filled-in squares in this line.
    pub fn filled_ranges(&self, grid: &Grid) -> Vec<Range<usize>> {
        self.ranges_of_squares(grid, |sq| sq.get_status() == SquareStatus::FilledIn)
    }

    /// True if this run is the earliest in the line with a placement covering the range.
    pub fn is_exclusive_first(&self, run_index: usize, range: &Range<usize>) -> bool {
        self.runs[run_index].can_contain(range)
            && !self.runs[..run_index].iter().any(|r| r.can_contain(range))
    }
    /// True if this run is the latest in the line with a placement covering the range.
    pub fn is_exclusive_last(&self, run_index: usize, range: &Range<usize>) -> bool {
        self.runs[run_index].can_contain(range)
            && !self.runs[run_index+1..].iter().any(|r| r.can_contain(range))
    }
    /// True if this run is the only one in the line with a placement covering the range.
    pub fn is_exclusive(&self, run_index: usize, range: &Range<usize>) -> bool {
        self.is_exclusive_first(run_index, range) && self.is_exclusive_last(run_index, range)
    }

    /// True if the line's final state decomposes into maximal filled runs whose
    /// lengths match the clue sequence exactly, with nothing left unknown.
    pub fn verify(&self, grid: &Grid) -> bool {
        if (0..self.length).any(|at| self.square(grid, at).get_status() == SquareStatus::Unknown) {
            return false;
        }
        let filled = self.filled_ranges(grid);
        filled.len() == self.runs.len()
            && filled.iter()
                     .zip(self.runs.iter())
                     .all(|(range, run)| range.len() == run.length)
    }
}
impl DirectionalSequence for Line {
    fn get_row_index(&self) -> usize { self.index }
    fn get_direction(&self) -> Direction { self.direction }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::grid::SquareStatus::{FilledIn, CrossedOut};

    fn line(grid: &mut Grid, run_lengths: &[usize]) -> Line {
        Line::new(grid, Horizontal, 0, run_lengths).unwrap()
    }

    #[test]
    fn construction_rejects_overflowing_clues() {
        // 2+1+2 = 5 > 4
        let mut grid = Grid::new(4, 1);
        let result = Line::new(&mut grid, Horizontal, 0, &[2, 2]);
        assert!(matches!(result, Err(Error::Construction(_))));
    }

    #[test]
    fn construction_builds_slack_bounded_candidates() {
        let mut grid = Grid::new(10, 1);
        let l = line(&mut grid, &[3, 4]);
        // slack = 10 - (3+4+1) = 2
        assert_eq!(l.runs[0].starts, vec![0, 1, 2]);
        assert_eq!(l.runs[1].starts, vec![4, 5, 6]);
        assert_eq!(l.runs[0].first_end(), 3);
        assert_eq!(l.runs[1].last_end(), 10);
        assert_eq!(l.candidate_count(), 6);
    }

    #[test]
    fn zero_clues_make_a_trivially_empty_line() {
        let mut grid = Grid::new(5, 1);
        assert!(line(&mut grid, &[]).is_trivially_empty());
        let mut grid = Grid::new(5, 2);
        assert!(line(&mut grid, &[0]).is_trivially_empty());
    }

    #[test]
    fn placements_are_registered_on_covered_squares() {
        let mut grid = Grid::new(5, 1);
        let l = line(&mut grid, &[3]);
        // starts {0,1,2}; square 0 covered only by the placement at 0,
        // square 2 covered by all three
        assert_eq!(grid.get_square(0, 0).placements(Horizontal).len(), 1);
        assert_eq!(grid.get_square(2, 0).placements(Horizontal).len(), 3);
        assert_eq!(grid.get_square(4, 0).placements(Horizontal).len(), 1);
        assert_eq!(l.runs[0].overlap(), Some(2..3));
    }

    #[test]
    fn can_contain_and_must_contain() {
        let mut grid = Grid::new(10, 1);
        let l = line(&mut grid, &[3, 4]);
        let run = &l.runs[0]; // starts {0,1,2}
        assert!(run.can_contain(&(0..3)));
        assert!(run.can_contain(&(2..4)));
        assert!(!run.can_contain(&(0..4)));  // longer than the clue
        assert!(!run.can_contain(&(3..6)));  // no start reaches it
        assert!(run.must_contain(&(2..3)));  // covered from every start
        assert!(!run.must_contain(&(0..1)));
    }

    #[test]
    fn exclusivity_walks_the_whole_chain() {
        let mut grid = Grid::new(10, 1);
        let l = line(&mut grid, &[3, 4]);
        // run 0 covers up to square 4, run 1 covers squares 4..10
        assert!(l.is_exclusive(0, &(0..1)));
        assert!(l.is_exclusive(1, &(6..7)));
        assert!(l.is_exclusive_first(0, &(4..5)));
        assert!(l.is_exclusive_last(1, &(4..5)));
        assert!(!l.is_exclusive(0, &(4..5))); // both runs can own square 4
    }

    #[test]
    fn verify_checks_run_lengths_in_order() {
        let mut grid = Grid::new(5, 1);
        let l = line(&mut grid, &[2, 1]);
        for (x, status) in [FilledIn, FilledIn, CrossedOut, FilledIn, CrossedOut].iter().enumerate() {
            grid.get_square_mut(x, 0).set_status(*status).unwrap();
        }
        assert!(l.verify(&grid));

        // an extra filled square breaks the partition
        let mut grid2 = Grid::new(5, 1);
        let l2 = line(&mut grid2, &[2, 1]);
        for (x, status) in [FilledIn, FilledIn, CrossedOut, FilledIn, FilledIn].iter().enumerate() {
            grid2.get_square_mut(x, 0).set_status(*status).unwrap();
        }
        assert!(!l2.verify(&grid2));
    }

    #[test]
    fn verify_rejects_unknown_squares() {
        let mut grid = Grid::new(5, 1);
        let l = line(&mut grid, &[2, 1]);
        assert!(!l.verify(&grid));
    }
}
