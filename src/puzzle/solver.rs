// vim: set ai et ts=4 sw=4 sts=4:
use std::collections::VecDeque;
use log::{debug, trace};

use super::Puzzle;
use super::super::util::Direction::*;
use super::super::grid::{SquareStatus, SquareStatus::CrossedOut,
                         Changes, Change, StatusChange, Error};

impl Puzzle {
    /// Externally determines one square, then propagates the consequences.
    pub fn set_square(&mut self, x: usize, y: usize, status: SquareStatus)
        -> Result<Changes, Error>
    {
        let mut seed = Changes::new();
        if let Some(change) = self.grid.get_square_mut(x, y).set_status(status)? {
            seed.push(Change::from(change));
        }
        self.propagate(seed)
    }

    /// Feeds newly-determined squares back into the candidate sets of both
    /// axes until no further consequences remain. Every status change in the
    /// seed and every one produced along the way is absorbed exactly once per
    /// axis. Returns the seed plus everything it caused.
    pub fn propagate(&mut self, seed: Changes) -> Result<Changes, Error> {
        let mut queue = seed.iter()
                            .filter_map(|change| match change {
                                Change::Status(sc) => Some(sc.clone()),
                                _ => None,
                            })
                            .collect::<VecDeque<StatusChange>>();
        let mut all = seed;

        let Puzzle { rows, cols, grid } = self;
        while let Some(change) = queue.pop_front() {
            let row_changes = rows[change.row].on_cell_determined(change.col, change.new, grid)?;
            for more in row_changes {
                if let Change::Status(sc) = &more {
                    queue.push_back(sc.clone());
                }
                all.push(more);
            }
            let col_changes = cols[change.col].on_cell_determined(change.row, change.new, grid)?;
            for more in col_changes {
                if let Change::Status(sc) = &more {
                    queue.push_back(sc.clone());
                }
                all.push(more);
            }
        }
        Ok(all)
    }
}

/// Drives a puzzle to a fixed point by repeated line-local passes.
pub struct Solver {
    pub puzzle: Puzzle,
    pub iterations: usize,
}

impl Solver {
    pub fn new(puzzle: Puzzle) -> Self {
        Solver {
            puzzle,
            iterations: 0,
        }
    }

    /// Runs passes until one of them produces no change, then reports whether
    /// the result is a complete, verified solution. Inconsistent clues or
    /// conflicting deductions surface as an error.
    pub fn solve(&mut self) -> Result<bool, Error> {
        // every pass that reports changes eliminated a candidate or determined
        // a square, so a fixed point must arrive within this many passes
        let pass_bound = self.puzzle.total_candidates()
                       + self.puzzle.width() * self.puzzle.height()
                       + 2;
        let mut dirty = self.initial_pass()?;
        debug!("initial pass: {} changes", dirty);
        while dirty > 0 {
            if self.iterations >= pass_bound {
                return Err(Error::Logic(
                    format!("no fixed point after {} passes", self.iterations)));
            }
            dirty = self.solving_pass()?;
            debug!("pass {}: {} changes, {} candidates and {} unknown squares left",
                   self.iterations, dirty,
                   self.puzzle.total_candidates(), self.puzzle.count_unknown());
        }
        Ok(self.puzzle.is_solved())
    }

    /// Startup deductions that need no prior knowledge: squares no candidate
    /// placement covers are crossed out, and every run commits the overlap
    /// among its initial placements.
    pub fn initial_pass(&mut self) -> Result<usize, Error> {
        let mut changes = Changes::new();
        {
            let Puzzle { rows, cols, grid } = &mut self.puzzle;
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    let uncoverable = {
                        let square = grid.get_square(x, y);
                        square.placements(Horizontal).is_empty()
                            || square.placements(Vertical).is_empty()
                    };
                    if uncoverable {
                        if let Some(change) = grid.get_square_mut(x, y).set_status(CrossedOut)? {
                            changes.push(Change::from(change));
                        }
                    }
                }
            }
            for line in rows.iter_mut().chain(cols.iter_mut()) {
                for run_index in 0..line.runs.len() {
                    changes.extend(line.commit(run_index, grid)?);
                }
            }
        }
        let all = self.puzzle.propagate(changes)?;
        for change in &all {
            trace!("{}", change);
        }
        Ok(all.len())
    }

    /// One full sweep: clue-local deduction and cross-clue reconciliation on
    /// every line of both axes, propagating after each line. Returns the
    /// number of changes the sweep produced.
    pub fn solving_pass(&mut self) -> Result<usize, Error> {
        let mut total = 0usize;
        for &direction in &[Horizontal, Vertical] {
            let line_count = match direction {
                Horizontal => self.puzzle.rows.len(),
                Vertical   => self.puzzle.cols.len(),
            };
            for index in 0..line_count {
                let changes = {
                    let Puzzle { rows, cols, grid } = &mut self.puzzle;
                    let line = match direction {
                        Horizontal => &mut rows[index],
                        Vertical   => &mut cols[index],
                    };
                    if line.is_trivially_empty() || line.is_completed() {
                        continue;
                    }
                    let mut changes = Changes::new();
                    for run_index in 0..line.runs.len() {
                        changes.extend(line.solve_self(run_index, grid)?);
                    }
                    changes.extend(line.solve_line(grid)?);
                    changes
                };
                let all = self.puzzle.propagate(changes)?;
                for change in &all {
                    trace!("{}", change);
                }
                total += all.len();
            }
        }
        self.iterations += 1;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::super::grid::SquareStatus::FilledIn;

    fn solved_statuses(puzzle: &Puzzle) -> Vec<Vec<SquareStatus>> {
        (0..puzzle.height()).map(|y| (0..puzzle.width())
                                         .map(|x| puzzle.get_square(x, y).get_status())
                                         .collect())
                            .collect()
    }

    #[test]
    fn a_full_line_is_solved_on_the_initial_pass() {
        let puzzle = Puzzle::new(&[vec![5]],
                                 &[vec![1], vec![1], vec![1], vec![1], vec![1]]).unwrap();
        let mut solver = Solver::new(puzzle);
        solver.initial_pass().unwrap();
        assert_eq!(solved_statuses(&solver.puzzle), vec![vec![FilledIn; 5]]);
        assert!(solver.puzzle.is_solved());
    }

    #[test]
    fn zero_slack_clues_are_fully_determined_up_front() {
        // 3+1+1 fills a width-5 row exactly, gap included
        let puzzle = Puzzle::new(&[vec![3, 1]],
                                 &[vec![1], vec![1], vec![1], vec![], vec![1]]).unwrap();
        let mut solver = Solver::new(puzzle);
        assert!(solver.solve().unwrap());
        assert_eq!(solved_statuses(&solver.puzzle),
                   vec![vec![FilledIn, FilledIn, FilledIn, CrossedOut, FilledIn]]);
    }

    #[test]
    fn empty_clue_lines_are_crossed_out_up_front() {
        let puzzle = Puzzle::new(&[vec![1], vec![]],
                                 &[vec![1], vec![]]).unwrap();
        let mut solver = Solver::new(puzzle);
        assert!(solver.solve().unwrap());
        assert_eq!(solved_statuses(&solver.puzzle),
                   vec![vec![FilledIn, CrossedOut],
                        vec![CrossedOut, CrossedOut]]);
    }

    #[test]
    fn solves_a_cross_by_propagation_alone() {
        let clues = [vec![1], vec![3], vec![1]];
        let puzzle = Puzzle::new(&clues, &clues).unwrap();
        let mut solver = Solver::new(puzzle);
        assert!(solver.solve().unwrap());
        assert_eq!(solved_statuses(&solver.puzzle),
                   vec![vec![CrossedOut, FilledIn, CrossedOut],
                        vec![FilledIn,   FilledIn, FilledIn],
                        vec![CrossedOut, FilledIn, CrossedOut]]);
    }

    #[test]
    fn an_ambiguous_puzzle_reaches_a_clean_fixed_point() {
        // two mirrored solutions exist; no square is ever determined
        let clues = [vec![1], vec![1]];
        let puzzle = Puzzle::new(&clues, &clues).unwrap();
        let mut solver = Solver::new(puzzle);
        assert_eq!(solver.solve().unwrap(), false);
        assert_eq!(solver.puzzle.count_unknown(), 4);
    }

    #[test]
    fn inconsistent_clues_surface_as_an_error() {
        // the row wants both squares filled, but column 1 must stay empty
        let puzzle = Puzzle::new(&[vec![2]],
                                 &[vec![1], vec![]]).unwrap();
        let mut solver = Solver::new(puzzle);
        assert!(solver.solve().is_err());
    }

    #[test]
    fn an_external_cross_eliminates_covering_placements_on_both_axes() {
        let clues = [vec![1], vec![1], vec![1]];
        let mut puzzle = Puzzle::new(&clues, &clues).unwrap();
        puzzle.set_square(1, 1, CrossedOut).unwrap();
        assert_eq!(puzzle.rows[1].runs[0].starts, vec![0, 2]);
        assert_eq!(puzzle.cols[1].runs[0].starts, vec![0, 2]);
        assert!(puzzle.get_square(1, 1).placements(Horizontal).is_empty());
        assert!(puzzle.get_square(1, 1).placements(Vertical).is_empty());

        // further passes refine but never resurrect the eliminated candidates
        let mut solver = Solver::new(puzzle);
        solver.solve().unwrap();
        for &start in &solver.puzzle.rows[1].runs[0].starts {
            assert!(start == 0 || start == 2);
        }
    }

    #[test]
    fn passes_are_monotonic_and_idempotent_at_the_fixed_point() {
        let clues = [vec![1], vec![3], vec![1]];
        let puzzle = Puzzle::new(&clues, &clues).unwrap();
        let mut solver = Solver::new(puzzle);

        let mut candidates = solver.puzzle.total_candidates();
        let mut unknown = solver.puzzle.count_unknown();
        solver.initial_pass().unwrap();
        loop {
            let dirty = solver.solving_pass().unwrap();
            assert!(solver.puzzle.total_candidates() <= candidates);
            assert!(solver.puzzle.count_unknown() <= unknown);
            candidates = solver.puzzle.total_candidates();
            unknown = solver.puzzle.count_unknown();
            if dirty == 0 {
                break;
            }
        }
        // one more sweep after quiescence changes nothing
        assert_eq!(solver.solving_pass().unwrap(), 0);
        assert!(solver.puzzle.is_solved());
    }

    #[test]
    fn a_larger_puzzle_solves_without_contradictions() {
        let rows = [vec![5], vec![1, 4], vec![1, 1, 1], vec![1, 1, 1, 1],
                    vec![1, 1, 1, 1], vec![1, 1, 3, 1], vec![1, 1, 1],
                    vec![1, 1, 1], vec![3, 4, 1], vec![3, 3]];
        let cols = [vec![8], vec![1, 1], vec![1, 1, 5], vec![1, 1],
                    vec![1, 2, 2], vec![2, 1, 1], vec![5, 1], vec![1, 2],
                    vec![1, 1], vec![8]];
        let puzzle = Puzzle::new(&rows, &cols).unwrap();
        let mut solver = Solver::new(puzzle);
        assert!(solver.solve().is_ok());
    }

    #[test]
    fn solving_leaves_squares_consistent_with_every_clue() {
        let clues = [vec![1], vec![3], vec![1]];
        let puzzle = Puzzle::new(&clues, &clues).unwrap();
        let mut solver = Solver::new(puzzle);
        solver.solve().unwrap();
        for line in solver.puzzle.rows.iter().chain(solver.puzzle.cols.iter()) {
            assert!(line.verify(&solver.puzzle.grid));
            for run in &line.runs {
                assert!(run.is_completed());
            }
        }
        assert_eq!(solver.puzzle.count_unknown(), 0);
    }
}
