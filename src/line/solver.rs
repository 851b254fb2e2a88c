// vim: set ai et ts=4 sts=4 sw=4:
use std::cmp::{min, max};
use super::{Line, PlacementId, DirectionalSequence};
use super::super::util::vec_remove_item;
use super::super::grid::{Grid, SquareStatus, SquareStatus::{CrossedOut, FilledIn},
                         Changes, Change, PlacementChange, PlacementError, Error};

impl Line {
    /// Eliminates one candidate placement: deletes it from the run's live set,
    /// unregisters it from every covered square, crosses out squares left with
    /// no candidate on this axis, and re-commits the run. Eliminating a start
    /// that is already gone is a no-op; eliminating the final one is a
    /// contradiction.
    pub fn remove_placement(&mut self, run_index: usize, start: usize, grid: &mut Grid)
        -> Result<Changes, Error>
    {
        let mut changes = Changes::new();
        let (id, covered) = {
            let run = &self.runs[run_index];
            if !run.starts.contains(&start) {
                return Ok(changes);
            }
            if run.is_fixed() {
                return Err(Error::from(PlacementError::Exhausted {
                    direction:  run.direction,
                    line_index: run.line_index,
                    run_index:  run.index,
                    length:     run.length,
                }));
            }
            (run.id_at(start), run.placement_at(start).range())
        };
        vec_remove_item(&mut self.runs[run_index].starts, &start);
        changes.push(Change::from(PlacementChange::new(id)));

        for at in covered {
            let square = self.square_mut(grid, at);
            square.unregister_placement(&id);
            if square.placements(id.direction).is_empty() {
                // nothing can cover this square anymore; a filled square
                // without a possible owner is rejected here
                if let Some(change) = square.set_status(CrossedOut)? {
                    changes.push(Change::from(change));
                }
            }
        }

        changes.extend(self.commit(run_index, grid)?);
        Ok(changes)
    }

    /// Fills the squares covered under every surviving placement of the run.
    /// Once only a single placement survives, the squares just outside it are
    /// crossed out and the run is marked completed.
    pub fn commit(&mut self, run_index: usize, grid: &mut Grid) -> Result<Changes, Error> {
        let mut changes = Changes::new();
        if let Some(overlap) = self.runs[run_index].overlap() {
            for at in overlap {
                if let Some(change) = self.square_mut(grid, at).set_status(FilledIn)? {
                    changes.push(Change::from(change));
                }
            }
        }
        let newly_fixed = {
            let run = &self.runs[run_index];
            run.is_fixed() && !run.is_completed()
        };
        if newly_fixed {
            let (start, end) = {
                let run = &self.runs[run_index];
                (run.first_start(), run.last_end())
            };
            self.runs[run_index].completed = true;
            if start > 0 {
                if let Some(change) = self.square_mut(grid, start-1).set_status(CrossedOut)? {
                    changes.push(Change::from(change));
                }
            }
            if end < self.length {
                if let Some(change) = self.square_mut(grid, end).set_status(CrossedOut)? {
                    changes.push(Change::from(change));
                }
            }
        }
        Ok(changes)
    }

    /// Drops every candidate start within the first n squares of the run's live
    /// range, advancing first_start by at least n. A no-op for n == 0.
    pub fn shrink_start(&mut self, run_index: usize, n: usize, grid: &mut Grid)
        -> Result<Changes, Error>
    {
        let mut changes = Changes::new();
        if n == 0 {
            return Ok(changes);
        }
        let cutoff = self.runs[run_index].first_start() + n;
        while self.runs[run_index].first_start() < cutoff {
            let doomed = self.runs[run_index].first_start();
            changes.extend(self.remove_placement(run_index, doomed, grid)?);
        }
        Ok(changes)
    }

    /// Drops every candidate whose end falls within the last n squares of the
    /// run's live range, pulling last_end back by at least n.
    pub fn shrink_end(&mut self, run_index: usize, n: usize, grid: &mut Grid)
        -> Result<Changes, Error>
    {
        let mut changes = Changes::new();
        if n == 0 {
            return Ok(changes);
        }
        let cutoff = self.runs[run_index].last_end().checked_sub(n);
        loop {
            match cutoff {
                Some(c) if self.runs[run_index].last_end() <= c => break,
                _ => {} // unreachable bound; keep removing until the contradiction surfaces
            }
            let doomed = self.runs[run_index].last_start();
            changes.extend(self.remove_placement(run_index, doomed, grid)?);
        }
        Ok(changes)
    }

    /// Drops every candidate starting past the given position.
    pub fn remove_starts_after(&mut self, run_index: usize, pos: usize, grid: &mut Grid)
        -> Result<Changes, Error>
    {
        let mut changes = Changes::new();
        while self.runs[run_index].last_start() > pos {
            let doomed = self.runs[run_index].last_start();
            changes.extend(self.remove_placement(run_index, doomed, grid)?);
        }
        Ok(changes)
    }

    /// Drops every candidate ending before the given position.
    pub fn remove_ends_before(&mut self, run_index: usize, pos: usize, grid: &mut Grid)
        -> Result<Changes, Error>
    {
        let mut changes = Changes::new();
        while self.runs[run_index].first_end() < pos {
            let doomed = self.runs[run_index].first_start();
            changes.extend(self.remove_placement(run_index, doomed, grid)?);
        }
        Ok(changes)
    }

    /// Clue-local deduction: everything a run can conclude from its own
    /// candidates, its neighbors' bounds and the already-known squares,
    /// iterated to a fixed point within the call.
    pub fn solve_self(&mut self, run_index: usize, grid: &mut Grid) -> Result<Changes, Error> {
        let mut changes = Changes::new();
        if self.runs[run_index].is_completed() {
            return Ok(changes);
        }

        // candidates conflicting with a neighbor's committed bound, sitting
        // next to a filled square outside their own range, or covering a
        // crossed-out square
        loop {
            let doomed = {
                let run = &self.runs[run_index];
                let prev_first_end = match run_index {
                    0 => None,
                    i => Some(self.runs[i-1].first_end()),
                };
                let next_last_start = match run_index + 1 < self.runs.len() {
                    true  => Some(self.runs[run_index+1].last_start()),
                    false => None,
                };
                run.starts.iter().copied().filter(|&start| {
                    let placement = run.placement_at(start);
                    if let Some(bound) = prev_first_end {
                        if start <= bound { return true; }
                    }
                    if let Some(bound) = next_last_start {
                        if placement.end() >= bound { return true; }
                    }
                    if start > 0 && self.square(grid, start-1).get_status() == FilledIn {
                        return true;
                    }
                    if placement.end() < self.length
                       && self.square(grid, placement.end()).get_status() == FilledIn {
                        return true;
                    }
                    placement.range().any(|at| self.square(grid, at).get_status() == CrossedOut)
                }).collect::<Vec<_>>()
            };
            if doomed.is_empty() {
                break;
            }
            for start in doomed {
                changes.extend(self.remove_placement(run_index, start, grid)?);
            }
        }

        // filled segments only this run can own must all be covered by a
        // single placement; everything between the first and the last of them
        // is therefore filled as well
        let exclusive = self.filled_ranges(grid)
                            .into_iter()
                            .filter(|segment| self.is_exclusive(run_index, segment))
                            .collect::<Vec<_>>();
        if let (Some(first), Some(last)) = (exclusive.first(), exclusive.last()) {
            let span = first.start..last.end;
            let doomed = self.runs[run_index].starts.iter().copied()
                             .filter(|&start| !self.runs[run_index].placement_at(start).contains(&span))
                             .collect::<Vec<_>>();
            for start in doomed {
                changes.extend(self.remove_placement(run_index, start, grid)?);
            }
            for at in span {
                if let Some(change) = self.square_mut(grid, at).set_status(FilledIn)? {
                    changes.push(Change::from(change));
                }
            }
        }

        // squares provably owned by this run push every other run in the line
        // out of reach, with the mandatory gap, transitively in both directions
        let (first_start, last_end) = {
            let run = &self.runs[run_index];
            (run.first_start(), run.last_end())
        };
        for i in first_start..last_end {
            let cell = i..i+1;
            let owned = self.runs[run_index].must_contain(&cell)
                || (self.is_exclusive(run_index, &cell)
                    && self.square(grid, i).get_status() == FilledIn);
            if !owned {
                continue;
            }
            for j in (0..run_index).rev() {
                let bound = self.runs[j].last_end();
                if bound + 1 > i {
                    changes.extend(self.shrink_end(j, bound + 1 - i, grid)?);
                }
            }
            for j in run_index+1..self.runs.len() {
                let bound = self.runs[j].first_start();
                if i + 2 > bound {
                    changes.extend(self.shrink_start(j, i + 2 - bound, grid)?);
                }
            }
        }

        changes.extend(self.commit(run_index, grid)?);
        Ok(changes)
    }

    /// Cross-clue reconciliation: compares every maximal filled segment in the
    /// line against the set of placements, from all runs, that could own it.
    pub fn solve_line(&mut self, grid: &mut Grid) -> Result<Changes, Error> {
        let mut changes = Changes::new();
        if self.is_trivially_empty() {
            return Ok(changes);
        }
        let mut trimmed_start = vec![false; self.runs.len()];
        let mut ends_to_trim: Vec<Option<usize>> = vec![None; self.runs.len()];

        for segment in self.filled_ranges(grid) {
            let mut first_covering: Option<usize> = None;
            let mut last_covering: Option<usize> = None;
            let mut first_start: usize = self.length;
            let mut last_start: usize = 0;
            let mut first_end: usize = self.length;
            let mut last_end: usize = 0;

            for (j, run) in self.runs.iter().enumerate() {
                let mut any = false;
                for placement in run.placements().filter(|p| p.contains(&segment)) {
                    any = true;
                    first_start = min(first_start, placement.start);
                    last_start  = max(last_start, placement.start);
                    first_end   = min(first_end, placement.end());
                    last_end    = max(last_end, placement.end());
                }
                if any {
                    first_covering.get_or_insert(j);
                    last_covering = Some(j);
                }
            }
            let (first_j, last_j) = match (first_covering, last_covering) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(Error::Logic(
                        format!("no clue can own the filled squares {}..{} in {} line {}",
                                segment.start, segment.end, self.direction, self.index))),
            };

            // squares covered under every placement that could own this
            // segment are guaranteed filled; when all owners also agree on a
            // boundary, the square just outside it is crossed out
            if last_start < segment.start {
                for at in last_start..segment.start {
                    if let Some(change) = self.square_mut(grid, at).set_status(FilledIn)? {
                        changes.push(Change::from(change));
                    }
                }
                if last_start == first_start && first_start > 0 {
                    if let Some(change) = self.square_mut(grid, first_start-1).set_status(CrossedOut)? {
                        changes.push(Change::from(change));
                    }
                }
            }
            if first_end > segment.end {
                for at in segment.end..first_end {
                    if let Some(change) = self.square_mut(grid, at).set_status(FilledIn)? {
                        changes.push(Change::from(change));
                    }
                }
                if first_end == last_end && last_end < self.length {
                    if let Some(change) = self.square_mut(grid, last_end).set_status(CrossedOut)? {
                        changes.push(Change::from(change));
                    }
                }
            }

            // the earliest run that can own the segment must not start past
            // it; applied at most once per run per pass
            if !trimmed_start[first_j] {
                changes.extend(self.remove_starts_after(first_j, segment.start, grid)?);
                trimmed_start[first_j] = true;
            }
            // the latest run that can own the segment must not end before it;
            // deferred so each run is trimmed once, to its last such segment
            ends_to_trim[last_j] = Some(segment.end);
        }

        for j in 0..self.runs.len() {
            if let Some(end) = ends_to_trim[j] {
                changes.extend(self.remove_ends_before(j, end, grid)?);
            }
        }
        Ok(changes)
    }

    /// Absorbs a newly-determined square into this line's candidate sets:
    /// crossing a square eliminates every placement covering it, filling one
    /// eliminates every placement that would extend the segment past its
    /// run's length.
    pub fn on_cell_determined(&mut self, at: usize, status: SquareStatus, grid: &mut Grid)
        -> Result<Changes, Error>
    {
        let mut changes = Changes::new();
        match status {
            SquareStatus::CrossedOut => {
                let doomed = self.square(grid, at).placements(self.direction).to_vec();
                for id in doomed {
                    changes.extend(self.remove_placement(id.run_index, id.start, grid)?);
                }
            }
            SquareStatus::FilledIn => {
                let mut doomed = Vec::<PlacementId>::new();
                if at > 0 {
                    doomed.extend(self.square(grid, at-1).placements(self.direction).iter().copied()
                                      .filter(|id| id.start + self.runs[id.run_index].length == at));
                }
                if at + 1 < self.length {
                    doomed.extend(self.square(grid, at+1).placements(self.direction).iter().copied()
                                      .filter(|id| id.start == at + 1));
                }
                for id in doomed {
                    changes.extend(self.remove_placement(id.run_index, id.start, grid)?);
                }
            }
            SquareStatus::Unknown => {}
        }
        Ok(changes)
    }
}
