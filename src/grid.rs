// vim: set ai et ts=4 sts=4:
use std::fmt;
use super::util::Direction;
use super::line::PlacementId;

pub trait HasGridLocation {
    fn get_row(&self) -> usize;
    fn get_col(&self) -> usize;
    fn fmt_location(&self) -> String {
        format!("(col={:-2}, row={:-2})", self.get_col(), self.get_row())
    }
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum SquareStatus {
    FilledIn,
    CrossedOut,
    Unknown,
}
impl fmt::Display for SquareStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match *self {
            SquareStatus::FilledIn   => "FilledIn",
            SquareStatus::CrossedOut => "CrossedOut",
            SquareStatus::Unknown    => "Unknown",
        })
    }
}
// ------------------------------------------------

#[derive(PartialEq, Debug, Clone)]
pub struct StatusChange {
    pub row: usize,
    pub col: usize,
    pub old: SquareStatus,
    pub new: SquareStatus,
}
impl StatusChange {
    pub fn new(row: usize, col: usize, old: SquareStatus, new: SquareStatus) -> Self {
        Self { row, col, old, new }
    }
}
impl HasGridLocation for StatusChange {
    fn get_row(&self) -> usize { self.row }
    fn get_col(&self) -> usize { self.col }
}
impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Change: in square {}, status was changed from {} to {}",
            self.fmt_location(),
            self.old,
            self.new)
    }
}

// ------------------------------------------------

#[derive(PartialEq, Debug, Clone)]
pub struct PlacementChange {
    pub id: PlacementId,
}
impl PlacementChange {
    pub fn new(id: PlacementId) -> Self {
        Self { id }
    }
}
impl fmt::Display for PlacementChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Change: candidate placement at {} was eliminated for run #{} in {} line {}",
            self.id.start,
            self.id.run_index,
            self.id.direction,
            self.id.line_index)
    }
}

// ------------------------------------------------

#[derive(Debug, Clone)]
pub enum Change {
    Status(StatusChange),
    Placement(PlacementChange),
}
impl From<StatusChange> for Change {
    fn from(other: StatusChange) -> Self {
        Change::Status(other)
    }
}
impl From<PlacementChange> for Change {
    fn from(other: PlacementChange) -> Self {
        Change::Placement(other)
    }
}
impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Change::Status(x)    => x.to_string(),
            Change::Placement(x) => x.to_string(),
        })
    }
}
pub type Changes = Vec<Change>;

// ------------------------------------------------

#[derive(PartialEq, Debug)]
pub enum StatusError {
    ChangeRejected(StatusChange, String),  // new status conflicts with existing (non-unknown) status
}
impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StatusError: {}", match self {
            StatusError::ChangeRejected(change, msg) =>
                format!("In {}, attempt to change status from {} to {} was rejected: {}",
                    change.fmt_location(), change.old, change.new, msg),
        })
    }
}

#[derive(PartialEq, Debug)]
pub enum PlacementError {
    Exhausted { // no candidate placement left for a run; the clues are inconsistent
        direction:  Direction,
        line_index: usize,
        run_index:  usize,
        length:     usize,
    },
}
impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PlacementError: {}", match self {
            PlacementError::Exhausted { direction, line_index, run_index, length } =>
                format!("no candidate placement left for run #{} of length {} in {} line {}",
                    run_index, length, direction, line_index),
        })
    }
}

pub type StatusResult = Result<Option<StatusChange>, StatusError>; // if it worked: the change, if any; if it didn't, the change that was rejected

#[derive(Debug)]
pub enum Error {
    Status(StatusError),
    Placement(PlacementError),
    Construction(String),
    Import(String),
    Logic(String),
}
impl From<StatusError> for Error {
    fn from(other: StatusError) -> Self {
        Error::Status(other)
    }
}
impl From<PlacementError> for Error {
    fn from(other: PlacementError) -> Self {
        Error::Placement(other)
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Error::Status(x)      => x.to_string(),
            Error::Placement(x)   => x.to_string(),
            Error::Construction(s) => format!("ConstructionError: {}", s),
            Error::Import(s)       => format!("ImportError: {}", s),
            Error::Logic(s)        => s.to_string(),
        })
    }
}

// ------------------------------------------------

#[derive(Debug, Clone)]
pub struct Square {
    row: usize,
    col: usize,
    status: SquareStatus,
    // candidate placements currently covering this square, one set per axis
    placements: [Vec<PlacementId>; 2],
}
impl Square {
    pub fn new(x: usize, y: usize) -> Square {
        Square {
            row: y,
            col: x,
            status: SquareStatus::Unknown,
            placements: [Vec::new(), Vec::new()],
        }
    }

    pub fn get_row(&self) -> usize { self.row }
    pub fn get_col(&self) -> usize { self.col }
    pub fn get_status(&self) -> SquareStatus { self.status }

    pub fn set_status(&mut self, new_status: SquareStatus) -> StatusResult {
        let cand_change = StatusChange::new(self.row, self.col, self.status, new_status);
        self.apply_status_change(cand_change)
    }

    pub fn apply_status_change(&mut self, cand_change: StatusChange)
        -> StatusResult
    {
        assert!(cand_change.row == self.row);
        assert!(cand_change.col == self.col);

        // if this square's status is already known, it can't be changed anymore,
        // that would be a conflict
        if self.status != SquareStatus::Unknown {
            if self.status != cand_change.new {
                return Err(StatusError::ChangeRejected(cand_change, "conflicting information".to_string()));
            }
        }
        if self.status != cand_change.new {
            self.status = cand_change.new;
            return Ok(Some(cand_change));
        }
        return Ok(None);
    }

    pub fn placements(&self, direction: Direction) -> &[PlacementId] {
        &self.placements[direction.axis()]
    }
    pub fn register_placement(&mut self, id: PlacementId) {
        self.placements[id.direction.axis()].push(id);
    }
    pub fn unregister_placement(&mut self, id: &PlacementId) -> bool {
        super::util::vec_remove_item(&mut self.placements[id.direction.axis()], id).is_some()
    }

    pub fn fmt_visual(&self) -> &str {
        match self.status {
            SquareStatus::CrossedOut => " ",
            SquareStatus::FilledIn   => "\u{25A0}",
            SquareStatus::Unknown    => ".",
        }
    }
}
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fmt_visual())
    }
}
impl HasGridLocation for Square {
    fn get_row(&self) -> usize { self.row }
    fn get_col(&self) -> usize { self.col }
}

// ------------------------------------------------

#[derive(Clone)]
pub struct Grid {
    pub squares: Vec<Vec<Square>>,
}
impl Grid {
    pub fn new(width: usize, height: usize)
        -> Self
    {
        Grid {
            squares: (0..height).map(|y| (0..width).map(|x| Square::new(x, y))
                                                   .collect::<Vec<_>>())
                                .collect(),
        }
    }

    pub fn width(&self) -> usize { self.squares[0].len() }
    pub fn height(&self) -> usize { self.squares.len() }
    pub fn get_square(&self, x: usize, y: usize) -> &Square {
        &self.squares[y][x]
    }
    pub fn get_square_mut(&mut self, x: usize, y: usize) -> &mut Square {
        &mut self.squares[y][x]
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid(w={}, h={})", self.width(), self.height())
    }
}
