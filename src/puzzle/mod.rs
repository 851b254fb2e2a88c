// vim: set ai et ts=4 sw=4 sts=4:
mod solver;
pub use self::solver::Solver;

use std::fmt;
use std::convert::TryFrom;
use yaml_rust::Yaml;

use super::grid::{Grid, Square, Error};
use super::util::{ralign, ralign_joined_coloreds, Direction::*};
use super::line::Line;

#[derive(Debug)]
pub struct Puzzle {
    pub rows: Vec<Line>,
    pub cols: Vec<Line>,
    pub grid: Grid,
}

impl Puzzle {
    pub fn new(row_run_lengths: &[Vec<usize>],
               col_run_lengths: &[Vec<usize>]) -> Result<Self, Error>
    {
        if row_run_lengths.is_empty() || col_run_lengths.is_empty() {
            return Err(Error::Import(String::from("a puzzle needs at least one row and one column")));
        }
        let mut grid = Grid::new(col_run_lengths.len(), row_run_lengths.len());
        let rows = row_run_lengths.iter().enumerate()
                                  .map(|(y, lengths)| Line::new(&mut grid, Horizontal, y, lengths))
                                  .collect::<Result<Vec<_>, _>>()?;
        let cols = col_run_lengths.iter().enumerate()
                                  .map(|(x, lengths)| Line::new(&mut grid, Vertical, x, lengths))
                                  .collect::<Result<Vec<_>, _>>()?;
        Ok(Puzzle {
            rows,
            cols,
            grid,
        })
    }
    pub fn width(&self) -> usize { self.grid.width() }
    pub fn height(&self) -> usize { self.grid.height() }

    pub fn get_square(&self, x: usize, y: usize) -> &Square {
        self.grid.get_square(x, y)
    }

    pub fn from_yaml(doc: &Yaml) -> Result<Puzzle, Error>
    {
        let row_run_lengths = Self::_parse_clue_list(&doc["rows"], "rows")?;
        let col_run_lengths = Self::_parse_clue_list(&doc["cols"], "cols")?;
        Puzzle::new(&row_run_lengths, &col_run_lengths)
    }

    fn _parse_clue_list(input: &Yaml, what: &str) -> Result<Vec<Vec<usize>>, Error> {
        let list = input.as_vec().ok_or_else(
            || Error::Import(format!("expected a '{}' list", what)))?;
        list.iter()
            .map(|yaml_val| Self::_parse_line_clues(yaml_val, what))
            .collect()
    }

    fn _parse_line_clues(input: &Yaml, what: &str) -> Result<Vec<usize>, Error> {
        match input {
            Yaml::String(s)  => { s.split_whitespace()
                                   .map(|int| int.trim().parse::<usize>().map_err(
                                        |_| Error::Import(format!("invalid clue '{}' in {}", int, what))))
                                   .collect()
                                },
            Yaml::Integer(i) => { usize::try_from(*i)
                                      .map(|v| vec![v])
                                      .map_err(|_| Error::Import(format!("negative clue {} in {}", i, what)))
                                }
            Yaml::Null       => Ok(vec![]),
            _ => Err(Error::Import(format!("unexpected clue data type {:?} in {}", input, what))),
        }
    }

    /// The number of surviving candidate placements across both axes.
    pub fn total_candidates(&self) -> usize {
        self.rows.iter().chain(self.cols.iter())
                 .map(|line| line.candidate_count())
                 .sum()
    }

    pub fn count_unknown(&self) -> usize {
        (0..self.height()).map(|y| (0..self.width())
                                       .filter(|&x| self.grid.get_square(x, y).get_status()
                                                        == super::grid::SquareStatus::Unknown)
                                       .count())
                          .sum()
    }

    /// True if every row and column decomposes into exactly its clue sequence.
    pub fn is_solved(&self) -> bool {
        self.rows.iter().all(|row| row.verify(&self.grid))
            && self.cols.iter().all(|col| col.verify(&self.grid))
    }
}

impl Puzzle {
    // helper functions for Puzzle::render
    fn _fmt_line(out: &mut String,
                 prefix: &str,
                 left_delim: &str,
                 right_delim: &str,
                 columnwise_separator: &str,
                 content_parts: &[String])
    {
        out.push_str(prefix);
        out.push(' ');
        out.push_str(left_delim);
        for (idx, s) in content_parts.iter().enumerate() {
            out.push_str(s);
            if ((idx+1) % 5 == 0) && (idx < content_parts.len()-1) {
                out.push_str(columnwise_separator);
            }
        }
        out.push_str(right_delim);
        out.push('\n');
    }

    fn _fmt_header(&self,
                   out: &mut String,
                   line_idx: usize,
                   prefix_len: usize)
    {
        let mut content_parts = Vec::<String>::new();
        for col in &self.cols {
            let part: String;

            if line_idx < col.runs.len() {
                part = col.runs[col.runs.len()-1-line_idx].length.to_string();
            } else {
                part = String::from("");
            }

            content_parts.push(format!(" {:-2}", part));
        }

        Self::_fmt_line(out,
                        &ralign("", prefix_len),
                        " ",
                        " ",
                        " ",
                        &content_parts)
    }

    /// Renders the board with row and column clues; completed row clues are
    /// dimmed when color output is requested.
    pub fn render(&self, emit_color: bool) -> String {
        let mut out = String::new();
        let row_prefixes = self.rows.iter()
                                    .map(|row| row.runs.iter()
                                                       .map(|run| run.to_colored_string())
                                                       .collect::<Vec<_>>())
                                    .collect::<Vec<_>>();

        // visual width of a prefix: the clue numbers plus a space between each pair
        let prefix_len = self.rows.iter()
                                  .map(|row| match row.runs.len() {
                                      0 => 0,
                                      n => row.runs.iter().map(|run| run.to_string().len()).sum::<usize>() + n - 1,
                                  })
                                  .max()
                                  .unwrap_or(0);
        let max_col_runs = self.cols.iter()
                                    .map(|col| col.runs.len())
                                    .max()
                                    .unwrap_or(0);

        for i in (0..max_col_runs).rev() {
            self._fmt_header(&mut out, i, prefix_len);
        }

        // top board line
        Self::_fmt_line(&mut out,
                        &ralign("", prefix_len),
                        "\u{2554}",
                        "\u{2557}",
                        "\u{2564}",
                        &(0..self.width()).map(|_| String::from("\u{2550}\u{2550}\u{2550}"))
                                          .collect::<Vec<_>>());

        for y in 0..self.height() {
            // board content line
            Self::_fmt_line(&mut out,
                            &ralign_joined_coloreds(&row_prefixes[y], prefix_len, emit_color),
                            "\u{2551}",
                            "\u{2551}",
                            "\u{2502}",
                            &self.grid.squares[y].iter()
                                                 .map(|s| format!(" {:1} ", s))
                                                 .collect::<Vec<_>>());

            // horizontal board separator line
            if ((y+1) % 5 == 0) && (y != self.height()-1) {
                Self::_fmt_line(&mut out,
                                &ralign("", prefix_len),
                                "\u{255F}",
                                "\u{2562}",
                                "\u{253C}",
                                &(0..self.width()).map(|_| String::from("\u{2500}\u{2500}\u{2500}"))
                                                  .collect::<Vec<_>>());
            }
        }
        // bottom board line
        Self::_fmt_line(&mut out,
                        &ralign("", prefix_len),
                        "\u{255A}",
                        "\u{255D}",
                        "\u{2567}",
                        &(0..self.width()).map(|_| String::from("\u{2550}\u{2550}\u{2550}"))
                                          .collect::<Vec<_>>());
        out
    }
}
impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust::YamlLoader;

    #[test]
    fn from_yaml_accepts_every_clue_notation() {
        let docs = YamlLoader::load_from_str("
            rows:
                - 1 1
                - 3
                - ~
            cols:
                - 2
                - 1
                - 2
        ").unwrap();
        let puzzle = Puzzle::from_yaml(&docs[0]).unwrap();
        assert_eq!(puzzle.width(), 3);
        assert_eq!(puzzle.height(), 3);
        assert_eq!(puzzle.rows[0].runs.iter().map(|r| r.length).collect::<Vec<_>>(), vec![1, 1]);
        assert_eq!(puzzle.rows[1].runs[0].length, 3);
        assert!(puzzle.rows[2].is_trivially_empty());
    }

    #[test]
    fn from_yaml_rejects_malformed_documents() {
        let docs = YamlLoader::load_from_str("
            rows:
                - banana
            cols:
                - 1
        ").unwrap();
        assert!(matches!(Puzzle::from_yaml(&docs[0]), Err(Error::Import(_))));

        let docs = YamlLoader::load_from_str("cols: [1]").unwrap();
        assert!(matches!(Puzzle::from_yaml(&docs[0]), Err(Error::Import(_))));
    }

    #[test]
    fn new_propagates_construction_errors() {
        // 2+1+2 = 5 > 4
        let result = Puzzle::new(&[vec![2, 2]],
                                 &[vec![1], vec![1], vec![1], vec![1]]);
        assert!(matches!(result, Err(Error::Construction(_))));
    }

    #[test]
    fn render_includes_clues_and_board_borders() {
        let puzzle = Puzzle::new(&[vec![1], vec![1]],
                                 &[vec![1], vec![1]]).unwrap();
        let plain = puzzle.render(false);
        assert!(plain.contains('\u{2554}'));
        assert!(plain.contains('\u{255D}'));
        assert!(plain.contains('1'));
        // non-colored output carries no escape sequences
        assert!(!plain.contains('\u{1b}'));
    }
}
