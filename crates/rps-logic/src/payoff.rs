//! Moves and payoff matrices

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{check_action, Result, RpsError};

/// A move in Rock-Paper-Scissors. Agents work on plain indices; this is
/// the named view of indices 0..3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn index(self) -> usize {
        match self {
            Move::Rock => 0,
            Move::Paper => 1,
            Move::Scissors => 2,
        }
    }

    pub fn from_index(index: usize) -> Result<Self> {
        check_action(index, Self::ALL.len())?;
        Ok(Self::ALL[index])
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => write!(f, "Rock"),
            Move::Paper => write!(f, "Paper"),
            Move::Scissors => write!(f, "Scissors"),
        }
    }
}

/// Square zero-sum payoff table. `rows[i][j]` is what the row player
/// earns playing `i` against `j`.
///
/// Invariant: non-empty, square, `rows[i][j] == -rows[j][i]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i32>>", into = "Vec<Vec<i32>>")]
pub struct PayoffMatrix {
    rows: Vec<Vec<i32>>,
}

impl PayoffMatrix {
    /// Validate and wrap a row-major table
    pub fn new(rows: Vec<Vec<i32>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(RpsError::MalformedPayoff("matrix has no rows".into()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(RpsError::MalformedPayoff(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
        }
        for i in 0..n {
            for j in 0..n {
                // i32::MIN has no negation, so it can never be mirrored
                if rows[j][i].checked_neg() != Some(rows[i][j]) {
                    return Err(RpsError::MalformedPayoff(format!(
                        "not antisymmetric at ({}, {}): {} vs {}",
                        i, j, rows[i][j], rows[j][i]
                    )));
                }
            }
        }
        Ok(Self { rows })
    }

    /// Standard Rock-Paper-Scissors from the row player's seat
    pub fn rock_paper_scissors() -> Self {
        Self {
            rows: vec![
                //    R   P   S
                vec![0, -1, 1], // R
                vec![1, 0, -1], // P
                vec![-1, 1, 0], // S
            ],
        }
    }

    /// Number of actions per player
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<i32>] {
        &self.rows
    }

    pub fn row(&self, action: usize) -> Result<&[i32]> {
        check_action(action, self.size())?;
        Ok(&self.rows[action])
    }

    /// Payoff to the row player
    pub fn get(&self, row: usize, col: usize) -> Result<i32> {
        check_action(row, self.size())?;
        check_action(col, self.size())?;
        Ok(self.rows[row][col])
    }

    pub fn transpose(&self) -> Self {
        let n = self.size();
        let rows = (0..n)
            .map(|i| (0..n).map(|j| self.rows[j][i]).collect())
            .collect();
        Self { rows }
    }

    /// Payoffs to the column player, indexed `[own][opponent]`.
    /// For an antisymmetric matrix this is the matrix itself.
    pub fn column_perspective(&self) -> Self {
        let rows = self
            .transpose()
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(|u| -u).collect())
            .collect();
        Self { rows }
    }
}

impl Default for PayoffMatrix {
    fn default() -> Self {
        Self::rock_paper_scissors()
    }
}

impl TryFrom<Vec<Vec<i32>>> for PayoffMatrix {
    type Error = RpsError;

    fn try_from(rows: Vec<Vec<i32>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<PayoffMatrix> for Vec<Vec<i32>> {
    fn from(matrix: PayoffMatrix) -> Self {
        matrix.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rps_is_antisymmetric() {
        let m = PayoffMatrix::rock_paper_scissors();
        for i in 0..3 {
            assert_eq!(m.get(i, i).unwrap(), 0);
            for j in 0..3 {
                assert_eq!(m.get(i, j).unwrap(), -m.get(j, i).unwrap());
            }
        }
        assert!(PayoffMatrix::new(m.rows().to_vec()).is_ok());
    }

    #[test]
    fn test_rps_outcomes() {
        let m = PayoffMatrix::rock_paper_scissors();
        let p = |a: Move, b: Move| m.get(a.index(), b.index()).unwrap();
        assert_eq!(p(Move::Paper, Move::Rock), 1);
        assert_eq!(p(Move::Rock, Move::Scissors), 1);
        assert_eq!(p(Move::Scissors, Move::Paper), 1);
        assert_eq!(p(Move::Rock, Move::Paper), -1);
    }

    #[test]
    fn test_transpose() {
        let t = PayoffMatrix::rock_paper_scissors().transpose();
        assert_eq!(
            t.rows(),
            &[vec![0, 1, -1], vec![-1, 0, 1], vec![1, -1, 0]][..]
        );
    }

    #[test]
    fn test_column_perspective_of_antisymmetric_is_identity() {
        let m = PayoffMatrix::rock_paper_scissors();
        assert_eq!(m.column_perspective(), m);

        let skewed = PayoffMatrix::new(vec![vec![0, 2], vec![-2, 0]]).unwrap();
        assert_eq!(skewed.column_perspective(), skewed);
    }

    #[test]
    fn test_rejects_non_square() {
        let err = PayoffMatrix::new(vec![vec![0, 1], vec![-1, 0, 1]]).unwrap_err();
        assert!(matches!(err, RpsError::MalformedPayoff(_)));
        assert!(PayoffMatrix::new(vec![]).is_err());
    }

    #[test]
    fn test_rejects_non_antisymmetric() {
        assert!(PayoffMatrix::new(vec![vec![0, 1], vec![1, 0]]).is_err());
        assert!(PayoffMatrix::new(vec![vec![1, 0], vec![0, -1]]).is_err());
        assert!(PayoffMatrix::new(vec![vec![0, i32::MIN], vec![i32::MIN, 0]]).is_err());
        assert!(PayoffMatrix::new(vec![vec![0, i32::MAX], vec![-i32::MAX, 0]]).is_ok());
    }

    #[test]
    fn test_out_of_range_lookup() {
        let m = PayoffMatrix::rock_paper_scissors();
        assert_eq!(
            m.get(3, 0),
            Err(RpsError::InvalidAction { action: 3, actions: 3 })
        );
        assert!(m.row(5).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let json = serde_json::to_string(&PayoffMatrix::rock_paper_scissors()).unwrap();
        assert_eq!(json, "[[0,-1,1],[1,0,-1],[-1,1,0]]");
        let back: PayoffMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PayoffMatrix::rock_paper_scissors());
        assert!(serde_json::from_str::<PayoffMatrix>("[[0,1],[1,0]]").is_err());
    }

    #[test]
    fn test_move_indices() {
        for (i, m) in Move::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
            assert_eq!(Move::from_index(i).unwrap(), *m);
        }
        assert!(Move::from_index(3).is_err());
        assert_eq!(Move::Paper.to_string(), "Paper");
    }
}
