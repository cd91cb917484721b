//! Move grades and the per-side grade tally
//!
//! The engine service labels every move with one of seven grades, best to
//! worst. The tracker keeps a running count per side so the UI can show how
//! each player has been doing since the last reset.
//!
//! Counts only go up. Stepping back through history does not remove a
//! grade: the tally is a ledger of submitted moves, not of the line
//! currently on the board. Only a board reset zeroes it.

use crate::game::types::Side;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An RGB display color, as sent by the service (`[r, g, b]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown grade '{0}'")]
pub struct UnknownGrade(pub String);

/// Move quality, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    Sigma,
    Chad,
    Good,
    Okay,
    Strange,
    Bad,
    Clown,
}

impl Grade {
    /// Every grade in display order
    pub const ALL: [Grade; 7] = [
        Grade::Sigma,
        Grade::Chad,
        Grade::Good,
        Grade::Okay,
        Grade::Strange,
        Grade::Bad,
        Grade::Clown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Grade::Sigma => "Sigma",
            Grade::Chad => "Chad",
            Grade::Good => "Good",
            Grade::Okay => "Okay",
            Grade::Strange => "Strange",
            Grade::Bad => "Bad",
            Grade::Clown => "Clown",
        }
    }

    /// Color used when the service does not send one
    pub fn default_color(self) -> Rgb {
        match self {
            Grade::Sigma => Rgb(0, 255, 255),
            Grade::Chad => Rgb(0, 255, 128),
            Grade::Good => Rgb(0, 255, 0),
            Grade::Okay => Rgb(128, 255, 0),
            Grade::Strange => Rgb(255, 255, 0),
            Grade::Bad => Rgb(255, 128, 0),
            Grade::Clown => Rgb(255, 0, 0),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Grade::ALL
            .into_iter()
            .find(|grade| grade.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownGrade(s.to_string()))
    }
}

/// Count per grade for one side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeCounts([u32; Grade::ALL.len()]);

impl GradeCounts {
    pub fn get(&self, grade: Grade) -> u32 {
        self.0[grade.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// `(grade, count)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Grade, u32)> + '_ {
        Grade::ALL.into_iter().map(|grade| (grade, self.get(grade)))
    }

    fn increment(&mut self, grade: Grade) {
        self.0[grade.index()] = self.0[grade.index()].saturating_add(1);
    }
}

/// Per-side grade counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeDistribution {
    pub white: GradeCounts,
    pub black: GradeCounts,
}

impl GradeDistribution {
    pub fn side(&self, side: Side) -> &GradeCounts {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut GradeCounts {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.white.total() == 0 && self.black.total() == 0
    }
}

/// Running grade tally for both sides
#[derive(Debug, Clone, Default)]
pub struct GradeTracker {
    distribution: GradeDistribution,
}

impl GradeTracker {
    /// Count one graded move for the side that made it
    pub fn record(&mut self, side: Side, grade: Grade) {
        self.distribution.side_mut(side).increment(grade);
    }

    /// Zero every cell for both sides
    pub fn reset(&mut self) {
        self.distribution = GradeDistribution::default();
    }

    /// Copy of the current tally for display
    pub fn snapshot(&self) -> GradeDistribution {
        self.distribution
    }

    pub fn count(&self, side: Side, grade: Grade) -> u32 {
        self.distribution.side(side).get(grade)
    }

    pub fn total(&self, side: Side) -> u32 {
        self.distribution.side(side).total()
    }
}
