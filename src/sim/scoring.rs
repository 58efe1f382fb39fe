//! Score terms and end-of-game standings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Golf name for a hole result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTerm {
    HoleInOne,
    Albatross,
    Eagle,
    Birdie,
    Par,
    Bogey,
    DoubleBogey,
    TripleBogey,
    /// Anything else; carries the stroke count
    Strokes(u32),
}

impl ScoreTerm {
    pub fn classify(strokes: u32, par: u32) -> Self {
        if strokes == 1 {
            return ScoreTerm::HoleInOne;
        }
        match strokes as i64 - par as i64 {
            i64::MIN..=-3 => ScoreTerm::Albatross,
            -2 => ScoreTerm::Eagle,
            -1 => ScoreTerm::Birdie,
            0 => ScoreTerm::Par,
            1 => ScoreTerm::Bogey,
            2 => ScoreTerm::DoubleBogey,
            3 => ScoreTerm::TripleBogey,
            _ => ScoreTerm::Strokes(strokes),
        }
    }
}

impl fmt::Display for ScoreTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTerm::HoleInOne => write!(f, "hole in one"),
            ScoreTerm::Albatross => write!(f, "albatross"),
            ScoreTerm::Eagle => write!(f, "eagle"),
            ScoreTerm::Birdie => write!(f, "birdie"),
            ScoreTerm::Par => write!(f, "par"),
            ScoreTerm::Bogey => write!(f, "bogey"),
            ScoreTerm::DoubleBogey => write!(f, "double bogey"),
            ScoreTerm::TripleBogey => write!(f, "triple bogey"),
            ScoreTerm::Strokes(n) => write!(f, "{n} strokes"),
        }
    }
}

/// One row of the final table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub score: u32,
}

/// Outcome of a finished game session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Sorted by score, lowest first; ties keep player order
    pub standings: Vec<Standing>,
}

impl GameSummary {
    pub fn new<'a>(scores: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        let mut standings: Vec<Standing> = scores
            .into_iter()
            .map(|(name, score)| Standing {
                name: name.to_string(),
                score,
            })
            .collect();
        // Stable sort: the first of equal scores wins
        standings.sort_by_key(|s| s.score);
        Self { standings }
    }

    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, standing) in self.standings.iter().enumerate() {
            writeln!(f, "{:>2}. {:<16} {}", rank + 1, standing.name, standing.score)?;
        }
        Ok(())
    }
}
