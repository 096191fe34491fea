//! Play-by-play records produced by the match simulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Home or away side of a fixture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// 0 for home, 1 for away; handy for `[T; 2]` indexing.
    pub fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Home => "home",
            Side::Away => "away",
        })
    }
}

/// Result of a chaser possession or a penalty shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaserOutcome {
    Turnover,
    Scored,
    Blocked,
    Missed,
}

/// Result of a seeker play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekerOutcome {
    /// The snitch was sighted; nothing else happens.
    Seen,
    /// The attacking seeker caught the snitch.
    Caught,
    /// The opposing seeker took the snitch after a bludger hit.
    Stolen,
    /// The catch attempt failed.
    Missed,
}

/// Result of a bludger attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BludgerOutcome {
    Blocked,
    Missed,
    Hit,
}

/// A bludger aimed by a beater at an opposing player during a play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BludgerInteraction {
    pub beater: String,
    pub target: String,
    /// Beater on the target's side who tried to block, if any.
    pub blocker: Option<String>,
    pub outcome: BludgerOutcome,
}

/// What happened in a play, with the players involved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayKind {
    /// A possession by the attacking chasers against the defending keeper.
    Chaser {
        attacker: String,
        defender: String,
        outcome: ChaserOutcome,
    },
    /// A defending chaser fouled on a turnover; the attacker shoots a penalty.
    Foul {
        attacker: String,
        fouler: String,
        keeper: String,
        outcome: ChaserOutcome,
    },
    /// A snitch play between the two seekers.
    Seeker {
        seeker: String,
        opponent: String,
        outcome: SeekerOutcome,
    },
}

/// One event in a match. Scores and clock are snapshots after the play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub attacking: Side,
    pub defending: Side,
    pub kind: PlayKind,
    pub bludger: Option<BludgerInteraction>,
    /// Seconds the play took.
    pub duration_secs: u32,
    pub home_score: u32,
    pub away_score: u32,
    /// Match clock at the end of the play, in seconds.
    pub match_secs: u32,
}

/// Points for a goal or a converted penalty.
pub const GOAL_POINTS: u32 = 10;
/// Points for taking the snitch.
pub const SNITCH_POINTS: u32 = 150;

impl Play {
    /// Points this play added to the scoring side.
    pub fn points(&self) -> u32 {
        match &self.kind {
            PlayKind::Chaser { outcome, .. } | PlayKind::Foul { outcome, .. } => {
                if *outcome == ChaserOutcome::Scored {
                    GOAL_POINTS
                } else {
                    0
                }
            }
            PlayKind::Seeker { outcome, .. } => match outcome {
                SeekerOutcome::Caught | SeekerOutcome::Stolen => SNITCH_POINTS,
                SeekerOutcome::Seen | SeekerOutcome::Missed => 0,
            },
        }
    }

    /// Side credited with [`Play::points`], if any were scored.
    pub fn scoring_side(&self) -> Option<Side> {
        if self.points() == 0 {
            return None;
        }
        match &self.kind {
            PlayKind::Seeker {
                outcome: SeekerOutcome::Stolen,
                ..
            } => Some(self.defending),
            _ => Some(self.attacking),
        }
    }

    /// Whether the snitch left play, ending the match.
    pub fn ends_match(&self) -> bool {
        matches!(
            self.kind,
            PlayKind::Seeker {
                outcome: SeekerOutcome::Caught | SeekerOutcome::Stolen,
                ..
            }
        )
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn is_foul(&self) -> bool {
        matches!(self.kind, PlayKind::Foul { .. })
    }
}

impl fmt::Display for ChaserOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChaserOutcome::Turnover => "turnover",
            ChaserOutcome::Scored => "scored",
            ChaserOutcome::Blocked => "blocked",
            ChaserOutcome::Missed => "missed",
        })
    }
}

impl fmt::Display for SeekerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeekerOutcome::Seen => "seen",
            SeekerOutcome::Caught => "caught",
            SeekerOutcome::Stolen => "stolen",
            SeekerOutcome::Missed => "missed",
        })
    }
}

impl fmt::Display for BludgerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BludgerOutcome::Blocked => "blocked",
            BludgerOutcome::Missed => "missed",
            BludgerOutcome::Hit => "hit",
        })
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = format!("{:>3}:{:02}", self.match_secs / 60, self.match_secs % 60);
        match &self.kind {
            PlayKind::Chaser {
                attacker,
                defender,
                outcome,
            } => write!(f, "{clock} {attacker} vs {defender}: {outcome}")?,
            PlayKind::Foul {
                attacker,
                fouler,
                keeper,
                outcome,
            } => write!(f, "{clock} foul by {fouler}; {attacker} penalty vs {keeper}: {outcome}")?,
            PlayKind::Seeker {
                seeker,
                opponent,
                outcome,
            } => write!(f, "{clock} snitch {outcome} ({seeker} vs {opponent})")?,
        }
        if let Some(b) = &self.bludger {
            write!(f, " [bludger {} -> {}: {}]", b.beater, b.target, b.outcome)?;
        }
        write!(f, " {}-{}", self.home_score, self.away_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeker_play(outcome: SeekerOutcome) -> Play {
        Play {
            attacking: Side::Home,
            defending: Side::Away,
            kind: PlayKind::Seeker {
                seeker: "Harry".into(),
                opponent: "Cho".into(),
                outcome,
            },
            bludger: None,
            duration_secs: 30,
            home_score: 0,
            away_score: 150,
            match_secs: 600,
        }
    }

    #[test]
    fn stolen_snitch_credits_the_defending_side() {
        let play = seeker_play(SeekerOutcome::Stolen);
        assert_eq!(play.points(), SNITCH_POINTS);
        assert_eq!(play.scoring_side(), Some(Side::Away));
        assert!(play.ends_match());
    }

    #[test]
    fn sighting_scores_nothing() {
        let play = seeker_play(SeekerOutcome::Seen);
        assert_eq!(play.points(), 0);
        assert_eq!(play.scoring_side(), None);
        assert!(!play.ends_match());
    }

    #[test]
    fn penalty_goal_is_worth_ten() {
        let play = Play {
            attacking: Side::Away,
            defending: Side::Home,
            kind: PlayKind::Foul {
                attacker: "Angelina".into(),
                fouler: "Marcus".into(),
                keeper: "Miles".into(),
                outcome: ChaserOutcome::Scored,
            },
            bludger: None,
            duration_secs: 20,
            home_score: 0,
            away_score: 10,
            match_secs: 20,
        };
        assert!(play.is_foul());
        assert_eq!(play.points(), GOAL_POINTS);
        assert_eq!(play.scoring_side(), Some(Side::Away));
        assert!(play.to_string().contains("foul by Marcus"));
    }

    #[test]
    fn sides_flip() {
        assert_eq!(Side::Home.opponent(), Side::Away);
        assert_eq!(Side::Away.index(), 1);
    }
}
