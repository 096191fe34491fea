//! Scheduled fixtures and their simulated results.

use crate::play::{Play, Side};
use crate::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable team identity; team names are unique within a season.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fixture. Starts as a shell with a kickoff only; teams are assigned by
/// the tournament format and results by the simulator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// 1-based position in the season.
    pub number: u32,
    /// 1-based round the fixture belongs to.
    pub round: u32,
    pub start: NaiveDateTime,
    pub home: Option<TeamId>,
    pub away: Option<TeamId>,
    pub location: Option<String>,
    pub duration_secs: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub home_fouls: u32,
    pub away_fouls: u32,
    pub plays: Vec<Play>,
    pub winner: Option<Side>,
}

/// One-line result view of a simulated match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub number: u32,
    pub round: u32,
    pub start: NaiveDateTime,
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub duration_secs: u32,
    pub winner: Option<String>,
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<3} R{:<2} {} {} {}-{} {} ({} min)",
            self.number,
            self.round,
            self.start.format("%a %Y-%m-%d %H:%M"),
            self.home,
            self.home_score,
            self.away_score,
            self.away,
            self.duration_secs / 60
        )
    }
}

impl Match {
    /// An unassigned fixture.
    pub fn shell(number: u32, round: u32, start: NaiveDateTime) -> Self {
        Self {
            number,
            round,
            start,
            home: None,
            away: None,
            location: None,
            duration_secs: 0,
            home_score: 0,
            away_score: 0,
            home_fouls: 0,
            away_fouls: 0,
            plays: Vec::new(),
            winner: None,
        }
    }

    /// Set both teams and the venue.
    pub fn assign(&mut self, home: TeamId, away: TeamId, location: impl Into<String>) {
        self.home = Some(home);
        self.away = Some(away);
        self.location = Some(location.into());
    }

    pub fn is_assigned(&self) -> bool {
        self.home.is_some() && self.away.is_some()
    }

    pub fn is_simulated(&self) -> bool {
        !self.plays.is_empty()
    }

    /// Store the simulated plays. Scores, clock, and winner follow from the
    /// last play's snapshot. A match accepts results once.
    pub fn complete(
        &mut self,
        plays: Vec<Play>,
        home_fouls: u32,
        away_fouls: u32,
    ) -> Result<(), ValidationError> {
        if self.is_simulated() {
            return Err(ValidationError::AlreadySimulated(self.number));
        }
        if let Some(last) = plays.last() {
            self.home_score = last.home_score;
            self.away_score = last.away_score;
            self.duration_secs = last.match_secs;
        }
        self.home_fouls = home_fouls;
        self.away_fouls = away_fouls;
        self.winner = match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        };
        self.plays = plays;
        Ok(())
    }

    pub fn team(&self, side: Side) -> Option<&TeamId> {
        match side {
            Side::Home => self.home.as_ref(),
            Side::Away => self.away.as_ref(),
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn fouls(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_fouls,
            Side::Away => self.away_fouls,
        }
    }

    pub fn winner_team(&self) -> Option<&TeamId> {
        self.winner.and_then(|side| self.team(side))
    }

    /// Result line for an assigned match; `None` for unassigned shells.
    pub fn summary(&self) -> Option<MatchSummary> {
        let home = self.home.as_ref()?;
        let away = self.away.as_ref()?;
        Some(MatchSummary {
            number: self.number,
            round: self.round,
            start: self.start,
            home: home.0.clone(),
            away: away.0.clone(),
            home_score: self.home_score,
            away_score: self.away_score,
            duration_secs: self.duration_secs,
            winner: self.winner_team().map(|t| t.0.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::{ChaserOutcome, PlayKind};
    use chrono::NaiveDate;

    fn kickoff() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 6)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn goal(home_score: u32, away_score: u32, match_secs: u32) -> Play {
        Play {
            attacking: Side::Home,
            defending: Side::Away,
            kind: PlayKind::Chaser {
                attacker: "a".into(),
                defender: "d".into(),
                outcome: ChaserOutcome::Scored,
            },
            bludger: None,
            duration_secs: 30,
            home_score,
            away_score,
            match_secs,
        }
    }

    #[test]
    fn completion_copies_final_snapshot() {
        let mut m = Match::shell(1, 1, kickoff());
        m.assign(TeamId("Arrows".into()), TeamId("Bats".into()), "Appleby");
        m.complete(vec![goal(10, 0, 30), goal(20, 0, 75)], 1, 2).unwrap();
        assert!(m.is_simulated());
        assert_eq!(m.score(Side::Home), 20);
        assert_eq!(m.duration_secs, 75);
        assert_eq!(m.fouls(Side::Away), 2);
        assert_eq!(m.winner_team(), Some(&TeamId("Arrows".into())));
        let summary = m.summary().unwrap();
        assert_eq!(summary.winner.as_deref(), Some("Arrows"));
    }

    #[test]
    fn second_completion_is_rejected() {
        let mut m = Match::shell(4, 2, kickoff());
        m.complete(vec![goal(10, 0, 30)], 0, 0).unwrap();
        assert_eq!(
            m.complete(vec![goal(0, 10, 30)], 0, 0),
            Err(ValidationError::AlreadySimulated(4))
        );
        assert_eq!(m.home_score, 10);
    }

    #[test]
    fn level_scores_have_no_winner() {
        let mut m = Match::shell(2, 1, kickoff());
        m.complete(vec![goal(10, 10, 100)], 0, 0).unwrap();
        assert_eq!(m.winner, None);
        assert!(m.summary().is_none());
    }
}
