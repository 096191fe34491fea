//! Teams, positions, and roster invariants.

use crate::matches::TeamId;
use crate::skill::Player;
use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Playing positions on a quidditch team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Hits bludgers at opponents and shields teammates.
    Beater,
    /// Carries the quaffle and scores goals.
    Chaser,
    /// Guards the hoops.
    Keeper,
    /// Chases the snitch.
    Seeker,
}

impl Position {
    /// All positions in roster order.
    pub const ALL: [Position; 4] = [
        Position::Beater,
        Position::Chaser,
        Position::Keeper,
        Position::Seeker,
    ];

    /// Fixed number of rostered players for the position.
    pub fn roster_size(self) -> usize {
        match self {
            Position::Beater => 4,
            Position::Chaser => 6,
            Position::Keeper => 2,
            Position::Seeker => 2,
        }
    }

    /// Number of players fielded at the position in a match.
    pub fn lineup_size(self) -> usize {
        match self {
            Position::Beater => 2,
            Position::Chaser => 3,
            Position::Keeper => 1,
            Position::Seeker => 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Beater => "beater",
            Position::Chaser => "chaser",
            Position::Keeper => "keeper",
            Position::Seeker => "seeker",
        };
        f.write_str(s)
    }
}

/// A club with its four position rosters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Full club name; doubles as the team identity.
    pub name: String,
    /// Abbreviation used in compact listings.
    pub short_name: String,
    /// Home ground, used as the match location for home fixtures.
    pub home: String,
    /// Four beaters.
    pub beaters: Vec<Player>,
    /// Six chasers.
    pub chasers: Vec<Player>,
    /// Two keepers.
    pub keepers: Vec<Player>,
    /// Two seekers.
    pub seekers: Vec<Player>,
}

impl Team {
    /// A team with empty rosters; fill them before validation.
    pub fn new(name: impl Into<String>, short_name: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            home: home.into(),
            beaters: Vec::new(),
            chasers: Vec::new(),
            keepers: Vec::new(),
            seekers: Vec::new(),
        }
    }

    pub fn id(&self) -> TeamId {
        TeamId(self.name.clone())
    }

    pub fn roster(&self, position: Position) -> &[Player] {
        match position {
            Position::Beater => &self.beaters,
            Position::Chaser => &self.chasers,
            Position::Keeper => &self.keepers,
            Position::Seeker => &self.seekers,
        }
    }

    pub fn roster_mut(&mut self, position: Position) -> &mut Vec<Player> {
        match position {
            Position::Beater => &mut self.beaters,
            Position::Chaser => &mut self.chasers,
            Position::Keeper => &mut self.keepers,
            Position::Seeker => &mut self.seekers,
        }
    }

    /// Every rostered player, position by position.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        Position::ALL
            .into_iter()
            .flat_map(move |pos| self.roster(pos).iter())
    }
}

/// Validate names and fixed roster sizes.
pub fn validate_team(team: &Team) -> Result<(), ValidationError> {
    if team.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    for position in Position::ALL {
        let found = team.roster(position).len();
        if found != position.roster_size() {
            return Err(ValidationError::RosterSize {
                team: team.name.clone(),
                position,
                expected: position.roster_size(),
                found,
            });
        }
    }
    if team.players().any(|p| p.name.trim().is_empty()) {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_team(name: &str) -> Team {
        let mut team = Team::new(name, "TST", "Test Pitch");
        for position in Position::ALL {
            for i in 0..position.roster_size() {
                team.roster_mut(position)
                    .push(Player::new(format!("{name} {position} {i}"), 5, 5, 5, 5));
            }
        }
        team
    }

    #[test]
    fn full_roster_validates() {
        let team = full_team("Puddlemere United");
        validate_team(&team).unwrap();
        assert_eq!(team.players().count(), 14);
        assert_eq!(team.id(), TeamId("Puddlemere United".to_string()));
    }

    #[test]
    fn short_roster_is_rejected() {
        let mut team = full_team("Wigtown Wanderers");
        team.chasers.pop();
        assert_eq!(
            validate_team(&team),
            Err(ValidationError::RosterSize {
                team: "Wigtown Wanderers".to_string(),
                position: Position::Chaser,
                expected: 6,
                found: 5,
            })
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let team = full_team("  ");
        assert_eq!(validate_team(&team), Err(ValidationError::EmptyName));
    }

    #[test]
    fn lineup_never_exceeds_roster() {
        for position in Position::ALL {
            assert!(position.lineup_size() <= position.roster_size());
        }
    }
}
