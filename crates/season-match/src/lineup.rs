//! Starting lineups picked from a team's rosters for one match day.

use chrono::NaiveDate;
use season_core::{validate_team, Player, Position, Team, ValidationError};

/// A starter with the ratings they play at on the day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineupPlayer {
    pub name: String,
    pub offense: u32,
    pub defense: u32,
    pub teamwork: u32,
    pub foul_likelihood: u32,
    /// Playing through an injury at half strength.
    pub injured: bool,
}

impl LineupPlayer {
    pub fn from_player(player: &Player, injured: bool) -> Self {
        let rate = |skill: season_core::Skill| {
            let skill = if injured { skill.halved() } else { skill };
            u32::from(skill.get())
        };
        Self {
            name: player.name.clone(),
            offense: rate(player.offense),
            defense: rate(player.defense),
            teamwork: rate(player.teamwork),
            foul_likelihood: u32::from(player.foul_likelihood.get()),
            injured,
        }
    }
}

/// The seven players a team fields in one match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lineup {
    team: String,
    beaters: Vec<LineupPlayer>,
    chasers: Vec<LineupPlayer>,
    keeper: LineupPlayer,
    seeker: LineupPlayer,
}

impl Lineup {
    /// Pick starters for `date`. Fit players rank ahead of injured ones and
    /// each group is ordered by descending net modifier; roster order breaks
    /// ties.
    pub fn select(team: &Team, date: NaiveDate) -> Result<Self, ValidationError> {
        validate_team(team)?;
        let pick = |position: Position| -> Vec<LineupPlayer> {
            let mut ranked: Vec<(&Player, bool)> = team
                .roster(position)
                .iter()
                .map(|p| (p, p.is_injured_on(date)))
                .collect();
            ranked.sort_by(|(a, a_hurt), (b, b_hurt)| {
                a_hurt
                    .cmp(b_hurt)
                    .then_with(|| b.net_modifier(*b_hurt).total_cmp(&a.net_modifier(*a_hurt)))
            });
            ranked
                .into_iter()
                .take(position.lineup_size())
                .map(|(p, hurt)| LineupPlayer::from_player(p, hurt))
                .collect()
        };
        let single = |position: Position| -> Result<LineupPlayer, ValidationError> {
            pick(position)
                .into_iter()
                .next()
                .ok_or_else(|| ValidationError::RosterSize {
                    team: team.name.clone(),
                    position,
                    expected: position.roster_size(),
                    found: 0,
                })
        };
        Ok(Self {
            team: team.name.clone(),
            beaters: pick(Position::Beater),
            chasers: pick(Position::Chaser),
            keeper: single(Position::Keeper)?,
            seeker: single(Position::Seeker)?,
        })
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn beaters(&self) -> &[LineupPlayer] {
        &self.beaters
    }

    pub fn chasers(&self) -> &[LineupPlayer] {
        &self.chasers
    }

    pub fn keeper(&self) -> &LineupPlayer {
        &self.keeper
    }

    pub fn seeker(&self) -> &LineupPlayer {
        &self.seeker
    }

    pub fn chaser_offense(&self) -> u32 {
        self.chasers.iter().map(|p| p.offense).sum()
    }

    pub fn beater_teamwork(&self) -> u32 {
        self.beaters.iter().map(|p| p.teamwork).sum()
    }

    pub fn beater_defense(&self) -> u32 {
        self.beaters.iter().map(|p| p.defense).sum()
    }

    /// Combined offense, defense, and teamwork of all seven starters.
    pub fn total_strength(&self) -> u32 {
        self.beaters
            .iter()
            .chain(&self.chasers)
            .chain([&self.keeper, &self.seeker])
            .map(|p| p.offense + p.defense + p.teamwork)
            .sum()
    }

    pub fn injured_starters(&self) -> usize {
        self.beaters
            .iter()
            .chain(&self.chasers)
            .chain([&self.keeper, &self.seeker])
            .filter(|p| p.injured)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn team() -> Team {
        let mut t = Team::new("Montrose Magpies", "MAG", "Montrose");
        t.beaters = vec![
            Player::new("B weak", 3, 3, 3, 5),
            Player::new("B star", 10, 9, 9, 1),
            Player::new("B good", 8, 8, 8, 2),
            Player::new("B mid", 6, 6, 6, 3),
        ];
        t.chasers = (0..6)
            .map(|i| Player::new(format!("C{i}"), i + 3, 5, 5, 5))
            .collect();
        t.keepers = vec![
            Player::new("K first", 9, 9, 9, 1).with_injury(day(1), day(10)),
            Player::new("K second", 4, 4, 4, 4),
        ];
        t.seekers = vec![
            Player::new("S first", 9, 9, 9, 1).with_injury(day(1), day(10)),
            Player::new("S second", 9, 9, 9, 1).with_injury(day(1), day(10)),
        ];
        t
    }

    #[test]
    fn strongest_fit_players_start() {
        let lineup = Lineup::select(&team(), day(20)).unwrap();
        let beaters: Vec<&str> = lineup.beaters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(beaters, vec!["B star", "B good"]);
        let chasers: Vec<&str> = lineup.chasers().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(chasers, vec!["C5", "C4", "C3"]);
        assert_eq!(lineup.keeper().name, "K first");
        assert_eq!(lineup.chaser_offense(), 8 + 7 + 6);
        assert_eq!(lineup.beater_teamwork(), 17);
        assert_eq!(lineup.injured_starters(), 0);
    }

    #[test]
    fn injured_players_drop_behind_fit_ones() {
        let lineup = Lineup::select(&team(), day(5)).unwrap();
        assert_eq!(lineup.keeper().name, "K second");
        assert!(!lineup.keeper().injured);
    }

    #[test]
    fn all_injured_position_fields_at_half_strength() {
        let lineup = Lineup::select(&team(), day(5)).unwrap();
        let seeker = lineup.seeker();
        assert_eq!(seeker.name, "S first");
        assert!(seeker.injured);
        assert_eq!((seeker.offense, seeker.defense, seeker.teamwork), (4, 4, 4));
        assert_eq!(seeker.foul_likelihood, 1);
        assert_eq!(lineup.injured_starters(), 1);
    }

    #[test]
    fn short_roster_cannot_field_a_lineup() {
        let mut t = team();
        t.seekers.clear();
        assert!(Lineup::select(&t, day(20)).is_err());
    }
}
