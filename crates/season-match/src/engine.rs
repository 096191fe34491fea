//! Match state machine.
//!
//! Every pass of the game loop rolls for possession, then plays a chaser
//! phase: turnovers until one side gets a shot away. Once the snitch is
//! released each chaser phase is followed by a draw against the snitch. The
//! snitch is taken when a draw lands exactly on its hidden value and the
//! seeker contest that follows is not spoiled by a bludger. Draws that fall in
//! the seekers' interaction band but miss the value either produce a sighting
//! or narrow the range future draws come from, so the odds of a catch rise as
//! the match drags on.

use crate::lineup::{Lineup, LineupPlayer};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use season_core::{
    BludgerInteraction, BludgerOutcome, ChaserOutcome, Play, PlayKind, SeekerOutcome, Side,
};
use tracing::debug;

/// Hard ceiling on plays per match. The snitch is caught outright on the last
/// one.
pub const MAX_PLAYS: usize = 100_000;

const CHANCE_FLOOR: u32 = 0;
const CHANCE_CEIL: u32 = 100;
/// Clock after which every even draw narrows the chance range.
const LATE_GAME_SECS: u32 = 120 * 60;
/// Bludger attacks need a roll above this to be attempted, and land when the
/// dodge roll stays at or under it.
const BLUDGER_THRESHOLD: u32 = 25;

/// Outcome of one simulated match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationResult {
    pub plays: Vec<Play>,
    pub home_score: u32,
    pub away_score: u32,
    pub home_fouls: u32,
    pub away_fouls: u32,
    pub duration_secs: u32,
}

/// Play a full match between two lineups. Identical inputs give identical
/// results.
pub fn simulate(home: &Lineup, away: &Lineup, seed: u64) -> SimulationResult {
    let mut sim = MatchSim::new(home, away, seed);
    sim.run();
    debug!(
        home = home.team(),
        away = away.team(),
        plays = sim.plays.len(),
        score = ?sim.scores,
        secs = sim.clock,
        "match simulated"
    );
    SimulationResult {
        home_score: sim.scores[0],
        away_score: sim.scores[1],
        home_fouls: sim.fouls[0],
        away_fouls: sim.fouls[1],
        duration_secs: sim.clock,
        plays: sim.plays,
    }
}

#[derive(Clone, Copy, Debug)]
struct Snitch {
    value: u32,
    /// Band of draws the seekers react to.
    interaction: (u32, u32),
    /// Range draws are taken from; shrinks toward `interaction`.
    chance: (u32, u32),
    release_secs: u32,
}

impl Snitch {
    fn reacts_to(&self, draw: u32) -> bool {
        self.interaction.0 <= draw && draw <= self.interaction.1
    }

    fn narrow(&mut self) {
        self.chance.0 = (self.chance.0 + 1).min(self.interaction.0);
        self.chance.1 = self.chance.1.saturating_sub(1).max(self.interaction.1);
    }

    /// Narrow on draws divisible by 3, or by 2 once the clock is late.
    /// Returns whether the range moved toward the band.
    fn narrow_on(&mut self, draw: u32, clock: u32) -> bool {
        let divisor = if clock >= LATE_GAME_SECS { 2 } else { 3 };
        if draw % divisor != 0 {
            return false;
        }
        let before = self.chance;
        self.narrow();
        before != self.chance
    }
}

struct MatchSim<'a> {
    rng: ChaCha8Rng,
    lineups: [&'a Lineup; 2],
    attacking: Side,
    scores: [u32; 2],
    fouls: [u32; 2],
    clock: u32,
    snitch: Snitch,
    plays: Vec<Play>,
    over: bool,
}

impl<'a> MatchSim<'a> {
    fn new(home: &'a Lineup, away: &'a Lineup, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let value = rng.gen_range(20..=80);
        let gap = home.seeker().offense.abs_diff(away.seeker().offense);
        let half_width = 5 + gap;
        let snitch = Snitch {
            value,
            interaction: (
                value.saturating_sub(half_width).max(CHANCE_FLOOR),
                (value + half_width).min(CHANCE_CEIL),
            ),
            chance: (CHANCE_FLOOR, CHANCE_CEIL),
            release_secs: rng.gen_range(10..=30) * 60,
        };
        Self {
            rng,
            lineups: [home, away],
            attacking: Side::Home,
            scores: [0; 2],
            fouls: [0; 2],
            clock: 0,
            snitch,
            plays: Vec::new(),
            over: false,
        }
    }

    fn out_of_plays(&self) -> bool {
        self.plays.len() + 1 >= MAX_PLAYS
    }

    fn run(&mut self) {
        while !self.over {
            if self.out_of_plays() {
                self.force_catch();
                break;
            }
            self.attacking = self.roll_possession();
            self.chaser_phase();
            if !self.out_of_plays() && self.clock >= self.snitch.release_secs {
                self.seeker_phase();
            }
        }
    }

    fn lineup(&self, side: Side) -> &'a Lineup {
        self.lineups[side.index()]
    }

    fn dice(&mut self, count: u32, sides: u32) -> u32 {
        (0..count).map(|_| self.rng.gen_range(1..=sides)).sum()
    }

    fn pick<'p>(&mut self, players: &'p [LineupPlayer]) -> &'p LineupPlayer {
        &players[self.rng.gen_range(0..players.len())]
    }

    fn roll_possession(&mut self) -> Side {
        loop {
            let home = self.dice(5, 10) + self.lineups[0].chaser_offense();
            let away = self.dice(5, 10) + self.lineups[1].chaser_offense();
            if home != away {
                return if home > away { Side::Home } else { Side::Away };
            }
        }
    }

    /// Turnovers until a roll of 3, then one goal attempt. Possession passes
    /// after every play.
    fn chaser_phase(&mut self) {
        loop {
            if self.out_of_plays() {
                return;
            }
            let attacking = self.attacking;
            let defending = attacking.opponent();
            let attacker = self.pick(self.lineup(attacking).chasers()).clone();
            if self.rng.gen_range(1..=3) == 3 {
                let keeper = self.lineup(defending).keeper();
                let outcome = self.shot(&attacker, keeper);
                let duration = self.rng.gen_range(20..=120);
                let kind = PlayKind::Chaser {
                    attacker: attacker.name,
                    defender: keeper.name.clone(),
                    outcome,
                };
                self.record(attacking, kind, None, duration);
                self.attacking = defending;
                return;
            }
            self.turnover(&attacker);
            self.attacking = defending;
        }
    }

    fn turnover(&mut self, attacker: &LineupPlayer) {
        let attacking = self.attacking;
        let defending = attacking.opponent();
        let defender = self.pick(self.lineup(defending).chasers()).clone();
        let duration = self.rng.gen_range(10..=45);
        if self.dice(1, 100) <= defender.foul_likelihood * 3 {
            let keeper = self.lineup(defending).keeper();
            let outcome = self.shot(attacker, keeper);
            self.fouls[defending.index()] += 1;
            let kind = PlayKind::Foul {
                attacker: attacker.name.clone(),
                fouler: defender.name,
                keeper: keeper.name.clone(),
                outcome,
            };
            self.record(attacking, kind, None, duration);
        } else {
            let bludger = self.bludger(defending, attacker);
            let kind = PlayKind::Chaser {
                attacker: attacker.name.clone(),
                defender: defender.name,
                outcome: ChaserOutcome::Turnover,
            };
            self.record(attacking, kind, bludger, duration);
        }
    }

    fn shot(&mut self, attacker: &LineupPlayer, keeper: &LineupPlayer) -> ChaserOutcome {
        let attack = self.dice(2, 10) + attacker.offense;
        let save = self.dice(2, 10) + keeper.defense;
        match attack.cmp(&save) {
            std::cmp::Ordering::Greater => ChaserOutcome::Scored,
            std::cmp::Ordering::Less => ChaserOutcome::Blocked,
            std::cmp::Ordering::Equal => ChaserOutcome::Missed,
        }
    }

    /// A beater from `hitting` aims at `target`. `None` when the beater does
    /// not get a swing in.
    fn bludger(&mut self, hitting: Side, target: &LineupPlayer) -> Option<BludgerInteraction> {
        let hitters = self.lineup(hitting);
        let blockers = self.lineup(hitting.opponent());
        let beater = self.pick(hitters.beaters());
        let chance = self.dice(3, 10) + beater.offense + hitters.beater_teamwork() / 2;
        if chance <= BLUDGER_THRESHOLD {
            return None;
        }
        let blocker = self.pick(blockers.beaters());
        let block = self.dice(3, 10) + blockers.beater_defense() / 2 + hitters.beater_teamwork() / 2;
        let outcome = if block > chance {
            BludgerOutcome::Blocked
        } else {
            let dodge: u32 = (0..3).map(|_| self.rng.gen_range(2..=11)).sum::<u32>()
                + target.defense
                + target.teamwork;
            if dodge <= BLUDGER_THRESHOLD {
                BludgerOutcome::Hit
            } else {
                BludgerOutcome::Missed
            }
        };
        Some(BludgerInteraction {
            beater: beater.name.clone(),
            target: target.name.clone(),
            blocker: Some(blocker.name.clone()),
            outcome,
        })
    }

    fn seeker_phase(&mut self) {
        let draw = self.rng.gen_range(self.snitch.chance.0..=self.snitch.chance.1);
        if !self.snitch.reacts_to(draw) {
            return;
        }
        if draw == self.snitch.value {
            self.catch_attempt();
        } else if draw % 4 == 0 {
            let side = if self.rng.gen_bool(0.5) { Side::Home } else { Side::Away };
            self.seeker_play(side, SeekerOutcome::Seen, None, 0);
        } else {
            self.snitch.narrow_on(draw, self.clock);
        }
    }

    fn catch_attempt(&mut self) {
        let catcher = loop {
            let home = self.dice(1, 1000) + self.lineups[0].seeker().offense * 20;
            let away = self.dice(1, 1000) + self.lineups[1].seeker().offense * 20;
            if home != away {
                break if home > away { Side::Home } else { Side::Away };
            }
        };
        let bludger = if self.rng.gen_bool(0.5) {
            self.bludger(catcher.opponent(), self.lineup(catcher).seeker())
        } else {
            None
        };
        let hit = bludger.as_ref().is_some_and(|b| b.outcome == BludgerOutcome::Hit);
        let outcome = if !hit {
            SeekerOutcome::Caught
        } else if self.rng.gen_bool(0.5) {
            SeekerOutcome::Stolen
        } else if self.rng.gen_bool(0.5) {
            SeekerOutcome::Missed
        } else {
            SeekerOutcome::Caught
        };
        let duration = self.rng.gen_range(10..=60);
        self.seeker_play(catcher, outcome, bludger, duration);
    }

    fn force_catch(&mut self) {
        let catcher = self.attacking;
        self.seeker_play(catcher, SeekerOutcome::Caught, None, 0);
    }

    fn seeker_play(
        &mut self,
        side: Side,
        outcome: SeekerOutcome,
        bludger: Option<BludgerInteraction>,
        duration: u32,
    ) {
        let kind = PlayKind::Seeker {
            seeker: self.lineup(side).seeker().name.clone(),
            opponent: self.lineup(side.opponent()).seeker().name.clone(),
            outcome,
        };
        self.record(side, kind, bludger, duration);
    }

    /// Apply a play's points and duration, then append it with the updated
    /// score and clock.
    fn record(
        &mut self,
        attacking: Side,
        kind: PlayKind,
        bludger: Option<BludgerInteraction>,
        duration: u32,
    ) {
        let mut play = Play {
            attacking,
            defending: attacking.opponent(),
            kind,
            bludger,
            duration_secs: duration,
            home_score: 0,
            away_score: 0,
            match_secs: 0,
        };
        if let Some(side) = play.scoring_side() {
            self.scores[side.index()] += play.points();
        }
        self.clock += duration;
        play.home_score = self.scores[0];
        play.away_score = self.scores[1];
        play.match_secs = self.clock;
        self.over = play.ends_match();
        self.plays.push(play);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use season_core::{Player, Position, Team, GOAL_POINTS, SNITCH_POINTS};

    fn team(name: &str, skill: i64) -> Team {
        let mut t = Team::new(name, &name[..3], format!("{name} Ground"));
        for position in Position::ALL {
            for i in 0..position.roster_size() {
                let s = skill + (i as i64 % 3) - 1;
                t.roster_mut(position)
                    .push(Player::new(format!("{name} {position} {i}"), s, s, s, 11 - s));
            }
        }
        t
    }

    fn lineups(home_skill: i64, away_skill: i64) -> (Lineup, Lineup) {
        let day = NaiveDate::from_ymd_opt(2024, 9, 6).unwrap();
        (
            Lineup::select(&team("Kenmare Kestrels", home_skill), day).unwrap(),
            Lineup::select(&team("Pride of Portree", away_skill), day).unwrap(),
        )
    }

    #[test]
    fn same_seed_replays_identically() {
        let (home, away) = lineups(6, 5);
        let a = simulate(&home, &away, 42);
        let b = simulate(&home, &away, 42);
        assert_eq!(a, b);
        let differs = (43..48).any(|seed| simulate(&home, &away, seed) != a);
        assert!(differs);
    }

    #[test]
    fn result_matches_last_play() {
        let (home, away) = lineups(7, 4);
        let r = simulate(&home, &away, 7);
        let last = r.plays.last().unwrap();
        assert_eq!((r.home_score, r.away_score), (last.home_score, last.away_score));
        assert_eq!(r.duration_secs, last.match_secs);
        let fouls = r.plays.iter().filter(|p| p.is_foul()).count() as u32;
        assert_eq!(r.home_fouls + r.away_fouls, fouls);
    }

    #[test]
    fn snitch_range_narrows_toward_interaction_band() {
        let mut s = Snitch {
            value: 50,
            interaction: (45, 55),
            chance: (44, 57),
            release_secs: 600,
        };
        s.narrow();
        assert_eq!(s.chance, (45, 56));
        s.narrow();
        s.narrow();
        assert_eq!(s.chance, (45, 55));
    }

    #[test]
    fn late_game_narrows_on_even_draws() {
        let fresh = Snitch {
            value: 50,
            interaction: (40, 60),
            chance: (0, 100),
            release_secs: 600,
        };
        let mut early = fresh;
        assert!(!early.narrow_on(58, LATE_GAME_SECS - 1));
        assert_eq!(early.chance, (0, 100));
        assert!(early.narrow_on(57, LATE_GAME_SECS - 1));
        assert_eq!(early.chance, (1, 99));

        let mut late = fresh;
        assert!(late.narrow_on(58, LATE_GAME_SECS));
        assert_eq!(late.chance, (1, 99));
        assert!(!late.narrow_on(57, LATE_GAME_SECS));
        assert_eq!(late.chance, (1, 99));
    }

    #[test]
    fn possession_is_rerolled_every_phase() {
        let (home, away) = lineups(10, 1);
        let (mut repeats, mut home_shots, mut away_shots) = (0, 0, 0);
        for seed in 0..20 {
            let r = simulate(&home, &away, seed);
            let chaser_plays: Vec<&Play> = r
                .plays
                .iter()
                .filter(|p| !matches!(p.kind, PlayKind::Seeker { .. }))
                .collect();
            repeats += chaser_plays
                .windows(2)
                .filter(|w| w[0].attacking == w[1].attacking)
                .count();
            for p in &chaser_plays {
                if let PlayKind::Chaser { outcome, .. } = &p.kind {
                    if *outcome != ChaserOutcome::Turnover {
                        match p.attacking {
                            Side::Home => home_shots += 1,
                            Side::Away => away_shots += 1,
                        }
                    }
                }
            }
        }
        assert!(repeats > 0);
        assert!(home_shots > away_shots);
    }

    #[test]
    fn snitch_draws_follow_a_shot() {
        let (home, away) = lineups(6, 6);
        for seed in 0..10 {
            let r = simulate(&home, &away, seed);
            for w in r.plays.windows(2) {
                if matches!(w[1].kind, PlayKind::Seeker { .. }) {
                    assert!(
                        matches!(
                            &w[0].kind,
                            PlayKind::Chaser { outcome, .. } if *outcome != ChaserOutcome::Turnover
                        ),
                        "seed {seed}: {} came before a seeker play",
                        w[0]
                    );
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn scores_only_move_by_points(seed in any::<u64>(), hs in 1i64..=10, aws in 1i64..=10) {
            let (home, away) = lineups(hs, aws);
            let r = simulate(&home, &away, seed);
            prop_assert!(!r.plays.is_empty());
            prop_assert!(r.plays.len() <= MAX_PLAYS);

            let (mut h, mut a, mut clock) = (0u32, 0u32, 0u32);
            for (i, play) in r.plays.iter().enumerate() {
                let (dh, da) = (play.home_score - h, play.away_score - a);
                match play.scoring_side() {
                    Some(Side::Home) => {
                        prop_assert_eq!((dh, da), (play.points(), 0));
                    }
                    Some(Side::Away) => {
                        prop_assert_eq!((dh, da), (0, play.points()));
                    }
                    None => {
                        prop_assert_eq!((dh, da), (0, 0));
                    }
                }
                prop_assert!(play.points() == 0 || play.points() == GOAL_POINTS || play.points() == SNITCH_POINTS);
                prop_assert_eq!(play.match_secs, clock + play.duration_secs);
                prop_assert_eq!(play.ends_match(), i + 1 == r.plays.len());
                h = play.home_score;
                a = play.away_score;
                clock = play.match_secs;
            }
        }
    }
}
