use chrono::{NaiveDate, NaiveTime, Weekday};
use criterion::{criterion_group, criterion_main, Criterion};
use season_core::{Player, Position, Team, TournamentOptions};
use season_runtime::Season;

fn league(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| {
            let name = format!("Club {i:02}");
            let mut t = Team::new(name.clone(), "CLB", format!("{name} Ground"));
            for position in Position::ALL {
                for j in 0..position.roster_size() {
                    let skill = 3 + (i + j) as i64 % 7;
                    t.roster_mut(position)
                        .push(Player::new(format!("{name} {j}"), skill, skill, skill, 3));
                }
            }
            t
        })
        .collect()
}

fn options() -> TournamentOptions {
    let mut o = TournamentOptions::new("Bench League", NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
    for day in [Weekday::Fri, Weekday::Sat, Weekday::Sun] {
        o.start_times.enable(
            day,
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        );
    }
    o
}

fn bench_schedule(c: &mut Criterion) {
    let teams = league(16);
    c.bench_function("recompute_16_teams", |b| {
        b.iter(|| Season::new(options(), teams.clone(), 7).unwrap())
    });
}

fn bench_season(c: &mut Criterion) {
    let season = Season::new(options(), league(8), 7).unwrap();
    c.bench_function("simulate_8_team_season", |b| {
        b.iter(|| {
            let mut s = season.clone();
            s.simulate_all().unwrap()
        })
    });
}

criterion_group!(benches, bench_schedule, bench_season);
criterion_main!(benches);
