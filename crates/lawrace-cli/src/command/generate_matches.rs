use std::path::PathBuf;

use anyhow::Context as _;
use lawrace_engine::{
    Civilization, MatchCollection, MatchId, MatchRecord, PlayerEntry, PlayerId, TurnObservation,
};
use rand::{Rng, SeedableRng as _, seq::index};
use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg32;

use crate::util::Output;

const CIVILIZATIONS: &[&str] = &[
    "Rome", "Egypt", "Greece", "Persia", "Carthage", "China", "Aztec", "Mongolia",
];
/// Laws adopted per turn, on average.
const PACE_MEAN: f64 = 0.07;
const PACE_STD_DEV: f64 = 0.025;
const MIN_PACE: f64 = 0.01;
/// Longest run of turns without an observation for a player.
const MAX_OBSERVATION_GAP: u32 = 4;
/// Chance a player drops out before the match ends.
const DROP_OUT_PROBABILITY: f64 = 0.15;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateMatchesArg {
    /// Number of matches to generate
    #[arg(long, default_value_t = 20)]
    num_matches: usize,
    /// Players in each match, drawn from a shared pool so ids recur
    #[arg(long, default_value_t = 4)]
    players_per_match: usize,
    /// Upper bound on match length in turns
    #[arg(long, default_value_t = 120)]
    max_turns: u32,
    /// Random seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateMatchesArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.players_per_match > 0, "players-per-match must be positive");
    anyhow::ensure!(arg.max_turns >= 2, "max-turns must be at least 2");

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("generating {} matches with seed {seed}", arg.num_matches);
    let mut rng = Pcg32::seed_from_u64(seed);

    let pace = Normal::new(PACE_MEAN, PACE_STD_DEV).context("Invalid pace distribution")?;
    let pool = (1..=arg.players_per_match * 3)
        .map(|i| PlayerId::from(format!("player-{i:03}")))
        .collect::<Vec<_>>();

    let mut collection = MatchCollection::default();
    for i in 0..arg.num_matches {
        let record = generate_match(&mut rng, &pace, &pool, arg, i + 1);
        if (i + 1) % 10 == 0 || i + 1 == arg.num_matches {
            eprintln!("Generated {}/{} matches", i + 1, arg.num_matches);
        }
        collection.matches.push(record);
    }

    Output::save_json(&collection, arg.output.as_deref())
}

fn generate_match<R>(
    rng: &mut R,
    pace: &Normal<f64>,
    pool: &[PlayerId],
    arg: &GenerateMatchesArg,
    number: usize,
) -> MatchRecord
where
    R: Rng,
{
    let match_id = MatchId::from(format!("match-{number:04}"));
    let length = rng.random_range(arg.max_turns / 2..=arg.max_turns);

    let mut players = vec![];
    let mut observations = vec![];
    for player_index in index::sample(rng, pool.len(), arg.players_per_match) {
        let player_id = pool[player_index].clone();
        let civilization =
            Civilization::from(CIVILIZATIONS[rng.random_range(0..CIVILIZATIONS.len())]);
        let last_turn = if rng.random_bool(DROP_OUT_PROBABILITY) {
            rng.random_range(1..=length)
        } else {
            length
        };
        let laws_per_turn = pace.sample(rng).max(MIN_PACE);

        observations.extend(
            player_timeline(rng, laws_per_turn, last_turn)
                .into_iter()
                .map(|(turn_number, counter_value)| TurnObservation {
                    match_id: match_id.clone(),
                    player_id: player_id.clone(),
                    turn_number,
                    counter_value,
                }),
        );
        players.push(PlayerEntry {
            player_id,
            civilization,
        });
    }
    observations.sort_by_key(|o| o.turn_number);

    MatchRecord {
        match_id,
        players,
        observations,
    }
}

/// Irregularly spaced (turn, counter) samples whose counter never decreases.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn player_timeline<R>(rng: &mut R, laws_per_turn: f64, last_turn: u32) -> Vec<(u32, u32)>
where
    R: Rng,
{
    let mut samples = vec![];
    let mut turn = 1;
    let mut counter = 0;
    while turn <= last_turn {
        let noise = rng.random_range(-0.5..0.5);
        let expected = (laws_per_turn * f64::from(turn) + noise).max(0.0).floor() as u32;
        counter = counter.max(expected);
        samples.push((turn, counter));
        turn += rng.random_range(1..=MAX_OBSERVATION_GAP);
    }
    samples
}

#[cfg(test)]
mod tests {
    use lawrace_engine::{MilestoneExtractor, cumulative_collection};

    use super::*;
    use crate::util;

    fn arg() -> GenerateMatchesArg {
        GenerateMatchesArg {
            num_matches: 5,
            players_per_match: 3,
            max_turns: 60,
            seed: Some(7),
            output: None,
        }
    }

    fn generate(arg: &GenerateMatchesArg) -> Vec<MatchRecord> {
        let mut rng = Pcg32::seed_from_u64(arg.seed.unwrap());
        let pace = Normal::new(PACE_MEAN, PACE_STD_DEV).unwrap();
        let pool = (0..arg.players_per_match * 3)
            .map(|i| PlayerId::from(format!("p{i}")))
            .collect::<Vec<_>>();
        (1..=arg.num_matches)
            .map(|i| generate_match(&mut rng, &pace, &pool, arg, i))
            .collect()
    }

    #[test]
    fn test_timeline_is_monotonic() {
        let mut rng = Pcg32::seed_from_u64(1);
        let samples = player_timeline(&mut rng, 0.2, 50);
        assert_eq!(samples[0].0, 1);
        assert!(samples.iter().all(|&(turn, _)| turn <= 50));
        assert!(samples.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 <= w[1].1));
    }

    #[test]
    fn test_generated_matches_pass_integrity_checks() {
        let matches = generate(&arg());
        assert_eq!(matches.len(), 5);
        assert!(matches.iter().all(|m| m.players.len() == 3));

        let milestones = util::load_milestones(None).unwrap();
        MilestoneExtractor::new(milestones).extract(&matches).unwrap();
        cumulative_collection(&matches).unwrap();
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = generate(&arg());
        let b = generate(&arg());
        assert_eq!(a, b);
    }
}
