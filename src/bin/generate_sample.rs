//! Writes a synthetic `epl_player_stats_24_25.csv` with the same columns as
//! the real dataset, so the dashboard can be tried without it.

use anyhow::{Context, Result};

const CLUBS: [&str; 8] = [
    "Arsenal",
    "Chelsea",
    "Everton",
    "Liverpool",
    "Manchester City",
    "Manchester United",
    "Newcastle United",
    "Tottenham Hotspur",
];

const POSITIONS: [(&str, usize); 4] = [("GKP", 2), ("DEF", 6), ("MID", 6), ("FWD", 4)];

const HEADER: [&str; 22] = [
    "Player Name",
    "Club",
    "Nationality",
    "Position",
    "Appearances",
    "Minutes",
    "Goals",
    "Assists",
    "Shots",
    "Shots On Target",
    "Conversion %",
    "Big Chances Missed",
    "Hit Woodwork",
    "Offsides",
    "Passes",
    "Passes%",
    "Crosses",
    "Tackles",
    "Yellow Cards",
    "Red Cards",
    "Goals Conceded",
    "Saves %",
];

const NATIONALITIES: [&str; 6] = ["England", "France", "Brazil", "Spain", "Norway", "Egypt"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `0..=max`.
    fn upto(&mut self, max: u64) -> u64 {
        (self.next_f64() * (max + 1) as f64) as u64
    }
}

fn percent(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return String::new();
    }
    format!("{:.1}%", numerator as f64 * 100.0 / denominator as f64)
}

fn player_row(rng: &mut SimpleRng, name: String, club: &str, position: &str) -> Vec<String> {
    let attacking = match position {
        "FWD" => 1.0,
        "MID" => 0.55,
        "DEF" => 0.15,
        _ => 0.0,
    };
    let appearances = rng.upto(38);
    let minutes = appearances * (20 + rng.upto(70));
    let shots = (minutes as f64 / 90.0 * attacking * (1.0 + 2.5 * rng.next_f64())) as u64;
    let on_target = shots * (30 + rng.upto(25)) / 100;
    let goals = on_target * (20 + rng.upto(30)) / 100;
    let passes = minutes / 90 * (15 + rng.upto(45));
    let keeper = position == "GKP";
    let faced = if keeper { minutes / 90 * (3 + rng.upto(3)) } else { 0 };
    let saves = faced * (55 + rng.upto(25)) / 100;

    vec![
        name,
        club.to_string(),
        NATIONALITIES[rng.upto(5) as usize].to_string(),
        position.to_string(),
        appearances.to_string(),
        minutes.to_string(),
        goals.to_string(),
        (rng.upto(goals + 3) * u64::from(!keeper)).to_string(),
        shots.to_string(),
        on_target.to_string(),
        percent(goals, shots),
        (shots / 8).to_string(),
        rng.upto(u64::from(shots > 20) * 3).to_string(),
        (shots / 10).to_string(),
        passes.to_string(),
        percent(passes * (70 + rng.upto(22)) / 100, passes),
        (minutes / 90 * rng.upto(3)).to_string(),
        (minutes / 90 * rng.upto(2)).to_string(),
        rng.upto(appearances / 4).to_string(),
        rng.upto(u64::from(appearances > 30)).to_string(),
        if keeper { (faced - saves).to_string() } else { String::new() },
        if keeper { percent(saves, faced) } else { String::new() },
    ]
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "epl_player_stats_24_25.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let mut rows = 0usize;
    for club in CLUBS {
        for (position, count) in POSITIONS {
            for n in 1..=count {
                let name = format!("{club} {position} {n}");
                writer.write_record(player_row(&mut rng, name, club, position))?;
                rows += 1;
            }
        }
    }
    writer.flush()?;

    println!("Wrote {rows} players from {} clubs to {output_path}", CLUBS.len());
    Ok(())
}
