use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};

/// Get a Command for fll-scoring
pub fn fll() -> Command {
    let mut cmd = cargo_bin_cmd!("fll-scoring");
    cmd.env_remove("FLL_SCORING_DB")
        .env_remove("FLL_SCORING_CHALLENGE")
        .env_remove("RUST_LOG")
        .env_remove("FLL_SCORING_LOG");
    cmd
}

pub const CHALLENGE: &str = r#"
title = "Test Challenge"

[performance]
max_score = 400
weight = 1.0

[[subjective]]
name = "project"
title = "Innovation Project"
weight = 1.0

[[subjective.goals]]
name = "research"
max = 20

[[subjective.goals]]
name = "innovation"
max = 20
"#;

/// Three teams in award group A / judging group J1. Team 3 has no scores;
/// team 2's fourth run is past the seeding rounds.
pub const DUMP: &str = r#"{
  "tournament": { "name": "Regional", "description": "Spring regional", "seeding_rounds": 3 },
  "teams": [
    { "team_number": 1, "team_name": "Gear Heads", "organization": "North School", "award_group": "A", "judging_group": "J1" },
    { "team_number": 2, "team_name": "Bricks", "organization": null, "award_group": "A", "judging_group": "J1" },
    { "team_number": 3, "team_name": "Late Starters", "organization": null, "award_group": "A", "judging_group": "J1" }
  ],
  "judges": [
    { "judge_id": "j1", "category": "project", "judging_group": "J1" }
  ],
  "performance": [
    { "team_number": 1, "run_number": 1, "computed_total": 200, "verified": true },
    { "team_number": 1, "run_number": 2, "computed_total": 300, "verified": true },
    { "team_number": 2, "run_number": 1, "computed_total": 250, "verified": true },
    { "team_number": 2, "run_number": 4, "computed_total": 399, "verified": true }
  ],
  "subjective": [
    { "category": "project", "team_number": 1, "judge": "j1", "computed_total": 30 },
    { "category": "project", "team_number": 2, "judge": "j1", "computed_total": 20 }
  ],
  "goals": [
    { "category": "project", "team_number": 1, "judge": "j1", "goal_name": "research", "goal_value": 15 },
    { "category": "project", "team_number": 1, "judge": "j1", "goal_name": "innovation", "goal_value": 15 }
  ]
}"#;

/// Paths of a scratch tournament setup
pub struct Fixture {
    pub db: PathBuf,
    pub challenge: PathBuf,
    pub dump: PathBuf,
}

impl Fixture {
    pub fn new(dir: &Path) -> Self {
        let challenge = dir.join("challenge.toml");
        let dump = dir.join("regional.json");
        fs::write(&challenge, CHALLENGE).unwrap();
        fs::write(&dump, DUMP).unwrap();
        Self {
            db: dir.join("scores.db"),
            challenge,
            dump,
        }
    }

    /// A command with `--db` and `--challenge` already set
    pub fn cmd(&self) -> Command {
        let mut cmd = fll();
        cmd.arg("--db")
            .arg(&self.db)
            .arg("--challenge")
            .arg(&self.challenge);
        cmd
    }

    /// Load the dump without recomputing
    pub fn load(&self) {
        self.cmd().arg("load").arg(&self.dump).assert().success();
    }

    pub fn load_and_recompute(&self) {
        self.cmd()
            .arg("load")
            .arg(&self.dump)
            .arg("--recompute")
            .assert()
            .success();
    }
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
