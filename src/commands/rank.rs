//! `fll-scoring rank` command - competition ranks within groups

use serde_json::json;

use crate::cli::Cli;
use crate::commands::format::{
    output_by_format_result, print_json_status, print_records_header, warn_if_stale,
};
use fll_scoring_core::config::WinnerCriteria;
use fll_scoring_core::db::{Database, GroupRanking, RankedTeam, Tournament};
use fll_scoring_core::error::Result;
use fll_scoring_core::format::format_score;
use fll_scoring_core::ranking::{CategoryRank, Grouping, RankCategory};
use fll_scoring_core::records::record_value;

/// What to rank and how
#[derive(Debug, Clone)]
pub struct RankOptions {
    pub category: RankCategory,
    pub grouping: Grouping,
    pub winner: WinnerCriteria,
    /// Report a single team instead of every group
    pub team: Option<i32>,
    /// Show the quartile column
    pub quartiles: bool,
}

/// Execute the rank command
pub fn execute(
    cli: &Cli,
    db: &Database,
    tournament: &Tournament,
    options: &RankOptions,
) -> Result<()> {
    let stale = warn_if_stale(cli, db, tournament)?;

    match options.team {
        Some(team) => execute_team(cli, db, tournament, options, team, stale),
        None => execute_groups(cli, db, tournament, options, stale),
    }
}

fn execute_team(
    cli: &Cli,
    db: &Database,
    tournament: &Tournament,
    options: &RankOptions,
    team: i32,
    stale: bool,
) -> Result<()> {
    let rank = db.rank_team(
        tournament.id,
        team,
        &options.category,
        options.grouping,
        options.winner,
    )?;
    let category = options.category.name();

    output_by_format_result!(cli.format,
        json => print_json_status(
            "ok",
            None,
            &[
                ("tournament", json!(tournament.name)),
                ("category", json!(category)),
                ("grouping", json!(options.grouping)),
                ("team_number", json!(team)),
                ("rank", json!(rank.rank_value())),
                ("group_size", json!(group_size(&rank))),
                ("quartile", json!(quartile_number(&rank, options.quartiles))),
                ("stale", json!(stale)),
            ],
        ),
        human => {
            let mut line = format!("Team {} {}: {} in {}", team, category, rank, options.grouping);
            if options.quartiles {
                if let Some(quartile) = rank.quartile() {
                    line.push_str(&format!(" ({})", quartile));
                }
            }
            println!("{}", line);
        },
        records => {
            print_records_header(
                "rank",
                &[
                    ("tournament", tournament.name.as_str()),
                    ("category", category),
                    ("grouping", grouping_key(options.grouping)),
                    ("stale", if stale { "true" } else { "false" }),
                ],
            );
            println!("{}", rank_record(None, team, None, &rank, options.quartiles));
        }
    )
}

fn execute_groups(
    cli: &Cli,
    db: &Database,
    tournament: &Tournament,
    options: &RankOptions,
    stale: bool,
) -> Result<()> {
    let groups = db.rank_category(
        tournament.id,
        &options.category,
        options.grouping,
        options.winner,
    )?;
    let category = options.category.name();

    output_by_format_result!(cli.format,
        json => print_json_status(
            "ok",
            None,
            &[
                ("tournament", json!(tournament.name)),
                ("category", json!(category)),
                ("grouping", json!(options.grouping)),
                ("stale", json!(stale)),
                ("groups", groups_json(&groups, options.quartiles)),
            ],
        ),
        human => {
            print_human(&groups, category, options);
        },
        records => {
            print_records_header(
                "rank",
                &[
                    ("tournament", tournament.name.as_str()),
                    ("category", category),
                    ("grouping", grouping_key(options.grouping)),
                    ("stale", if stale { "true" } else { "false" }),
                ],
            );
            for group in &groups {
                for team in &group.teams {
                    println!(
                        "{}",
                        rank_record(
                            Some(&group.group),
                            team.team_number,
                            Some(team),
                            &team.rank,
                            options.quartiles
                        )
                    );
                }
            }
        }
    )
}

fn grouping_key(grouping: Grouping) -> &'static str {
    match grouping {
        Grouping::AwardGroup => "award",
        Grouping::JudgingGroup => "judging",
    }
}

fn group_size(rank: &CategoryRank) -> Option<u32> {
    match rank {
        CategoryRank::Ranked { group_size, .. } => Some(*group_size),
        CategoryRank::NoShow => None,
    }
}

fn quartile_number(rank: &CategoryRank, quartiles: bool) -> Option<u8> {
    if !quartiles {
        return None;
    }
    rank.quartile().map(|q| q.number())
}

fn groups_json(groups: &[GroupRanking], quartiles: bool) -> serde_json::Value {
    let groups: Vec<serde_json::Value> = groups
        .iter()
        .map(|group| {
            let teams: Vec<serde_json::Value> = group
                .teams
                .iter()
                .map(|team| {
                    json!({
                        "team_number": team.team_number,
                        "team_name": team.team_name,
                        "score": team.score,
                        "rank": team.rank.rank_value(),
                        "group_size": group_size(&team.rank),
                        "quartile": quartile_number(&team.rank, quartiles),
                    })
                })
                .collect();
            json!({ "group": group.group, "teams": teams })
        })
        .collect();
    json!(groups)
}

fn print_human(groups: &[GroupRanking], category: &str, options: &RankOptions) {
    if groups.is_empty() {
        println!("No registered teams");
        return;
    }

    for group in groups {
        println!("{} {} ({})", options.grouping, group.group, category);
        for team in &group.teams {
            let score = team.score.map(format_score).unwrap_or_else(|| "-".to_string());
            let rank = match team.rank {
                CategoryRank::Ranked { rank, .. } => rank.to_string(),
                CategoryRank::NoShow => "No Show".to_string(),
            };
            let mut line = format!(
                "  {:>7}  {:>6}  {:<28} {:>10}",
                rank, team.team_number, team.team_name, score
            );
            if options.quartiles {
                if let Some(quartile) = team.quartile {
                    line.push_str(&format!("  {}", quartile));
                }
            }
            println!("{}", line.trim_end());
        }
    }
}

fn rank_record(
    group: Option<&str>,
    team_number: i32,
    team: Option<&RankedTeam>,
    rank: &CategoryRank,
    quartiles: bool,
) -> String {
    let mut parts = vec!["R".to_string()];
    if let Some(group) = group {
        parts.push(format!("group={}", record_value(group)));
    }
    parts.push(format!("team={}", team_number));
    if let Some(team) = team {
        parts.push(format!("name={}", record_value(&team.team_name)));
        if let Some(score) = team.score {
            parts.push(format!("score={}", format_score(score)));
        }
    }
    parts.push(format!("rank={}", rank.rank_value()));
    if let Some(size) = group_size(rank) {
        parts.push(format!("group_size={}", size));
    }
    if let Some(quartile) = quartile_number(rank, quartiles) {
        parts.push(format!("quartile={}", quartile));
    }
    parts.join(" ")
}
