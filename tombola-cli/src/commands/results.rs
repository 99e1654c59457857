use super::Context;
use crate::display::{controls_line, print_round};
use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;
use std::path::PathBuf;
use tombola_draw::sheet::{self, export::NO_PRIZE};
use tombola_draw::RoundState;

#[derive(Serialize)]
struct ResultLine<'a> {
    round: u32,
    name: &'a str,
    department: &'a str,
    prize: Option<&'a str>,
}

pub fn show_roster(ctx: &Context) -> Result<()> {
    let participants = ctx.session.participants();
    if participants.is_empty() {
        println!("No roster imported yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Name", "Department", "Won"]);

    for (index, participant) in participants.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            participant.name().to_string(),
            participant.department().to_string(),
            if participant.has_won() { "yes" } else { "" }.to_string(),
        ]);
    }

    println!("{}", table);
    println!(
        "{} participants, {} still eligible",
        participants.len(),
        ctx.session.available_count()
    );
    Ok(())
}

pub fn show_status(ctx: &Context) -> Result<()> {
    let session = &ctx.session;

    println!("Session: {}", session.id());
    println!(
        "Roster: {} participants, {} still eligible",
        session.participants().len(),
        session.available_count()
    );
    println!();

    let mut rounds = Table::new();
    rounds.load_preset(UTF8_FULL);
    rounds.set_header(vec!["Round", "State", "Winners"]);
    for round in 1..=session.total_rounds() {
        let state = match session.round_state(round) {
            RoundState::Drawn => "drawn",
            RoundState::NotDrawn => "not drawn",
        };
        let marker = if round == session.current_round() { " <" } else { "" };
        rounds.add_row(vec![
            format!("{}{}", round, marker),
            state.to_string(),
            session.winners(round).len().to_string(),
        ]);
    }
    println!("{}", rounds);

    let prizes = session.prizes();
    if !prizes.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Prize", "Remaining", "Count"]);
        for prize in prizes.prizes() {
            table.add_row(vec![
                prize.name().to_string(),
                prize.remaining().to_string(),
                prize.count().to_string(),
            ]);
        }
        println!("{}", table);
    }

    println!();
    print_round(session);
    println!("{}", controls_line(&session.controls()));
    Ok(())
}

pub fn show_results(ctx: &Context, json: bool) -> Result<()> {
    if json {
        let lines: Vec<ResultLine<'_>> = ctx
            .session
            .results()
            .into_iter()
            .map(|row| ResultLine {
                round: row.round,
                name: &row.winner.name,
                department: &row.winner.department,
                prize: row.winner.prize.as_deref(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    let history = ctx.session.history();
    if history.is_empty() {
        println!("No winners recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Round", "Name", "Department", "Prize"]);

    for (round, winners) in history {
        for winner in winners {
            table.add_row(vec![
                round.to_string(),
                winner.name.clone(),
                winner.department.clone(),
                winner.prize.clone().unwrap_or_else(|| NO_PRIZE.to_string()),
            ]);
        }
    }

    println!("{}", table);
    Ok(())
}

pub fn export_results(ctx: &Context, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| {
        PathBuf::from(sheet::default_export_name(chrono::Local::now().date_naive()))
    });

    let rows = sheet::export_results(&ctx.session, &path)?;
    println!("Exported {} winners to {}", rows, path.display());
    Ok(())
}
