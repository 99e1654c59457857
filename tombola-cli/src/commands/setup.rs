use super::{confirm, Context};
use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::Path;
use tombola_draw::{DrawSettings, PrizeSpec};

#[derive(Args)]
pub struct SettingsArgs {
    /// Number of rounds
    #[arg(short, long)]
    rounds: Option<u32>,
    /// Winners drawn per round
    #[arg(short, long)]
    winners: Option<u32>,
    /// Prize as NAME=COUNT (repeatable, replaces the prize list)
    #[arg(short, long = "prize")]
    prizes: Vec<String>,
    /// Remove every prize
    #[arg(long, conflicts_with = "prizes")]
    clear_prizes: bool,
    /// Skip confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

impl SettingsArgs {
    fn is_empty(&self) -> bool {
        self.rounds.is_none() && self.winners.is_none() && self.prizes.is_empty() && !self.clear_prizes
    }
}

pub async fn import_roster(ctx: &mut Context, file: &Path, yes: bool) -> Result<()> {
    if ctx.session.has_results()
        && !confirm(
            "Importing a new roster clears every round's results. Continue?",
            yes,
        )?
    {
        println!("Import cancelled.");
        return Ok(());
    }

    // a failed import leaves the stored session untouched
    let imported = tombola_draw::import_workbook(&mut ctx.session, file).with_context(|| {
        format!(
            "Could not import {}, the previous roster was kept",
            file.display()
        )
    })?;
    ctx.save().await?;

    match &imported.prizes {
        Some(prizes) => println!(
            "Imported {} participants and {} prizes from {}",
            imported.participants.len(),
            prizes.len(),
            file.display()
        ),
        None => println!(
            "Imported {} participants from {}",
            imported.participants.len(),
            file.display()
        ),
    }

    Ok(())
}

pub async fn handle_settings(ctx: &mut Context, args: SettingsArgs) -> Result<()> {
    if args.is_empty() {
        print_settings(&ctx.session.settings());
        return Ok(());
    }

    let current = ctx.session.settings();
    let prizes = if args.clear_prizes {
        Vec::new()
    } else if args.prizes.is_empty() {
        current.prizes.clone()
    } else {
        args.prizes
            .iter()
            .map(|spec| parse_prize(spec))
            .collect::<Result<Vec<_>>>()?
    };

    let settings = DrawSettings::new(
        args.rounds.unwrap_or(current.total_rounds),
        args.winners.unwrap_or(current.winners_per_round),
    )
    .with_prizes(prizes);
    settings.validate()?;

    if ctx.session.requires_confirmation()
        && !confirm(
            "Saving these settings clears every round's results. Continue?",
            args.yes,
        )?
    {
        println!("Settings unchanged.");
        return Ok(());
    }

    ctx.session.save_settings(settings)?;
    ctx.save().await?;

    println!("Settings saved, all rounds reset.");
    print_settings(&ctx.session.settings());
    Ok(())
}

pub async fn clear_data(ctx: &mut Context, yes: bool) -> Result<()> {
    if !confirm(
        "Delete all draw data, results and uploaded media? This action cannot be undone.",
        yes,
    )? {
        println!("Nothing deleted.");
        return Ok(());
    }

    ctx.store.clear().await?;
    ctx.session = tombola_draw::DrawSession::new();

    println!("All draw data deleted.");
    Ok(())
}

fn print_settings(settings: &DrawSettings) {
    println!("Rounds: {}", settings.total_rounds);
    println!("Winners per round: {}", settings.winners_per_round);

    if settings.prizes.is_empty() {
        println!("Prizes: none");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Prize", "Count"]);
    for prize in &settings.prizes {
        table.add_row(vec![prize.name.clone(), prize.count.to_string()]);
    }
    println!("{}", table);
}

/// `NAME=COUNT`, or just `NAME` for a single item
fn parse_prize(spec: &str) -> Result<PrizeSpec> {
    let (name, count) = match spec.rsplit_once('=') {
        Some((name, count)) => {
            let count = count
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("Invalid prize count in '{}'", spec))?;
            (name.trim(), count)
        }
        None => (spec.trim(), 1),
    };

    if name.is_empty() {
        return Err(anyhow!("Prize name cannot be empty: '{}'", spec));
    }
    if count == 0 {
        return Err(anyhow!("Prize count must be at least 1: '{}'", spec));
    }

    Ok(PrizeSpec::new(name, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tombola_core::MemoryStore;
    use tombola_draw::{DrawError, DrawSession, Participant, SessionStore};

    fn context_with_roster() -> Context {
        let mut session = DrawSession::new();
        session
            .replace_roster(vec![
                Participant::new("Ana", None),
                Participant::new("Bo", None),
            ])
            .unwrap();

        Context::new(SessionStore::new(Arc::new(MemoryStore::new())), session)
    }

    #[tokio::test]
    async fn test_failed_import_keeps_roster() {
        let mut ctx = context_with_roster();
        let missing = Path::new("/nonexistent/roster.xlsx");

        let err = import_roster(&mut ctx, missing, true).await.unwrap_err();

        assert!(format!("{:#}", err).contains("the previous roster was kept"));
        assert!(matches!(
            err.downcast_ref::<DrawError>(),
            Some(DrawError::Import(_))
        ));
        assert_eq!(ctx.session.participants().len(), 2);
        assert!(ctx.store.load().await.unwrap().is_none());
    }

    #[test]
    fn test_parse_prize() {
        assert_eq!(parse_prize("Laptop=2").unwrap(), PrizeSpec::new("Laptop", 2));
        assert_eq!(parse_prize(" Mug ").unwrap(), PrizeSpec::new("Mug", 1));
        assert_eq!(
            parse_prize("A=B=3").unwrap(),
            PrizeSpec::new("A=B", 3)
        );
        assert!(parse_prize("=2").is_err());
        assert!(parse_prize("Mug=0").is_err());
        assert!(parse_prize("Mug=many").is_err());
    }
}
