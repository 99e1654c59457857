use super::Context;
use crate::display::{frame_line, print_round, winner_cards};
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};
use tombola_draw::{PrizeAward, RollingDraw, Winner};

/// Redraw interval of the rolling names
pub const ROLL_TICK: Duration = Duration::from_millis(50);

/// Frame timer for the rolling names. Ticks missed while idle collapse
/// into one, then the 50 ms rhythm restarts from there.
pub fn roll_ticker() -> Interval {
    let mut ticker = tokio::time::interval(ROLL_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

#[derive(Subcommand)]
pub enum RoundCommands {
    /// Go to the next round
    Next,
    /// Go back to the previous round
    Prev,
    /// Jump to a round
    Goto {
        /// Round number, starting at 1
        round: u32,
    },
    /// Show the current round
    Show,
}

pub async fn draw_round(ctx: &mut Context, roll_ms: u64) -> Result<()> {
    let rolling = ctx.session.begin_draw()?;
    roll_for(&rolling, Duration::from_millis(roll_ms)).await?;

    let winners = stop_draw(ctx).await?;
    announce_winners(rolling.round(), &winners);
    Ok(())
}

/// Record the current round's winners and persist them
pub async fn stop_draw(ctx: &mut Context) -> Result<Vec<Winner>> {
    let winners = ctx.session.draw_round(&mut rand::thread_rng())?;
    ctx.save().await?;
    Ok(winners)
}

pub async fn draw_prizes(ctx: &mut Context) -> Result<()> {
    let awards = award_prizes(ctx).await?;
    announce_prizes(&awards);
    print_round(&ctx.session);
    Ok(())
}

pub async fn award_prizes(ctx: &mut Context) -> Result<Vec<PrizeAward>> {
    let awards = ctx.session.draw_prizes(&mut rand::thread_rng())?;
    ctx.save().await?;
    Ok(awards)
}

pub async fn handle_round_command(cmd: RoundCommands, ctx: &mut Context) -> Result<()> {
    match cmd {
        RoundCommands::Next => {
            ctx.session.next_round()?;
        }
        RoundCommands::Prev => {
            ctx.session.previous_round()?;
        }
        RoundCommands::Goto { round } => {
            ctx.session.go_to_round(round)?;
        }
        RoundCommands::Show => {
            print_round(&ctx.session);
            return Ok(());
        }
    }

    ctx.save().await?;
    print_round(&ctx.session);
    Ok(())
}

/// Show rolling frames until `duration` elapses
async fn roll_for(rolling: &RollingDraw, duration: Duration) -> Result<()> {
    let mut ticker = roll_ticker();
    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = ticker.tick() => show_frame(rolling)?,
        }
    }

    println!();
    Ok(())
}

pub fn show_frame(rolling: &RollingDraw) -> Result<()> {
    let line = frame_line(&rolling.frame(&mut rand::thread_rng()));

    let mut stdout = std::io::stdout();
    write!(stdout, "\r\x1b[2K{}", line)?;
    stdout.flush()?;
    Ok(())
}

pub fn announce_winners(round: u32, winners: &[Winner]) {
    println!("Round {} winners:", round);
    println!("{}", winner_cards(winners));
}

pub fn announce_prizes(awards: &[PrizeAward]) {
    if awards.is_empty() {
        println!("No prizes left to hand out.");
        return;
    }

    for award in awards {
        println!("  {} receives {}", award.winner, award.prize);
    }
}
