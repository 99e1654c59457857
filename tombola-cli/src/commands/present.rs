use super::draw::{announce_prizes, announce_winners, award_prizes, roll_ticker, show_frame, stop_draw};
use super::Context;
use crate::display::{controls_line, print_round};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tombola_draw::{Action, RollingDraw};

/// Interactive presenter. Each input line is one key: a line of spaces
/// (or `s`) starts and stops the draw, an empty line hands out prizes,
/// `p` / `n` move between rounds and `q` quits.
pub async fn present(ctx: &mut Context) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = roll_ticker();
    let mut rolling: Option<RollingDraw> = None;

    print_round(&ctx.session);
    println!("{}", controls_line(&ctx.session.controls()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                let action = match line.parse::<Action>() {
                    Ok(action) => action,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                if !action.is_enabled(&ctx.session.controls(), rolling.is_some()) {
                    println!("Not available right now.");
                    continue;
                }

                if action == Action::Quit {
                    break;
                }

                let was_rolling = rolling.is_some();
                if let Err(e) = apply(ctx, action, &mut rolling).await {
                    println!("{:#}", e);
                }
                if !was_rolling && rolling.is_some() {
                    ticker.reset();
                }

                if rolling.is_none() {
                    println!("{}", controls_line(&ctx.session.controls()));
                }
            }
            _ = ticker.tick(), if rolling.is_some() => {
                if let Some(rolling) = &rolling {
                    show_frame(rolling)?;
                }
            }
        }
    }

    if rolling.is_some() {
        println!();
        println!("Draw abandoned, round {} not recorded.", ctx.session.current_round());
    }

    Ok(())
}

async fn apply(ctx: &mut Context, action: Action, rolling: &mut Option<RollingDraw>) -> Result<()> {
    match action {
        Action::ToggleDraw => match rolling.take() {
            Some(stopped) => {
                println!();
                let winners = stop_draw(ctx).await?;
                announce_winners(stopped.round(), &winners);
            }
            None => {
                *rolling = Some(ctx.session.begin_draw()?);
            }
        },
        Action::PreviousRound => {
            ctx.session.previous_round()?;
            ctx.save().await?;
            print_round(&ctx.session);
        }
        Action::NextRound => {
            ctx.session.next_round()?;
            ctx.save().await?;
            print_round(&ctx.session);
        }
        Action::DrawPrizes => {
            let awards = award_prizes(ctx).await?;
            announce_prizes(&awards);
            print_round(&ctx.session);
        }
        Action::Quit => {}
    }

    Ok(())
}
