use comfy_table::{presets::UTF8_FULL, Cell, Table};
use tombola_draw::{CardGrid, Controls, DrawSession, Participant, RoundView, Winner};

// Nominal stage size the card grid is fitted to
const STAGE_WIDTH: f64 = 1200.0;
const STAGE_HEIGHT: f64 = 600.0;

pub const READY_TEXT: &str = "Ready to draw";

/// Winner cards laid out on the same grid the stage would use
pub fn winner_cards(winners: &[Winner]) -> Table {
    let grid = CardGrid::fit(winners.len(), STAGE_WIDTH, STAGE_HEIGHT);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    for chunk in winners.chunks(grid.cols) {
        let cells: Vec<Cell> = chunk
            .iter()
            .map(|winner| {
                let mut card = format!("{}\n{}", winner.name, winner.department);
                if let Some(prize) = &winner.prize {
                    card.push_str(&format!("\n* {}", prize));
                }
                Cell::new(card)
            })
            .collect();
        table.add_row(cells);
    }

    table
}

pub fn print_round(session: &DrawSession) {
    println!(
        "Round {} of {} ({} winners per round)",
        session.current_round(),
        session.total_rounds(),
        session.winners_per_round()
    );

    match session.current_view() {
        RoundView::Ready => println!("  {}", READY_TEXT),
        RoundView::Winners(winners) => println!("{}", winner_cards(winners)),
    }
}

/// A rolling frame on one line
pub fn frame_line(frame: &[&Participant]) -> String {
    frame
        .iter()
        .map(|p| format!("{} ({})", p.name(), p.department()))
        .collect::<Vec<_>>()
        .join("  |  ")
}

pub fn controls_line(controls: &Controls) -> String {
    let mut keys = Vec::new();
    if controls.can_start {
        keys.push("[space] draw");
    }
    if controls.can_previous {
        keys.push("[p] previous");
    }
    if controls.can_next {
        keys.push("[n] next");
    }
    if controls.can_draw_prizes {
        keys.push("[enter] prizes");
    }
    keys.push("[q] quit");
    keys.join("  ")
}
