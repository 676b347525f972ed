//! Line-oriented terminal front end. Holds only a [`GameHandle`]; every
//! state change comes back through the controller's snapshot channel.

use anyhow::{Context, Result};
use game_core::GameHandle;
use shared::{
    domain::{HoleIndex, Screen, GRID_WIDTH},
    protocol::{HitOutcome, SessionSnapshot},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const DISPLAYED_HIGH_SCORES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Play,
    Restart,
    Hole(HoleIndex),
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "play" => Some(Input::Play),
        "r" | "restart" => Some(Input::Restart),
        "q" | "quit" | "exit" => Some(Input::Quit),
        "h" | "help" | "?" => Some(Input::Help),
        other => other
            .parse::<u8>()
            .ok()
            .and_then(|index| HoleIndex::new(index).ok())
            .map(Input::Hole),
    }
}

pub fn render(snapshot: &SessionSnapshot) -> String {
    match snapshot.screen {
        Screen::Welcome => render_welcome(snapshot),
        Screen::Playing => render_board(snapshot),
    }
}

fn render_welcome(snapshot: &SessionSnapshot) -> String {
    let top = snapshot.top_scores(DISPLAYED_HIGH_SCORES);
    let scores = if top.is_empty() {
        "  None yet... Play the game!\n".to_string()
    } else {
        top.iter().map(|score| format!("  {score}\n")).collect()
    };

    format!(
        "=== Whack a Mole ===\n\
         Welcome to Whack a Mole!\n\
         Whack a mole to earn points.\n\
         How many can you get?\n\
         \n\
         High Scores\n\
         {scores}\
         [p] play  [q] quit"
    )
}

fn render_board(snapshot: &SessionSnapshot) -> String {
    let mut out = format!(
        "=== Whack a Mole ===\nScore: {}   Time: {}s\n",
        snapshot.score, snapshot.time_left
    );
    for row in 0..GRID_WIDTH {
        let cells: Vec<String> = HoleIndex::all()
            .filter(|hole| hole.row() == row)
            .map(|hole| {
                if snapshot.has_mole(hole) {
                    "(M)".to_string()
                } else {
                    format!("[{hole}]")
                }
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out.push_str("[0-8] whack  [r] restart  [q] quit");
    out
}

fn help_text() -> &'static str {
    "commands: p = play, 0-8 = whack that hole, r = restart, q = quit"
}

pub async fn run(handle: GameHandle) -> Result<()> {
    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let initial = updates.borrow_and_update().clone();
    println!("{}", render(&initial));

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!("\n{}", render(&snapshot));
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read terminal input")? else {
                    break;
                };
                let Some(input) = parse_input(&line) else {
                    println!("{}", help_text());
                    continue;
                };
                debug!(?input, "terminal input");
                match input {
                    Input::Play => {
                        handle.start_game().await.context("failed to start game")?;
                    }
                    Input::Restart => {
                        handle.restart_game().await.context("failed to restart game")?;
                    }
                    Input::Hole(hole) => {
                        let (outcome, _) = handle
                            .hit_hole(hole)
                            .await
                            .context("failed to whack hole")?;
                        match outcome {
                            HitOutcome::Hit => {}
                            HitOutcome::Miss => println!("No mole in hole {hole}."),
                            HitOutcome::Inactive => println!("Press p to play."),
                        }
                    }
                    Input::Help => println!("{}", help_text()),
                    Input::Quit => break,
                }
            }
        }
    }

    Ok(())
}
