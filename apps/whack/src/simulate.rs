//! Headless run over a [`GameSession`] with ticks applied by hand instead of
//! a wall clock.

use game_core::{GameSession, TickOutcome};
use shared::protocol::SessionSnapshot;
use tracing::info;

use crate::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationPlan {
    pub hits: u32,
    pub ticks: u32,
    pub restart: bool,
}

pub fn run(settings: &Settings, plan: SimulationPlan) -> SessionSnapshot {
    let mut session = GameSession::new(settings.session_config(), settings.rng());
    session.start_game();

    for _ in 0..plan.hits {
        session.whack_mole();
    }

    let mut elapsed = 0;
    while elapsed < plan.ticks {
        elapsed += 1;
        if session.tick() == TickOutcome::Expired {
            break;
        }
    }

    if plan.restart {
        session.restart_game();
    }

    info!(
        hits = plan.hits,
        ticks = elapsed,
        score = session.score(),
        "simulation finished"
    );
    session.snapshot()
}
