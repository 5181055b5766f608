use refika_core::model::PairId;
use services::LoadedGame;
use services::matching::{MatchEvent, MatchingSession, Round};

use crate::input::{Input, Terminal};

const HELP: &str = "commands: l <n> pick left, r <n> pick right, restart, quit";

pub async fn run(loaded: LoadedGame) -> std::io::Result<()> {
    let LoadedGame {
        title, mut session, ..
    } = loaded;
    let mut terminal = Terminal::stdin();

    println!("{title}");
    println!("{HELP}");
    render(&session);

    loop {
        let events = match terminal.read().await? {
            Input::Left(n) => match pick(session.round(), n, Round::left_order) {
                Some(id) => session.select_left(id),
                None => continue,
            },
            Input::Right(n) => match pick(session.round(), n, Round::right_order) {
                Some(id) => session.select_right(id),
                None => continue,
            },
            Input::Restart => session.restart(),
            Input::Quit => return Ok(()),
            Input::Help | Input::Next | Input::Choice(_) | Input::Unknown => {
                println!("{HELP}");
                continue;
            }
        };
        report(&events);

        // Input stays locked until the scheduled transition lands.
        if let Some(deferred) = session.pending() {
            tokio::time::sleep(deferred.delay()).await;
            report(&session.resolve(deferred));
        }

        if session.status().is_terminal() {
            let progress = session.progress();
            if progress.is_all_matched() {
                println!("all {} pairs matched", progress.total);
            }
            println!("type restart or quit");
        } else {
            render(&session);
        }
    }
}

fn pick(round: Option<&Round>, position: usize, column: fn(&Round) -> &[PairId]) -> Option<PairId> {
    let round = round?;
    column(round).get(position.checked_sub(1)?).copied()
}

fn render(session: &MatchingSession) {
    let Some(round) = session.round() else {
        return;
    };
    let progress = session.progress();
    println!(
        "round {}/{}  matched {}/{}",
        progress.round, progress.rounds_total, progress.completed, progress.total
    );

    let left: Vec<_> = round.left_column().collect();
    let right: Vec<_> = round.right_column().collect();
    let width = left.iter().map(|(_, text)| text.chars().count()).max().unwrap_or(0);

    for (row, ((left_id, left_text), (right_id, right_text))) in
        left.iter().zip(right.iter()).enumerate()
    {
        let left_mark = if session.is_matched(*left_id) {
            '='
        } else if session.selected_left() == Some(*left_id) {
            '>'
        } else {
            ' '
        };
        let right_mark = if session.is_matched(*right_id) { '=' } else { ' ' };
        println!(
            "{n:>2} {left_mark} {left_text:<width$}   {n:>2} {right_mark} {right_text}",
            n = row + 1
        );
    }
}

fn report(events: &[MatchEvent]) {
    for event in events {
        match event {
            MatchEvent::PairMatched { completed, .. } => println!("match! ({completed} done)"),
            MatchEvent::RoundComplete { round } => println!("round {} cleared", round + 1),
            MatchEvent::Mismatch { .. } => println!("not a pair..."),
            MatchEvent::Won { .. } => println!("you won!"),
            MatchEvent::Lost { completed } => println!("game over after {completed} pairs"),
            MatchEvent::RoundChanged { .. } | MatchEvent::LeftSelected { .. } => {}
        }
    }
}
