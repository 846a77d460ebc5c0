#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::{
    fmt::Write,
    io::{stdin, stdout},
};

use rustc_hash::FxHashMap;
use spherical_chess::{
    action::{Action, Lan},
    board::Board,
    board_display::BoardDisplay,
    coord::Coord,
    fuzz::fuzz,
    layout::Layout,
    state::State,
    team::Team,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn legal_actions(board: &Board) -> FxHashMap<Lan, Action> {
    let team = board.current_team_turn();
    let positions: Vec<Coord> = board
        .pieces()
        .filter(|(_, piece)| piece.team == team)
        .map(|(position, _)| position)
        .collect();
    positions
        .into_iter()
        .flat_map(|position| board.legal_actions(position))
        .map(|action| (action.as_lan(), action))
        .collect()
}
/// The arguments following `command`, when `input` starts with that exact
/// word.
fn command_arguments<'a>(input: &'a str, command: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(command)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}
fn run_fuzz(arguments: &str) {
    let mut arguments = arguments.split_whitespace();
    let plies = match arguments.next().map(str::parse::<usize>) {
        Some(Ok(plies)) => plies,
        Some(Err(err)) => {
            eprintln!("Error: {err}");
            return;
        }
        None => {
            eprintln!("Error: missing ply count");
            return;
        }
    };
    let seed = match arguments.next().map(str::parse::<u64>) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            eprintln!("Error: {err}");
            return;
        }
        None => rand::random(),
    };
    match fuzz(seed, plies) {
        Ok(report) => println!(
            "seed {seed}: {} plies, {} checkmates, {} stalemates",
            report.plies, report.checkmates, report.stalemates
        ),
        Err(err) => {
            error!(seed, "fuzzing failed");
            eprintln!("seed {seed}: {err}");
        }
    }
}
#[allow(
    clippy::too_many_lines,
    reason = "the state and procedure are very clearly defined; no need to decompose these into separate functions"
)]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut board = Board::starting_position();
    let mut info = String::new();
    let mut highlighted = Vec::new();
    let mut legal = FxHashMap::default();
    let mut update = true;
    let mut view = Team::White;
    let mut first_time = true;
    loop {
        if update {
            legal = legal_actions(&board);
            info.clear();
            let team = board.current_team_turn();
            let state = board.current_team_state();
            match state {
                State::Playing => writeln!(&mut info, "{team} plays").unwrap(),
                State::Check => writeln!(&mut info, "{team} plays, in check").unwrap(),
                State::Checkmate | State::Stalemate => {
                    writeln!(&mut info, "{team} is in {state}").unwrap();
                }
            }
            if let Some(action) = board.last_action() {
                writeln!(&mut info, "last: {action}").unwrap();
            }
        }
        if first_time {
            writeln!(&mut info, "type `help` for instructions").unwrap();
            first_time = false;
        }
        update = false;
        print!(
            "{}",
            BoardDisplay {
                board: &board,
                view,
                highlighted: &highlighted,
                info: &info,
            },
        );
        loop {
            print!("> ");
            {
                use std::io::Write;
                stdout().flush().unwrap();
            }
            let mut input = String::new();
            if stdin().read_line(&mut input).unwrap() == 0 {
                return;
            }

            let input = input.trim();
            if input == "help" {
                println!("flip                 - flip the board");
                println!("import <layout>      - import a position");
                println!("layout               - export the position");
                println!("reset                - reset to starting position");
                println!("fuzz <plies> [seed]  - check the rules with random self-play");
                println!("exit                 - exit the game");
                println!("e2                   - view legal destinations");
                println!("e2e4                 - play the action");
                println!("e1g1                 - perform castling");
            } else if input.is_empty() {
                continue;
            } else if input == "reset" {
                board = Board::starting_position();
                update = true;
                highlighted.clear();
            } else if input == "exit" {
                return;
            } else if input == "flip" {
                view = !view;
            } else if input == "layout" {
                println!("{}", Layout::from_board(&board));
                continue;
            } else if let Some(layout) = command_arguments(input, "import") {
                board = match layout.parse::<Layout>() {
                    Ok(layout) => layout.into_board(),
                    Err(err) => {
                        eprintln!("Error: {err}");
                        continue;
                    }
                };
                update = true;
                highlighted.clear();
            } else if let Some(arguments) = command_arguments(input, "fuzz") {
                run_fuzz(arguments);
                continue;
            } else if let Ok(position) = input.parse::<Coord>() {
                highlighted.clear();
                highlighted.extend(
                    legal
                        .keys()
                        .filter(|lan| lan.origin == position)
                        .map(|lan| lan.destination),
                );
            } else {
                let lan: Lan = match input.parse() {
                    Ok(lan) => lan,
                    Err(err) => {
                        eprintln!("Error: {err}");
                        continue;
                    }
                };
                let Some(action) = legal.get(&lan) else {
                    eprintln!("Error: {input} is not a legal action");
                    continue;
                };
                let state = board.apply_action_if_valid(action);
                debug!(%action, %state, "played");
                highlighted.clear();
                highlighted.push(lan.origin);
                highlighted.push(lan.destination);
                update = true;
            }
            break;
        }
    }
}

#[cfg(test)]
mod test {
    use crate::command_arguments;

    #[test]
    fn commands_match_whole_words() {
        assert_eq!(command_arguments("fuzz", "fuzz"), Some(""));
        assert_eq!(command_arguments("fuzz 400 7", "fuzz"), Some("400 7"));
        assert_eq!(command_arguments("fuzzy", "fuzz"), None);
        assert_eq!(command_arguments("fuzz3", "fuzz"), None);
        assert_eq!(
            command_arguments("import 4k3/8/8/8/8/8/8/4K3 w", "import"),
            Some("4k3/8/8/8/8/8/8/4K3 w")
        );
        assert_eq!(command_arguments("e2e4", "import"), None);
    }
}
