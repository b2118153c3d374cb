/*
Game: Wizard (Deluxe Edition)
Designer: Ken Fisher
BoardGameGeek: https://boardgamegeek.com/boardgame/1465/wizard

Terminal scorecard for the deluxe ruleset: tracks bids, trick counts and
scores round by round so nobody has to keep the pad and pencil.
*/

use std::io::{self, Write};

use colored::Colorize;
use rand::{thread_rng, Rng};

use game::model::{GameState, Phase, PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use game::reducer::{Action, GameMachine};
use game::selectors::{
    all_bids_valid, bidding_order, cumulative_scores, current_round, dealer_player, tricks_sum_ok,
};
use game::validation::{is_valid_bid, is_valid_tricks};
use store::{DebouncedSaver, Store, SAVE_DEBOUNCE};

pub mod game;
pub mod store;

fn main() {
    println!("{}", "Wizard Card Game".bold());
    println!("{}", "Deluxe Edition score tracker".yellow());

    let store = Store::new(".");
    let mut machine = GameMachine::new();
    // Restore is attempted exactly once, before the first user action
    if let Some(saved) = store.load() {
        println!("{}", "Resuming the saved scorecard.".green());
        machine.apply(Action::LoadGame { state: saved });
    }
    let saver = DebouncedSaver::spawn(store.clone(), SAVE_DEBOUNCE);

    loop {
        let quit = match machine.state().phase {
            Phase::Setup => {
                run_setup(&mut machine);
                false
            }
            Phase::Bidding => {
                run_bidding(&mut machine);
                false
            }
            // RoundComplete is reserved in the schema; render it like the
            // between-phases screen in case a snapshot ever carries it
            Phase::Playing | Phase::RoundComplete => {
                run_playing(&mut machine, &store);
                false
            }
            Phase::Scoring => {
                run_scoring(&mut machine);
                false
            }
            Phase::GameComplete => run_game_complete(&mut machine, &store),
        };
        saver.push(machine.state().clone());
        if quit {
            break;
        }
    }
}

fn prompt(label: &str) -> String {
    print!("{label} ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

// Anything that doesn't parse counts as "not yet entered"
fn parse_entry(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok()
}

fn confirm(label: &str) -> bool {
    matches!(
        prompt(&format!("{label} [y/N]")).to_lowercase().as_str(),
        "y" | "yes"
    )
}

fn run_setup(machine: &mut GameMachine) {
    println!("\n{}", "Set up the table".bold());
    let num_players = loop {
        let raw = prompt(&format!("Number of players ({MIN_PLAYERS}-{MAX_PLAYERS}):"));
        match parse_entry(&raw) {
            Some(count) if (MIN_PLAYERS..=MAX_PLAYERS).contains(&count) => break count,
            _ => println!(
                "{}",
                format!("Enter a count between {MIN_PLAYERS} and {MAX_PLAYERS}.").red()
            ),
        }
    };
    let mut names = Vec::new();
    for seat in 0..num_players {
        loop {
            let name = prompt(&format!("Name for seat {}:", seat + 1));
            if !name.is_empty() {
                names.push(name);
                break;
            }
            println!("{}", "Names can't be empty.".red());
        }
    }
    let first_dealer_seat_index = thread_rng().gen_range(0..num_players);
    machine.apply(Action::SetupGame {
        names,
        num_players,
        first_dealer_seat_index,
    });
    let state = machine.state();
    println!(
        "\n{} rounds to play. {} deals first.",
        state.max_rounds,
        dealer_name(state).yellow()
    );
}

fn dealer_name(state: &GameState) -> String {
    dealer_player(state)
        .map(|player| player.name.clone())
        .unwrap_or_default()
}

fn print_round_header(state: &GameState) {
    let Some(round) = current_round(state) else {
        return;
    };
    println!(
        "\n{}",
        format!(
            "Round {} of {} | {} card(s) each | {} deals",
            round.round_number,
            state.max_rounds,
            round.round_number,
            dealer_name(state)
        )
        .bold()
    );
}

fn print_scoreboard(state: &GameState) {
    if state.rounds.iter().all(|round| !round.finalized) {
        return;
    }
    let totals = cumulative_scores(state);
    let leader = totals.values().max().copied().unwrap_or(0);
    println!("{}", "Scoreboard".bold());
    let mut players: Vec<_> = state.players.iter().collect();
    players.sort_by_key(|player| player.seat_index);
    for player in players {
        let total = totals.get(&player.id).copied().unwrap_or(0);
        let line = format!("  {:<12} {:>5}", player.name, total);
        if total == leader {
            println!("{}", line.green());
        } else {
            println!("{line}");
        }
    }
}

fn run_bidding(machine: &mut GameMachine) {
    let state = machine.state().clone();
    print_round_header(&state);
    print_scoreboard(&state);
    let Some(round) = current_round(&state) else {
        return;
    };
    let round_number = round.round_number;
    let order: Vec<(PlayerId, String)> = bidding_order(&state)
        .iter()
        .map(|player| (player.id, player.name.clone()))
        .collect();

    println!("\n{}", "Bidding (dealer bids last)".bold());
    let mut total_bid = 0;
    for (player_id, name) in &order {
        loop {
            let bid = parse_entry(&prompt(&format!("{name} bids (0-{round_number}):")));
            machine.apply(Action::SetBid {
                player_id: *player_id,
                bid,
            });
            if is_valid_bid(bid, round_number) {
                total_bid += bid.unwrap_or(0);
                break;
            }
            println!(
                "{}",
                format!("A bid must be a whole number from 0 to {round_number}.").red()
            );
        }
    }
    println!("Total bid: {total_bid} for {round_number} trick(s) in play.");
    if all_bids_valid(machine.state()) && confirm("Confirm bids and play the round?") {
        machine.apply(Action::ConfirmBids);
    } else {
        println!("Bids stay open; enter them again.");
    }
}

fn run_playing(machine: &mut GameMachine, store: &Store) {
    let state = machine.state().clone();
    print_round_header(&state);
    if let Some(round) = current_round(&state) {
        for player in bidding_order(&state) {
            let bid = round.bids.get(&player.id).copied().flatten();
            println!(
                "  {:<12} bid {}",
                player.name,
                bid.map_or("-".to_string(), |bid| bid.to_string())
            );
        }
    }
    let answer =
        prompt("Play the round, then press Enter to score it (or type 'new' to start over):");
    if answer == "new" {
        try_new_game(machine, store);
    } else {
        machine.apply(Action::StartScoring);
    }
}

fn run_scoring(machine: &mut GameMachine) {
    let state = machine.state().clone();
    print_round_header(&state);
    let Some(round) = current_round(&state) else {
        return;
    };
    let round_number = round.round_number;
    println!(
        "\n{}",
        format!("Scoring: {round_number} trick(s) to account for").bold()
    );
    for player in bidding_order(&state) {
        let bid = round.bids.get(&player.id).copied().flatten();
        loop {
            let tricks = parse_entry(&prompt(&format!(
                "{} (bid {}) took how many tricks?",
                player.name,
                bid.map_or("-".to_string(), |bid| bid.to_string())
            )));
            machine.apply(Action::SetTricks {
                player_id: player.id,
                tricks,
            });
            if is_valid_tricks(tricks, round_number) {
                break;
            }
            println!(
                "{}",
                format!("Tricks must be a whole number from 0 to {round_number}.").red()
            );
        }
    }
    if !tricks_sum_ok(machine.state()) {
        println!(
            "{}",
            format!("Those counts don't add up to {round_number}. Enter them again.").red()
        );
        return;
    }
    let finalized_index = machine.state().current_round_index;
    machine.apply(Action::FinalizeRound);
    print_round_result(machine.state(), finalized_index);
}

fn print_round_result(state: &GameState, round_index: usize) {
    let Some(round) = state.rounds.get(round_index) else {
        return;
    };
    let (Some(deltas), Some(totals)) = (&round.scores_delta, &round.scores_total) else {
        return;
    };
    println!("\n{}", format!("Round {} result", round.round_number).bold());
    let mut players: Vec<_> = state.players.iter().collect();
    players.sort_by_key(|player| player.seat_index);
    for player in players {
        let delta = deltas.get(&player.id).copied().unwrap_or(0);
        let total = totals.get(&player.id).copied().unwrap_or(0);
        let delta_text = format!("{delta:+}");
        println!(
            "  {:<12} {:>5}  (total {total})",
            player.name,
            if delta >= 0 {
                delta_text.green()
            } else {
                delta_text.red()
            }
        );
    }
}

fn run_game_complete(machine: &mut GameMachine, store: &Store) -> bool {
    let state = machine.state().clone();
    println!("\n{}", "Game complete! Final standings".bold());
    let totals = cumulative_scores(&state);
    let mut standings: Vec<_> = state.players.iter().collect();
    standings.sort_by_key(|player| std::cmp::Reverse(totals.get(&player.id).copied().unwrap_or(0)));
    for (place, player) in standings.iter().enumerate() {
        let total = totals.get(&player.id).copied().unwrap_or(0);
        let line = format!("  {}. {:<12} {:>5}", place + 1, player.name, total);
        if place == 0 {
            println!("{}", line.green().bold());
        } else {
            println!("{line}");
        }
    }
    if confirm("Start a new game? This clears the current scorecard.") {
        store.clear();
        machine.apply(Action::NewGame);
        false
    } else {
        true
    }
}

fn try_new_game(machine: &mut GameMachine, store: &Store) {
    if confirm("Start a new game? This clears the current scorecard.") {
        store.clear();
        machine.apply(Action::NewGame);
    }
}
