// End-to-end turn loop over the host line protocol
//
// Feeds recorded host input through the reader and the bot the same way the
// binary does, checking that every turn gets a well-formed answer.

use std::io::Cursor;

use great_escape_bot::bot::Bot;
use great_escape_bot::config::Config;
use great_escape_bot::protocol::ProtocolReader;
use great_escape_bot::types::{Direction, Orientation};

fn is_well_formed(action: &str) -> bool {
    if Direction::all().iter().any(|d| d.as_str() == action) {
        return true;
    }
    let parts: Vec<&str> = action.split(' ').collect();
    parts.len() == 3
        && parts[0].parse::<i32>().is_ok()
        && parts[1].parse::<i32>().is_ok()
        && Orientation::parse(parts[2]).is_some()
}

fn play(input: &str) -> Vec<String> {
    let bot = Bot::new(Config::default_hardcoded());
    let mut reader = ProtocolReader::new(Cursor::new(input));
    let setup = reader.read_setup().expect("setup line");

    let mut actions = Vec::new();
    let mut turn = 0;
    while let Some(state) = reader.read_turn(setup.player_count).expect("turn") {
        actions.push(bot.get_move(&setup, &state, turn).action);
        turn += 1;
    }
    actions
}

#[test]
fn test_two_player_game_answers_every_turn() {
    let input = "9 9 2 1\n\
                 0 4 10\n8 4 10\n0\n\
                 1 4 10\n7 4 10\n0\n\
                 2 4 9\n6 4 10\n1\n4 3 V\n";
    let actions = play(input);
    assert_eq!(actions.len(), 3);
    for action in &actions {
        assert!(is_well_formed(action), "bad action {:?}", action);
    }
}

#[test]
fn test_three_player_game_with_eliminated_player() {
    let input = "9 9 3 2\n\
                 0 1 6\n-1 -1 0\n4 7 6\n0\n";
    let actions = play(input);
    // player 2 stands next to the bottom row
    assert_eq!(actions, vec!["DOWN".to_string()]);
}

#[test]
fn test_last_turn_with_target_one_step_away() {
    let input = "9 9 2 0\n\
                 7 0 0\n5 5 3\n2\n8 2 V\n1 6 H\n";
    assert_eq!(play(input), vec!["RIGHT".to_string()]);
}
