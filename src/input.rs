/// Logical input actions and their mapping onto game transitions.
///
/// Raw key capture lives in the front-end; it only has to answer
/// `InputSource::is_pressed` for each `Action`.

use std::collections::HashSet;

use rand::Rng;

use crate::compute::{
    init_state, move_player_left, move_player_right, player_shoot, purchase, start_game,
    toggle_pause, GameState, MarketItem,
};
use crate::entities::GameStatus;
use crate::level::LevelTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Fire,
    Pause,
    Restart,
    Confirm,
    BuyLife,
    BuyHedge,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Fire,
        Action::Pause,
        Action::Restart,
        Action::Confirm,
        Action::BuyLife,
        Action::BuyHedge,
    ];
}

pub trait InputSource {
    fn is_pressed(&self, action: Action) -> bool;
}

/// Applies one frame of input.  Movement and fire act while held; every
/// other action fires once per press.
#[derive(Clone, Debug, Default)]
pub struct Controls {
    held_last_frame: HashSet<Action>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(
        &mut self,
        state: &GameState,
        input: &impl InputSource,
        levels: &LevelTable,
        rng: &mut impl Rng,
    ) -> GameState {
        let held: HashSet<Action> = Action::ALL
            .into_iter()
            .filter(|&action| input.is_pressed(action))
            .collect();
        let pressed = |action: Action| held.contains(&action) && !self.held_last_frame.contains(&action);

        let next = match state.status {
            GameStatus::Waiting if pressed(Action::Fire) || pressed(Action::Confirm) => {
                start_game(state)
            }
            GameStatus::Waiting => state.clone(),
            GameStatus::LevelFailed | GameStatus::GameOver
                if pressed(Action::Restart) || pressed(Action::Confirm) =>
            {
                start_game(&init_state(levels, rng))
            }
            GameStatus::LevelFailed | GameStatus::GameOver => state.clone(),
            GameStatus::Playing if pressed(Action::Pause) => toggle_pause(state),
            GameStatus::Playing if state.paused => {
                if pressed(Action::Restart) {
                    start_game(&init_state(levels, rng))
                } else if pressed(Action::BuyLife) {
                    purchase(state, MarketItem::ExtraLife)
                } else if pressed(Action::BuyHedge) {
                    purchase(state, MarketItem::HedgeDefense)
                } else {
                    state.clone()
                }
            }
            GameStatus::Playing => {
                let mut next = state.clone();
                if held.contains(&Action::MoveLeft) {
                    next = move_player_left(&next);
                } else if held.contains(&Action::MoveRight) {
                    next = move_player_right(&next);
                }
                if held.contains(&Action::Fire) {
                    next = player_shoot(&next);
                }
                next
            }
        };

        self.held_last_frame = held;
        next
    }
}
