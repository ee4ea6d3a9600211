pub mod player_state;
pub mod track;
