pub mod aspect;
pub mod player;
