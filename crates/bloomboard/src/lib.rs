pub mod board;
pub mod cli;
pub mod config;
pub mod events;
pub mod gui;
pub mod sys;
