//! Telegram bot that shows a menu of people and a card for each one.

pub mod cards;
pub mod config;
pub mod keep_alive;
pub mod ops_log;
