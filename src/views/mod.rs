//! Pure view models for the three site views. The HTML adapter in
//! `render` is the only consumer; nothing here touches I/O or markup.

pub mod leaderboard;
pub mod needle;
pub mod trajectory;
