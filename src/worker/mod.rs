pub mod launcher;
pub mod reaper;
