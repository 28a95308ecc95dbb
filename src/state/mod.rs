/// State management module
///
/// This module handles all challenge state, including:
/// - Which moves are used and the usage log (checklist.rs)
/// - Deriving the filtered, sorted move table (filter.rs)
/// - Save files on disk (save.rs)
/// - The session tying those to the signal file (session.rs)

pub mod checklist;
pub mod filter;
pub mod save;
pub mod session;
