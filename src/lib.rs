// Library root
// -----------
// Terminal front-end for the SportCards game service. The binary
// (`main.rs`) wires these modules into the interactive CLI.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the five service operations.
// - `models`: wire types shared with the service.
// - `catalog`: static display tables (rarity odds, difficulty titles).
// - `session`: saved phone/user id between runs.
// - `reveal`: timed two-phase card reveal.
// - `shell`: state container and workflow orchestration.
// - `views`: derived counts and leaderboard rows.
// - `ui`: dialoguer menus that drive the shell.
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod reveal;
pub mod session;
pub mod shell;
pub mod ui;
pub mod views;
