//! Winjump core - enumerate the alt-tab window set, filter it against a live
//! search string, and sync the result into a UI list control with minimal churn.
//!
//! The win32 shell hosting this (window creation, menus, font dialog etc) is a
//! separate concern .. it owns the controls and calls [`winjump::WinjumpState::update_tick`]
//! once per frame with whatever the user has typed so far.

pub mod winjump;
pub mod enumerate;
pub mod filter;
pub mod reconcile;
pub mod update_loop;
pub mod config;
pub mod hotkey;

#[cfg(windows)]
pub mod win_apis;
