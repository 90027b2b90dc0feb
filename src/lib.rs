//! Majordomo — Scripted Desktop Greeter & Boot Concierge
//!
//! This crate drives a personal startup ritual on macOS:
//! - Identity gate (facial presence, name challenge, passphrase)
//! - Welcome video and boot sound playback
//! - Configured app/folder launching behind confirmation dialogs
//! - Network connectivity check and local device census (ARP table)
//! - Hourly check-in notifications with a pause flag

pub mod app;
pub mod boot;
pub mod checkin;
pub mod cli;
pub mod command;
pub mod command_handlers;
pub mod config;
pub mod dialog;
pub mod doctor;
pub mod gate;
pub mod launch;
pub mod logging;
pub mod media;
pub mod net;
pub mod runner;
pub mod speech;

pub use app::{
    execute_command, execute_command_with_context, run, run_with_context, run_with_ctrl_c,
    AppContext, AppEvent, EventHook, OutputHook,
};
pub use checkin::{clear_pause_flag, next_top_of_hour, set_pause_flag};
pub use command::AppCommand;
pub use config::Config;
pub use doctor::{DoctorCheck, DoctorReport};
pub use gate::{GateOutcome, GateStep};
pub use net::{
    CensusReport, ConnectivityReport, DeviceRecord, VendorInfo, lookup_vendor_info,
};
pub use runner::{ProcessRunner, ToolOutput, ToolRunner};

// Re-export logging macros for use across crate
pub use crate::logging::macros;
