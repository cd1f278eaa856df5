// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between a front end and services
// - Commands return DTOs or service outcomes
// - Commands handle error conversion to ErrorResponse
// - Commands NEVER contain business logic

pub mod session_commands;

pub use session_commands::*;
