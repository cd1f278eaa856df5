// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - This layer sits above the services
// - It provides the boundary between a front end and the session controller
// - It translates domain state into views and errors into responses

pub mod commands;
pub mod dto;
pub mod error_boundary;
pub mod error_handling;
pub mod formatting;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_boundary::{ErrorBoundary, UNEXPECTED_ERROR_MESSAGE};
pub use error_handling::{ErrorResponse, ErrorType};
pub use state::AppState;
