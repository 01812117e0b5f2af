//! Utility functions shared by the fetcher and the terminal output.
//!
//! - **URL validation**: request URLs and links handed to the system browser
//! - **Text processing**: terminal-safe, width-aware rendering of remote text

mod text;
mod url_validator;

pub use text::{display_width, sanitize_line, truncate_to_width};
pub use url_validator::{validate_url, validate_url_for_open, UrlError};
