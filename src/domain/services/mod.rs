mod commit_message;
mod session_controller;

pub use commit_message::*;
pub use session_controller::*;
