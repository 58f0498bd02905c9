mod error;
mod flag;
mod record;
mod tracker;

pub use error::*;
pub use flag::*;
pub use record::*;
pub use tracker::*;
