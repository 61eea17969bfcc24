// Modal rendering modules
mod comments;
mod utils;

pub use comments::*;
