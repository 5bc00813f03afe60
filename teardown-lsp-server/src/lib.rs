pub mod cli;
pub mod logging;
pub mod server;
pub mod test_utils;

pub use server::{ServerOptions, TeardownLanguageServer};
