pub mod handlers;

pub use handlers::{Handlers, PublishBatch};
