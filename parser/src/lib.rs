pub mod error;
pub mod handler;
pub mod query;
pub mod reply;

pub use error::LookupError;
pub use handler::{handle_index_request, ChunkSink, RequestContext, Responder};
pub use query::find_value;
pub use reply::{Command, Reply, CMD_KEY, VERSION};
