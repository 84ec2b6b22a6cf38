pub mod buffer;
pub mod emitter;
pub mod reader;
pub mod record;
pub mod search_text;

pub use buffer::{Snapshot, TagBuffer, INITIAL_CAPACITY};
pub use emitter::TagsWriter;
pub use reader::{read_sections, Section};
pub use record::TagRecord;
