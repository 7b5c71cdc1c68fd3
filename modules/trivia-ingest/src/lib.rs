pub mod aggregate;
pub mod document;
pub mod error;
pub mod fields;
pub mod parsers;
pub mod segment;
pub mod store;

pub use aggregate::{Aggregator, SourcePaths};
pub use document::RawDocument;
pub use error::{IngestError, Result};
pub use parsers::{EventsParser, FormatParser, LineMode, MoviesParser, MusicParser, SportsParser};
pub use segment::{segment, Block, SegmentStyle, Segmented};
pub use store::{SnapshotHandle, SnapshotStore};
