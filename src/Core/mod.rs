mod debug;
pub mod error;
pub mod handles;
pub mod transfer;

pub use error::{HandleError, StoreError, TransferFault};
pub use handles::{HandleCounter, DEFAULT_MAX_HANDLES};
pub use transfer::{RawSink, RawSource, Sink, Source};
