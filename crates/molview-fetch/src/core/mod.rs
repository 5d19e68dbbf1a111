//! Pure transformations for fetching.
//!
//! Nothing in this module performs I/O; the effects layer feeds it bytes and
//! status codes.

mod compression;
mod decode;
mod progress;
mod status;
mod xml;

pub use compression::{decompress, is_compressed_name};
pub use decode::decode_payload;
pub(crate) use progress::{advance, transfer_message};
pub(crate) use progress::{
    DOWNLOADING, OPENING_FILE, PARSING_JSON, PARSING_XML, READING, WAITING_FOR_SERVER,
};
pub use status::{is_success_status, status_reason};
pub use xml::parse_xml;
