//! SignBank wire protocol
//!
//! One JSON document per line, one request/response pair per call. The
//! request side is a closed enum tagged by `action`, so routing is an
//! exhaustive match and a new action is a compile-time change, not a new
//! string case.

pub mod codec;
pub mod request;
pub mod response;

pub use codec::{read_line, write_message};
pub use request::{Request, TransferRequest};
pub use response::{Payload, Response};
