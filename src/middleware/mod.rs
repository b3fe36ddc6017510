pub mod request_id;

pub use request_id::{make_span_with_request_id, MakeRequestUuidV4, REQUEST_ID_HEADER};
