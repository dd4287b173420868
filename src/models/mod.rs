// Domain types shared across the worker: intercepted requests and the
// responses produced for them

mod request;
mod response;

pub use request::{Destination, Request};
pub use response::{Response, StoredType};
