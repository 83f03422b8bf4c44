pub mod driver;
pub mod envelope;
pub mod request;
pub mod review;
pub mod ride;
pub mod user;

pub use envelope::{Envelope, Meta, Page};
pub use request::{ApiRequest, ApiResponse};
