//! Method API: request shapes, dispatch, and the response envelope.

pub mod errors;
pub mod handler;
pub mod request;
pub mod response;

pub use errors::ApiError;
pub use handler::{MethodHandler, RequestContext};
pub use request::{ClientsInterestsRequest, MethodRequest, OnlineScoreRequest};
pub use response::Envelope;
