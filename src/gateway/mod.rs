/// Session gateway - Gateway

mod session_gateway;

pub use session_gateway::{SendError, SessionGateway};
