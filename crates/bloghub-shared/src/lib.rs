//! # BlogHub Shared
//!
//! Wire types shared between the server and client: request/response DTOs,
//! push-event payloads and the error body shape.

pub mod dto;
pub mod events;
pub mod response;

pub use response::ErrorBody;
