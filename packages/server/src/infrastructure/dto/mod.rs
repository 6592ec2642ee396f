//! Data Transfer Objects (DTOs) for the HTTP API.
//!
//! - `http`: HTTP API response DTOs
//! - `conversion`: UseCase / Domain → DTO conversions

pub mod conversion;
pub mod http;
