pub mod requests;
pub mod responses;

pub use requests::{LoginRequest, ProductRequest};
pub use responses::{
    CreatedResponse, ErrorResponse, HealthResponse, LoginResponse, MessageResponse,
    ProductResponse,
};
