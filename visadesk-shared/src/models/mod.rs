pub mod auth;
pub mod errors;
pub mod user;

pub use auth::{AuthResponse, MeResponse, MessageResponse, RegisterResponse, UserResponse};
pub use errors::ErrorResponse;
pub use user::{
    Gender, LoginRequest, MaritalStatus, Profile, RegisterRequest, Role, UpdateUserRequest, User,
    UserId,
};
