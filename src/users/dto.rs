use serde::Deserialize;

/// Request body for user creation. Any string, including an empty one, is accepted.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}
