//! Auth Endpoints

use serde::Serialize;
use taskflow_core::LoginResponse;

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct LoginArgs<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterArgs<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    client
        .post_public("/auth/login", &LoginArgs { email, password })
        .await
}

pub async fn register(client: &ApiClient, name: &str, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    client
        .post_public("/auth/register", &RegisterArgs { name, email, password })
        .await
}
