use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let error = if let Some(error) = err.find::<ApiError>() {
        error.clone()
    } else if err.is_not_found() {
        ApiError::from_code(ApiErrorCode::NotFound)
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        ApiError::new(ApiErrorCode::InvalidInput, e.to_string())
    } else if let Some(e) = err.find::<reject::InvalidQuery>() {
        ApiError::new(ApiErrorCode::InvalidInput, e.to_string())
    } else if err.find::<reject::LengthRequired>().is_some() {
        ApiError::new(ApiErrorCode::InvalidInput, "Content-Length is required.")
    } else if err.find::<reject::PayloadTooLarge>().is_some() {
        ApiError::new(ApiErrorCode::InvalidInput, "Request body too large.")
    } else if err.find::<reject::UnsupportedMediaType>().is_some() {
        ApiError::new(ApiErrorCode::InvalidInput, "Expected a JSON body.")
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiError::from_code(ApiErrorCode::MethodNotAllowed)
    } else {
        warn!("Unhandled rejection: {:?}", err);
        ApiError::from_code(ApiErrorCode::InternalError)
    };

    let status = error.code.status();
    let json = warp::reply::json(&ApiResponse::<()>::err(error));
    Ok(warp::reply::with_status(json, status))
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: ApiErrorCode) -> Self {
        ApiError::new(code, code.to_string())
    }

    /// Privileged moderation endpoints answer 403 rather than 401.
    pub fn forbidding(self) -> Self {
        match self.code {
            ApiErrorCode::Unauthorized => ApiError {
                code: ApiErrorCode::Forbidden,
                ..self
            },
            _ => self,
        }
    }
}

impl reject::Reject for ApiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Not found")]
    NotFound,
    #[error("Already exists")]
    Duplicate,
    #[error("Not allowed")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Invalid authentication")]
    InvalidCredentials,
    #[error("Invalid input")]
    InvalidInput,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::Duplicate => StatusCode::CONFLICT,
            ApiErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ApiErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }
}

impl From<ForumError> for ApiError {
    fn from(error: ForumError) -> Self {
        let code = match &error {
            ForumError::NotFound { .. } => ApiErrorCode::NotFound,
            ForumError::Duplicate { .. } => ApiErrorCode::Duplicate,
            ForumError::Authorization(_) => ApiErrorCode::Unauthorized,
            ForumError::Authentication(_) => ApiErrorCode::InvalidCredentials,
            ForumError::Store(e) => return ApiError::from_code(ApiErrorCode::internal(e)),
        };
        ApiError::new(code, error.to_string())
    }
}
