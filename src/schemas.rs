use crate::errors::GenericError;
use actix_web::{FromRequest, HttpMessage};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use utoipa::ToSchema;

#[derive(Serialize, Debug, ToSchema)]
pub struct GenericResponse<D> {
    pub status: bool,
    pub customer_message: String,
    pub code: String,
    pub data: Option<D>,
}

impl<D> GenericResponse<D> {
    pub fn success(message: &str, data: Option<D>) -> Self {
        Self {
            status: true,
            customer_message: String::from(message),
            code: String::from("200"),
            data,
        }
    }

    pub fn error(message: &str, code: &str, data: Option<D>) -> Self {
        Self {
            status: false,
            customer_message: String::from(message),
            code: String::from(code),
            data,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Copy, Clone, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Manager,
    Staff,
}

impl StaffRole {
    /// Staff can advance kitchen workflow; only admins and managers touch
    /// money, cancellations and order edits.
    pub fn can_manage(&self) -> bool {
        matches!(self, StaffRole::Admin | StaffRole::Manager)
    }
}

/// Claims minted by the external auth service. The restaurant scope rides in
/// the token so the core never reads ambient state.
#[derive(Serialize, Deserialize, Debug)]
pub struct JWTClaims {
    pub sub: i64,
    pub restaurant_id: i64,
    pub role: StaffRole,
    pub exp: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct StaffAccount {
    pub id: i64,
    pub restaurant_id: i64,
    pub role: StaffRole,
}

impl FromRequest for StaffAccount {
    type Error = GenericError;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let value = req.extensions().get::<StaffAccount>().copied();

        let result = match value {
            Some(staff) => Ok(staff),
            None => Err(GenericError::UnexpectedCustomError(
                "Something went wrong while parsing staff account detail".to_string(),
            )),
        };

        ready(result)
    }
}
