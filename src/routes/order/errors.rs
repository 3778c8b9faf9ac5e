use crate::{errors::GenericError, utils::error_chain_fmt};

#[derive(thiserror::Error)]
pub enum OrderCreationError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    ItemUnavailable(String),
    #[error("{0}")]
    TotalMismatch(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for OrderCreationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<OrderCreationError> for GenericError {
    fn from(err: OrderCreationError) -> GenericError {
        match err {
            OrderCreationError::ValidationError(message) => GenericError::ValidationError(message),
            OrderCreationError::ItemUnavailable(message) => GenericError::ValidationError(message),
            OrderCreationError::TotalMismatch(message) => GenericError::ValidationError(message),
            OrderCreationError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            OrderCreationError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}

#[derive(thiserror::Error)]
pub enum EditOrderError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    ItemUnavailable(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for EditOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<EditOrderError> for GenericError {
    fn from(err: EditOrderError) -> GenericError {
        match err {
            EditOrderError::ValidationError(message) => GenericError::ValidationError(message),
            EditOrderError::ItemUnavailable(message) => GenericError::ValidationError(message),
            EditOrderError::NotFound(message) => GenericError::DataNotFound(message),
            EditOrderError::InvalidState(message) => GenericError::InvalidStateError(message),
            EditOrderError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            EditOrderError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}

#[allow(clippy::enum_variant_names)]
#[derive(thiserror::Error)]
pub enum OrderStatusError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    InvalidState(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for OrderStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<OrderStatusError> for GenericError {
    fn from(err: OrderStatusError) -> GenericError {
        match err {
            OrderStatusError::NotFound(message) => GenericError::DataNotFound(message),
            OrderStatusError::InvalidTransition(message) => {
                GenericError::InvalidStateError(message)
            }
            OrderStatusError::InvalidState(message) => GenericError::InvalidStateError(message),
            OrderStatusError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            OrderStatusError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
