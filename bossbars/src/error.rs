//! Errors returned by overlays and the registry
use crate::link::ClientId;

pub type Result<T> = core::result::Result<T, OverlayError>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum OverlayError {
    #[error("fraction must be finite and between 0 and 100 (both inclusive), got {0}")]
    InvalidFraction(f32),
    #[error("client {0:?} is not connected")]
    ClientUnavailable(ClientId),
    #[error("cannot add an overlay for client {0:?}: it is not connected")]
    ClientNotConnected(ClientId),
}
