//! Errors raised when geometric or camera input is degenerate

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Cannot normalize a zero-length vector")]
    ZeroLengthVector,
    #[error("View direction is zero or parallel to the up vector")]
    DegenerateView,
    #[error("Invalid clip planes: near={near}, far={far} (need 0 < near < far)")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("Invalid aspect ratio: {0} (must be positive)")]
    InvalidAspectRatio(f32),
    #[error("Invalid field of view: {0} degrees (must be within (0, 180))")]
    InvalidFov(f32),
    #[error("Invalid orthographic size: {0} (must be positive)")]
    InvalidOrthoSize(f32),
    #[error("{shape} needs at least {min} segments, got {got}")]
    TooFewSegments {
        shape: &'static str,
        got: u32,
        min: u32,
    },
    #[error("{shape} accepts at most {max} segments, got {got}")]
    TooManySegments {
        shape: &'static str,
        got: u32,
        max: u32,
    },
    #[error("{shape} {name} must be positive and finite, got {value}")]
    InvalidDimension {
        shape: &'static str,
        name: &'static str,
        value: f32,
    },
    #[error("Scale has a zero component, the model matrix would be singular")]
    SingularScale,
    #[error("Transform has a NaN or infinite component")]
    NonFiniteTransform,
}
