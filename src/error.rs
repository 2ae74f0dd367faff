/*
 * Error Module
 *
 * Every fallible engine operation returns `UniverseError`. The per-tick path
 * has no error conditions.
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UniverseError {
    #[error("invalid world bounds: {width} x {height} (both must be finite and positive)")]
    InvalidBounds { width: f32, height: f32 },

    #[error("agent index {index} out of range (agent count is {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("engine parameter `{name}` out of range: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, UniverseError>;

// Bounds must be finite and strictly positive on both axes.
pub(crate) fn check_bounds(width: f32, height: f32) -> Result<()> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(UniverseError::InvalidBounds { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_reject_zero_negative_and_non_finite() {
        assert!(check_bounds(800.0, 600.0).is_ok());
        assert!(check_bounds(0.0, 600.0).is_err());
        assert!(check_bounds(800.0, -1.0).is_err());
        assert!(check_bounds(f32::NAN, 600.0).is_err());
        assert!(check_bounds(800.0, f32::INFINITY).is_err());
    }

    #[test]
    fn error_messages_name_the_offending_values() {
        let err = UniverseError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "agent index 7 out of range (agent count is 3)");
    }
}
