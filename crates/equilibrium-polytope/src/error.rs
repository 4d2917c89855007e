use thiserror::Error;

/// Errors from cone conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolytopeError {
    #[error("numerical instability in double description: {0}")]
    NumericalInstability(String),

    #[error("generator rows need at least 2 columns (homogeneous + 1), got {0}")]
    DimensionMismatch(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            PolytopeError::NumericalInstability("NaN ray".into()).to_string(),
            "numerical instability in double description: NaN ray"
        );
        assert_eq!(
            PolytopeError::DimensionMismatch(1).to_string(),
            "generator rows need at least 2 columns (homogeneous + 1), got 1"
        );
    }
}
