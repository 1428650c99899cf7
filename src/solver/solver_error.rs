/// Solver errors.
/// 
/// Infeasibility, unboundedness and iteration exhaustion are not errors;
/// they are reported by [`crate::solver::SolverStatus`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError
{
    /// Malformed problem data.
    InvalidProblem,
    /// Solver parameter out of range.
    InvalidParam,
    /// Failure of the linear system setup.
    SetupFailed,
    /// Vector length mismatch.
    Dimension,
}

impl core::fmt::Display for SolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverError::InvalidProblem => "InvalidProblem: malformed problem data",
            SolverError::InvalidParam   => "InvalidParam: solver parameter out of range",
            SolverError::SetupFailed    => "SetupFailed: failure of the linear system setup",
            SolverError::Dimension      => "Dimension: vector length mismatch",
        })
    }
}

impl std::error::Error for SolverError {}
