//! Solve results

use core::time::Duration;

/// Termination status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus
{
    /// Primal residual, dual residual and duality gap are within tolerance.
    Solved,
    /// A certificate of primal infeasibility was found.
    Infeasible,
    /// A certificate of unboundedness (dual infeasibility) was found.
    Unbounded,
    /// Iteration limit reached without a decision.
    MaxIterationsReached,
    /// Stopped by the time limit or the progress callback.
    Interrupted,
}

/// Primal-dual vectors in the original (unscaled) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Iterate<F>
{
    pub x: Vec<F>,
    pub y: Vec<F>,
    pub s: Vec<F>,
}

/// Statistics of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveInfo<F>
{
    /// Number of iterations performed.
    pub iter: usize,
    /// Relative primal residual \\(\\|Ax+s-b\\|_2 / (1+\\|b\\|_2)\\) at the last check.
    pub pri_res: F,
    /// Relative dual residual \\(\\|A^Ty+c\\|_2 / (1+\\|c\\|_2)\\) at the last check.
    pub dual_res: F,
    /// Relative duality gap \\(|c^Tx+b^Ty| / (1+|c^Tx|+|b^Ty|)\\) at the last check.
    pub gap: F,
    /// Homogeneous scalar \\(\tau\\) at termination.
    pub tau: F,
    /// Homogeneous scalar \\(\kappa\\) at termination.
    pub kappa: F,
    pub setup_time: Duration,
    pub solve_time: Duration,
    /// Number of accelerated steps rolled back by the safeguard.
    pub accel_rejected: usize,
    /// Number of exponential cone projections that fell back to the heuristic.
    pub exp_fallbacks: usize,
    /// Cumulative inner iterations of the indirect linear system.
    pub cg_iters: usize,
}

/// Solve result.
/// 
/// `x` and `s` are present only when [`SolverStatus::Solved`].
/// `y` is present when solved, and when infeasible as the certificate normalized to \\(b^Ty = -1\\).
/// `iterate` is always filled: the solution, the certificate direction
/// (an unbounded ray is normalized to \\(c^Tx = -1\\)), or the last iterate.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<F>
{
    pub status: SolverStatus,
    pub x: Option<Vec<F>>,
    pub y: Option<Vec<F>>,
    pub s: Option<Vec<F>>,
    pub iterate: Iterate<F>,
    /// \\(c^Tx\\); \\(+\infty\\) if infeasible, \\(-\infty\\) if unbounded.
    pub objective: F,
    /// \\(-b^Ty\\); \\(+\infty\\) if infeasible, \\(-\infty\\) if unbounded.
    pub dual_objective: F,
    pub info: SolveInfo<F>,
}

/// Progress passed to a callback once per iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress<F>
{
    pub iter: usize,
    pub pri_res: F,
    pub dual_res: F,
    pub gap: F,
    pub tau: F,
    pub kappa: F,
    pub elapsed: Duration,
}
