use num_traits::Float;
use core::fmt::{Debug, LowerExp};
use crate::solver::{LinAlg, SolverError, SolverParam, Solution, Progress};
use crate::solver::engine;
use crate::Problem;

//

/// First-order conic linear program solver struct.
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// This struct abstracts a solver of a conic linear program:
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & c^T x \\\\
/// {\rm subject \ to} & A x + s = b \\\\
/// & s \in \mathcal{K},
/// \end{array}
/// \\]
/// where
/// * variables \\( x \in \mathbb{R}^n,\ s \in \mathbb{R}^m \\)
/// * \\( c \in \mathbb{R}^n \\), \\( A \in \mathbb{R}^{m \times n} \\) sparse and \\( b \in \mathbb{R}^m \\)
/// * \\( \mathcal{K} \\) a product of zero, nonnegative, second-order and exponential cones.
/// 
/// The solution gives optimal values of primal variables \\(x\\)
/// as well as dual variables \\(y\\) of the dual problem:
/// \\[
/// \begin{array}{ll}
/// {\rm maximize} & -b^T y \\\\
/// {\rm subject \ to} & -A^T y = c \\\\
/// & y \in \mathcal{K}^*,
/// \end{array}
/// \\]
/// or a certificate of infeasibility or unboundedness.
/// 
/// The iteration is ADMM on the homogeneous self-dual embedding
/// \\[
/// Q u = v, \quad
/// Q = \begin{bmatrix} 0 & A^T & c \\\\ -A & 0 & b \\\\ -c^T & -b^T & 0 \end{bmatrix}, \quad
/// u = (x, y, \tau) \in \mathbb{R}^n \times \mathcal{K}^* \times \mathbb{R}_+, \quad
/// v = (0, s, \kappa) \in \lbrace 0 \rbrace^n \times \mathcal{K} \times \mathbb{R}_+.
/// \\]
pub struct Solver<L: LinAlg>
{
    /// solver parameters.
    pub par: SolverParam<L::F>,
}

impl<L: LinAlg> Solver<L>
{
    /// Creates an instance.
    /// 
    /// Returns [`Solver`] instance.
    pub fn new() -> Self
    {
        Solver {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    /// 
    /// Returns [`Solver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<L::F>)
    {
        f(&mut self.par);
        self
    }
}

impl<L: LinAlg> Default for Solver<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlg> Solver<L>
where L::F: Float + Debug + LowerExp
{
    /// Starts to solve a conic linear program.
    /// 
    /// Returns `Ok` with [`Solution`] whatever its [`crate::solver::SolverStatus`] is,
    /// or `Err` with [`SolverError`] type for malformed input or a failed setup.
    /// * `problem` is the [`Problem`] to solve. It is only read.
    pub fn solve(&self, problem: &Problem<L::F>) -> Result<Solution<L::F>, SolverError>
    {
        self.solve_with_callback(problem, |_| false)
    }

    /// Starts to solve with a progress callback.
    /// 
    /// Same as [`Solver::solve`] except that
    /// * `callback` is called once per iteration; returning `true` stops the solve
    ///   with [`crate::solver::SolverStatus::Interrupted`].
    pub fn solve_with_callback<CB>(&self, problem: &Problem<L::F>, callback: CB) -> Result<Solution<L::F>, SolverError>
    where CB: FnMut(&Progress<L::F>) -> bool
    {
        problem.validate()?;
        self.par.validate()?;

        log::debug!("{:?}", self.par);

        engine::run::<L, _>(problem, &self.par, callback)
    }
}
