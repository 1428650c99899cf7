/*!
Conesplit is a first-order conic solver by operator splitting.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate for Rust solves **conic linear programs**
\\[
\begin{array}{ll}
{\rm minimize} & c^T x \\\\
{\rm subject \ to} & A x + s = b \\\\
& s \in \mathcal{K},
\end{array}
\\]
where \\(A\\) is sparse and \\(\mathcal{K}\\) is a product of zero cones, nonnegative orthants,
second-order cones and exponential cones (or their duals).
It runs ADMM on the homogeneous self-dual embedding, so that
a solution or a certificate of infeasibility/unboundedness is returned.

# General usage

1. Build the constraint matrix as a [`CscMatrix`].
1. Put it together with \\(b\\), \\(c\\) and the cone layout of [`ConeBlock`]s into a [`Problem`].
1. Create a [`prelude::Solver`] instance and optionally set its parameters,
   or use the [`solve`] function with [`prelude::SolverParam`] for `f64`.
1. Check [`prelude::SolverStatus`] of the returned [`prelude::Solution`].

# Examples

A small LP:
\\[
\begin{array}{ll}
{\rm minimize} & x_0 + x_1 \\\\
{\rm subject \ to} & x_0 \ge 1, \ x_1 \ge 2.
\end{array}
\\]

```
use float_eq::assert_float_eq;
use conesplit::prelude::*;
use conesplit::*;

//env_logger::init(); // Use any logger crate as `conesplit` uses `log` crate.

type ASolver = Solver<FloatGeneric<f64>>;

// -x + s = -(1, 2), s >= 0
let a = CscMatrix::from_rowmaj(2, 2, &[
    -1., 0.,
    0., -1.,
]).unwrap();
let problem = Problem::new(a, vec![-1., -2.], vec![1., 1.], vec![ConeBlock::NonnegativeOrthant(2)]);

let s = ASolver::new().par(|p| {
    p.eps_acc = 1e-6;
    p.max_iter = Some(100_000);
});
let rslt = s.solve(&problem).unwrap();

assert_eq!(rslt.status, SolverStatus::Solved);
assert_float_eq!(rslt.x.unwrap(), vec![1., 2.], abs_all <= 1e-3);
assert_float_eq!(rslt.objective, 3., abs <= 1e-3);
```
*/

pub mod solver;

//

mod floatgeneric;

pub use floatgeneric::*;

//

mod csc;
mod problem;

pub use csc::*;
pub use problem::*;

//

mod cone_zero;
mod cone_rpos;
mod cone_soc;
mod cone_exp;
mod cone_product;

pub use cone_zero::*;
pub use cone_rpos::*;
pub use cone_soc::*;
pub use cone_exp::*;
pub use cone_product::*;

//

mod ldl;
mod linsys_direct;
mod linsys_indirect;

pub use ldl::*;
pub use linsys_direct::*;
pub use linsys_indirect::*;

//

mod equilibrate;
mod anderson;

pub use equilibrate::*;
pub use anderson::*;

//

/// Prelude
pub mod prelude
{
    pub use crate::solver::{Solver, SolverError, SolverParam, SolverStatus, Solution, LinSysStrategy};
    pub use crate::FloatGeneric;
}

/// Solves a `f64` problem with the given parameters.
/// 
/// Returns `Ok` with [`solver::Solution`] or `Err` with [`solver::SolverError`] type.
/// Equivalent to [`solver::Solver::solve`] of [`FloatGeneric<f64>`] with a copy of `par`.
pub fn solve(problem: &Problem<f64>, par: &solver::SolverParam<f64>) -> Result<solver::Solution<f64>, solver::SolverError>
{
    let s = solver::Solver::<FloatGeneric<f64>> {
        par: par.clone(),
    };
    s.solve(problem)
}
