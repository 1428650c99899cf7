//! Linear system

use crate::solver::LinAlg;

/// Strategy for the linear system solved at every iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinSysStrategy
{
    /// Sparse LDL' factorization, computed once.
    Direct,
    /// Matrix-free preconditioned conjugate gradients.
    Indirect,
}

/// Linear system trait
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Solves
/// \\[
/// \begin{bmatrix} I & A^T \\\\ -A & I \end{bmatrix}
/// \begin{bmatrix} z_x \\\\ z_y \end{bmatrix}
/// =
/// \begin{bmatrix} w_x \\\\ w_y \end{bmatrix}
/// \\]
/// for a fixed \\(A \in \mathbb{R}^{m \times n}\\) and varying right-hand sides.
pub trait LinSys<L: LinAlg>
{
    /// Solves the system in place.
    /// 
    /// * `w` is \\((w_x, w_y)\\) of length \\(n + m\\) before entry, and shall be replaced with \\((z_x, z_y)\\) on exit.
    /// * `iter` is the outer iteration number, a hint for inexact strategies.
    ///   `None` requests the most accurate solve.
    fn solve(&mut self, w: &mut [L::F], iter: Option<usize>);

    /// Cumulative number of inner iterations, zero for non-iterative strategies.
    fn inner_iters(&self) -> usize
    {
        0
    }
}
