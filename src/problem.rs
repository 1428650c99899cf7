use num_traits::Float;
use std::sync::Arc;
use crate::csc::CscMatrix;
use crate::solver::SolverError;

//

/// One block of a product cone.
/// 
/// The blocks of a [`Problem`] partition its constraint rows in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConeBlock
{
    /// Zero cone of the given size: equality constraints.
    Zero(usize),
    /// Nonnegative orthant of the given size.
    NonnegativeOrthant(usize),
    /// One second-order cone of the given size (at least 1).
    SecondOrder(usize),
    /// The given **count** of exponential cones, each of 3 consecutive rows.
    Exponential(usize),
    /// The given count of dual exponential cones, each of 3 consecutive rows.
    ExponentialDual(usize),
}

impl ConeBlock
{
    /// Number of rows the block consumes.
    pub fn dim(&self) -> usize
    {
        match self {
            ConeBlock::Zero(sz) => *sz,
            ConeBlock::NonnegativeOrthant(sz) => *sz,
            ConeBlock::SecondOrder(sz) => *sz,
            ConeBlock::Exponential(cnt) => cnt * 3,
            ConeBlock::ExponentialDual(cnt) => cnt * 3,
        }
    }
}

//

/// Conic linear program
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & c^T x \\\\
/// {\rm subject \ to} & A x + s = b \\\\
/// & s \in \mathcal{K},
/// \end{array}
/// \\]
/// where \\(\mathcal{K}\\) is the product of the [`ConeBlock`]s.
/// 
/// The constraint matrix is held by `Arc` so that one store can back
/// several problems or concurrent solves.
/// Construction does not check consistency; [`Problem::validate`] does,
/// and every solve calls it before any work.
#[derive(Debug, Clone)]
pub struct Problem<F>
{
    a: Arc<CscMatrix<F>>,
    b: Vec<F>,
    c: Vec<F>,
    cone: Vec<ConeBlock>,
}

impl<F: Float> Problem<F>
{
    /// Creates an instance.
    /// 
    /// * `a` is \\(A\\), either owned or already shared.
    /// * `b` is \\(b\\), of length of the number of rows of \\(A\\).
    /// * `c` is \\(c\\), of length of the number of columns of \\(A\\).
    /// * `cone` is the ordered cone blocks.
    pub fn new<A: Into<Arc<CscMatrix<F>>>>(a: A, b: Vec<F>, c: Vec<F>, cone: Vec<ConeBlock>) -> Self
    {
        Problem {
            a: a.into(),
            b, c, cone,
        }
    }

    /// Constraint matrix \\(A\\).
    pub fn a(&self) -> &CscMatrix<F>
    {
        &self.a
    }

    /// Shared handle of \\(A\\).
    pub fn a_shared(&self) -> Arc<CscMatrix<F>>
    {
        Arc::clone(&self.a)
    }

    /// Constraint vector \\(b\\).
    pub fn b(&self) -> &[F]
    {
        &self.b
    }

    /// Objective vector \\(c\\).
    pub fn c(&self) -> &[F]
    {
        &self.c
    }

    /// Cone blocks in row order of \\(A\\).
    pub fn cone(&self) -> &[ConeBlock]
    {
        &self.cone
    }

    /// Number of constraint rows \\(m\\) and variables \\(n\\).
    pub fn size(&self) -> (usize, usize)
    {
        self.a.size()
    }

    /// Checks consistency of dimensions and data.
    /// 
    /// Returns `Ok`, or `Err` with [`SolverError::InvalidProblem`].
    pub fn validate(&self) -> Result<(), SolverError>
    {
        let (m, n) = self.size();

        if m == 0 || n == 0 {
            log::error!("Empty problem: A({}, {})", m, n);
            return Err(SolverError::InvalidProblem);
        }
        if self.b.len() != m || self.c.len() != n {
            log::error!("Size mismatch: A({}, {}), b({}), c({})", m, n, self.b.len(), self.c.len());
            return Err(SolverError::InvalidProblem);
        }

        let cone_dim: usize = self.cone.iter().map(ConeBlock::dim).sum();
        if cone_dim != m {
            log::error!("Cone dimension {} must equal the number of rows {}", cone_dim, m);
            return Err(SolverError::InvalidProblem);
        }
        if self.cone.iter().any(|blk| *blk == ConeBlock::SecondOrder(0)) {
            log::error!("Second-order cone of size 0");
            return Err(SolverError::InvalidProblem);
        }

        if self.b.iter().chain(self.c.iter()).any(|v| !v.is_finite()) {
            log::error!("b and c must be finite");
            return Err(SolverError::InvalidProblem);
        }

        Ok(())
    }
}

//

#[test]
fn test_problem1()
{
    let a = CscMatrix::from_rowmaj(4, 2, &[
        1., 0.,
        0., 1.,
        1., 1.,
        0., 0.,
    ]).unwrap();
    let a = Arc::new(a);

    let ok = Problem::new(a.clone(), vec![0.; 4], vec![1., 1.], vec![ConeBlock::NonnegativeOrthant(1), ConeBlock::Exponential(1)]);
    assert_eq!(ok.validate(), Ok(()));
    assert_eq!(Arc::strong_count(&a), 2);

    let bad_cone = Problem::new(a.clone(), vec![0.; 4], vec![1., 1.], vec![ConeBlock::Exponential(1)]);
    assert_eq!(bad_cone.validate(), Err(SolverError::InvalidProblem));

    let bad_b = Problem::new(a.clone(), vec![0.; 3], vec![1., 1.], vec![ConeBlock::NonnegativeOrthant(4)]);
    assert_eq!(bad_b.validate(), Err(SolverError::InvalidProblem));

    let bad_c = Problem::new(a.clone(), vec![0.; 4], vec![1., f64::INFINITY], vec![ConeBlock::NonnegativeOrthant(4)]);
    assert_eq!(bad_c.validate(), Err(SolverError::InvalidProblem));

    let bad_soc = Problem::new(a, vec![0.; 4], vec![1., 1.], vec![ConeBlock::SecondOrder(0), ConeBlock::NonnegativeOrthant(4)]);
    assert_eq!(bad_soc.validate(), Err(SolverError::InvalidProblem));
}

#[test]
fn test_problem_accessors()
{
    let a = CscMatrix::from_rowmaj(2, 1, &[
        1.,
        2.,
    ]).unwrap();
    let p = Problem::new(a, vec![3., 4.], vec![5.], vec![ConeBlock::Zero(1), ConeBlock::NonnegativeOrthant(1)]);

    assert_eq!(p.size(), (2, 1));
    assert_eq!(p.a().nnz(), 2);
    assert!(Arc::ptr_eq(&p.a_shared(), &p.a_shared()));
    assert_eq!(p.b(), &[3., 4.]);
    assert_eq!(p.c(), &[5.]);
    assert_eq!(p.cone(), &[ConeBlock::Zero(1), ConeBlock::NonnegativeOrthant(1)]);
}
