use num_traits::Float;
use crate::solver::{LinAlg, Operator, SolverError};

//

/// Sparse matrix in compressed sparse column format
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// Stores \\(A \in \mathbb{R}^{m \times n}\\) by columns:
/// the entries of column `j` are `values[col_ptr[j]..col_ptr[j + 1]]`
/// at rows `row_idx[col_ptr[j]..col_ptr[j + 1]]`, strictly increasing within each column.
/// 
/// A matrix is constant once built, so it can be shared between threads
/// (typically through `std::sync::Arc`) and solved against concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<F>
{
    n_row: usize,
    n_col: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<F>,
}

impl<F: Float> CscMatrix<F>
{
    /// Creates an instance from compressed sparse column arrays.
    /// 
    /// Returns [`CscMatrix`] instance,
    /// or `Err` with [`SolverError::InvalidProblem`] if the arrays are not a well-formed matrix.
    /// * `n_row` is a number of rows \\(m\\).
    /// * `n_col` is a number of columns \\(n\\).
    /// * `col_ptr` is column pointers of length \\(n + 1\\), starting with zero and nondecreasing.
    /// * `row_idx` is row indices, strictly increasing within each column.
    /// * `values` is nonzero values, finite.
    pub fn new(n_row: usize, n_col: usize, col_ptr: Vec<usize>, row_idx: Vec<usize>, values: Vec<F>) -> Result<Self, SolverError>
    {
        if col_ptr.len() != n_col + 1 {
            log::error!("col_ptr length {} must be {}", col_ptr.len(), n_col + 1);
            return Err(SolverError::InvalidProblem);
        }
        if col_ptr[0] != 0 {
            log::error!("col_ptr must start with 0");
            return Err(SolverError::InvalidProblem);
        }
        if row_idx.len() != values.len() || col_ptr[n_col] != values.len() {
            log::error!("nnz mismatch: col_ptr {}, row_idx {}, values {}", col_ptr[n_col], row_idx.len(), values.len());
            return Err(SolverError::InvalidProblem);
        }

        if let Some(c) = (0.. n_col).find(|&c| col_ptr[c] > col_ptr[c + 1]) {
            log::error!("col_ptr must be nondecreasing at column {}", c);
            return Err(SolverError::InvalidProblem);
        }

        for c in 0.. n_col {
            let rows = &row_idx[col_ptr[c]..col_ptr[c + 1]];
            for (i, &r) in rows.iter().enumerate() {
                if r >= n_row {
                    log::error!("row index {} out of range {} at column {}", r, n_row, c);
                    return Err(SolverError::InvalidProblem);
                }
                if i > 0 && rows[i - 1] >= r {
                    log::error!("row indices must be strictly increasing at column {}", c);
                    return Err(SolverError::InvalidProblem);
                }
            }
        }

        if values.iter().any(|v| !v.is_finite()) {
            log::error!("values must be finite");
            return Err(SolverError::InvalidProblem);
        }

        Ok(CscMatrix {
            n_row, n_col, col_ptr, row_idx, values,
        })
    }

    /// Creates an instance from coordinate (triplet) data.
    /// 
    /// Duplicated entries are summed.
    /// Returns [`CscMatrix`] instance, or `Err` with [`SolverError::InvalidProblem`].
    /// * `rows`, `cols` and `values` shall have the same length.
    pub fn from_triplets(n_row: usize, n_col: usize, rows: &[usize], cols: &[usize], values: &[F]) -> Result<Self, SolverError>
    {
        if rows.len() != values.len() || cols.len() != values.len() {
            log::error!("triplet length mismatch: rows {}, cols {}, values {}", rows.len(), cols.len(), values.len());
            return Err(SolverError::InvalidProblem);
        }
        if let Some(&c) = cols.iter().find(|&&c| c >= n_col) {
            log::error!("column index {} out of range {}", c, n_col);
            return Err(SolverError::InvalidProblem);
        }

        let mut order: Vec<usize> = (0.. values.len()).collect();
        order.sort_by_key(|&k| (cols[k], rows[k]));

        let mut col_ptr = vec![0; n_col + 1];
        let mut row_idx = Vec::with_capacity(values.len());
        let mut vals = Vec::with_capacity(values.len());

        let mut last: Option<(usize, usize)> = None;
        for k in order {
            let key = (cols[k], rows[k]);
            if last == Some(key) {
                if let Some(v) = vals.last_mut() {
                    *v = *v + values[k];
                }
            }
            else {
                row_idx.push(rows[k]);
                vals.push(values[k]);
                col_ptr[cols[k] + 1] += 1;
                last = Some(key);
            }
        }
        for c in 0.. n_col {
            col_ptr[c + 1] += col_ptr[c];
        }

        Self::new(n_row, n_col, col_ptr, row_idx, vals)
    }

    /// Creates an instance from a dense row-major array, dropping zeros.
    /// 
    /// Returns [`CscMatrix`] instance, or `Err` with [`SolverError::InvalidProblem`].
    /// * `dense` shall have a length of `n_row * n_col`.
    pub fn from_rowmaj(n_row: usize, n_col: usize, dense: &[F]) -> Result<Self, SolverError>
    {
        if dense.len() != n_row * n_col {
            log::error!("dense length {} must be {}", dense.len(), n_row * n_col);
            return Err(SolverError::InvalidProblem);
        }

        let mut col_ptr = Vec::with_capacity(n_col + 1);
        let mut row_idx = Vec::new();
        let mut values = Vec::new();

        col_ptr.push(0);
        for c in 0.. n_col {
            for r in 0.. n_row {
                let v = dense[r * n_col + c];
                if v != F::zero() {
                    row_idx.push(r);
                    values.push(v);
                }
            }
            col_ptr.push(values.len());
        }

        Self::new(n_row, n_col, col_ptr, row_idx, values)
    }

    /// Number of rows and columns.
    pub fn size(&self) -> (usize, usize)
    {
        (self.n_row, self.n_col)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize
    {
        self.values.len()
    }

    pub fn col_ptr(&self) -> &[usize]
    {
        &self.col_ptr
    }

    pub fn row_idx(&self) -> &[usize]
    {
        &self.row_idx
    }

    pub fn values(&self) -> &[F]
    {
        &self.values
    }

    /// Iterates `(row, value)` entries of a column.
    pub fn col(&self, c: usize) -> impl Iterator<Item=(usize, F)> + '_
    {
        let range = self.col_ptr[c]..self.col_ptr[c + 1];
        self.row_idx[range.clone()].iter().copied().zip(self.values[range].iter().copied())
    }

    /// Calculates \\(A x\\).
    /// 
    /// Returns the product, or `Err` with [`SolverError::Dimension`] if `x` is not of length \\(n\\).
    pub fn multiply(&self, x: &[F]) -> Result<Vec<F>, SolverError>
    {
        if x.len() != self.n_col {
            log::error!("multiply: x length {} must be {}", x.len(), self.n_col);
            return Err(SolverError::Dimension);
        }

        let mut y = vec![F::zero(); self.n_row];
        self.spmv(F::one(), x, F::zero(), &mut y);
        Ok(y)
    }

    /// Calculates \\(A^T y\\).
    /// 
    /// Returns the product, or `Err` with [`SolverError::Dimension`] if `y` is not of length \\(m\\).
    pub fn multiply_transpose(&self, y: &[F]) -> Result<Vec<F>, SolverError>
    {
        if y.len() != self.n_row {
            log::error!("multiply_transpose: y length {} must be {}", y.len(), self.n_row);
            return Err(SolverError::Dimension);
        }

        let mut x = vec![F::zero(); self.n_col];
        self.spmv_t(F::one(), y, F::zero(), &mut x);
        Ok(x)
    }

    // y = alpha * A * x + beta * y
    fn spmv(&self, alpha: F, x: &[F], beta: F, y: &mut [F])
    {
        assert_eq!(x.len(), self.n_col);
        assert_eq!(y.len(), self.n_row);

        for v in y.iter_mut() {
            *v = beta * *v;
        }
        for c in 0.. self.n_col {
            let ax = alpha * x[c];
            if ax != F::zero() {
                for (r, a) in self.col(c) {
                    y[r] = y[r] + a * ax;
                }
            }
        }
    }

    // y = alpha * A^T * x + beta * y
    fn spmv_t(&self, alpha: F, x: &[F], beta: F, y: &mut [F])
    {
        assert_eq!(x.len(), self.n_row);
        assert_eq!(y.len(), self.n_col);

        for (c, v) in y.iter_mut().enumerate() {
            let mut sum = F::zero();
            for (r, a) in self.col(c) {
                sum = sum + a * x[r];
            }
            *v = alpha * sum + beta * *v;
        }
    }

    /// Infinity norms of rows, \\(\max_j |A_{ij}|\\) for each \\(i\\).
    pub fn row_norms_inf(&self) -> Vec<F>
    {
        let mut norms = vec![F::zero(); self.n_row];
        for (r, a) in self.row_idx.iter().zip(&self.values) {
            norms[*r] = norms[*r].max(a.abs());
        }
        norms
    }

    /// Infinity norms of columns, \\(\max_i |A_{ij}|\\) for each \\(j\\).
    pub fn col_norms_inf(&self) -> Vec<F>
    {
        (0.. self.n_col).map(|c| {
            self.col(c).fold(F::zero(), |acc, (_, a)| acc.max(a.abs()))
        }).collect()
    }

    /// Squared 2-norms of columns, \\(\sum_i A_{ij}^2\\) for each \\(j\\).
    pub fn col_sq_norms(&self) -> Vec<F>
    {
        (0.. self.n_col).map(|c| {
            self.col(c).fold(F::zero(), |acc, (_, a)| acc + a * a)
        }).collect()
    }

    /// Replaces \\(A\\) with \\({\bf diag}(d) A\\).
    pub fn scale_rows(&mut self, d: &[F])
    {
        assert_eq!(d.len(), self.n_row);

        for (r, a) in self.row_idx.iter().zip(self.values.iter_mut()) {
            *a = *a * d[*r];
        }
    }

    /// Replaces \\(A\\) with \\(A\,{\bf diag}(e)\\).
    pub fn scale_cols(&mut self, e: &[F])
    {
        assert_eq!(e.len(), self.n_col);

        for c in 0.. self.n_col {
            for a in &mut self.values[self.col_ptr[c]..self.col_ptr[c + 1]] {
                *a = *a * e[c];
            }
        }
    }

    /// Transposed matrix \\(A^T\\).
    pub fn transpose(&self) -> Self
    {
        let mut col_ptr = vec![0; self.n_row + 1];
        for r in &self.row_idx {
            col_ptr[r + 1] += 1;
        }
        for r in 0.. self.n_row {
            col_ptr[r + 1] += col_ptr[r];
        }

        let mut next = col_ptr.clone();
        let mut row_idx = vec![0; self.nnz()];
        let mut values = vec![F::zero(); self.nnz()];

        // columns are visited in order, so rows of the transpose come out sorted
        for c in 0.. self.n_col {
            for (r, a) in self.col(c) {
                let k = next[r];
                row_idx[k] = c;
                values[k] = a;
                next[r] += 1;
            }
        }

        CscMatrix {
            n_row: self.n_col,
            n_col: self.n_row,
            col_ptr, row_idx, values,
        }
    }
}

impl<L: LinAlg> Operator<L> for CscMatrix<L::F>
{
    fn size(&self) -> (usize, usize)
    {
        (self.n_row, self.n_col)
    }

    fn op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut [L::F])
    {
        self.spmv(alpha, x, beta, y);
    }

    fn trans_op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut [L::F])
    {
        self.spmv_t(alpha, x, beta, y);
    }
}

//

#[test]
fn test_csc1()
{
    use float_eq::assert_float_eq;

    let a = CscMatrix::from_rowmaj(3, 2, &[
        1., 0.,
        0., 2.,
        3., 4.,
    ]).unwrap();

    assert_eq!(a.size(), (3, 2));
    assert_eq!(a.nnz(), 4);
    assert_eq!(a.col_ptr(), &[0, 2, 4]);
    assert_eq!(a.row_idx(), &[0, 2, 1, 2]);

    let ax = a.multiply(&[1., -1.]).unwrap();
    assert_float_eq!(ax, vec![1., -2., -1.], abs_all <= 1e-15);

    let aty = a.multiply_transpose(&[1., 1., 1.]).unwrap();
    assert_float_eq!(aty, vec![4., 6.], abs_all <= 1e-15);

    assert_eq!(a.multiply(&[1.]), Err(SolverError::Dimension));
    assert_eq!(a.multiply_transpose(&[1., 2.]), Err(SolverError::Dimension));

    let at = a.transpose();
    assert_eq!(at.size(), (2, 3));
    assert_eq!(at.transpose(), a);
    let atx = at.multiply(&[1., 1., 1.]).unwrap();
    assert_float_eq!(atx, aty, abs_all <= 1e-15);

    assert_float_eq!(a.row_norms_inf(), vec![1., 2., 4.], abs_all <= 1e-15);
    assert_float_eq!(a.col_norms_inf(), vec![3., 4.], abs_all <= 1e-15);
    assert_float_eq!(a.col_sq_norms(), vec![10., 20.], abs_all <= 1e-15);
}

#[test]
fn test_csc2()
{
    use float_eq::assert_float_eq;

    // duplicates are summed, out-of-order input sorted
    let a = CscMatrix::from_triplets(2, 2,
        &[1, 0, 1, 0],
        &[0, 0, 0, 1],
        &[1., 2., 3., 5.],
    ).unwrap();

    assert_eq!(a.col_ptr(), &[0, 2, 3]);
    assert_eq!(a.row_idx(), &[0, 1, 0]);
    assert_float_eq!(a.values().to_vec(), vec![2., 4., 5.], abs_all <= 1e-15);

    let mut b = a.clone();
    b.scale_rows(&[2., 1.]);
    b.scale_cols(&[1., 10.]);
    assert_float_eq!(b.values().to_vec(), vec![4., 4., 100.], abs_all <= 1e-15);
}

#[test]
fn test_csc3()
{
    let e = Err(SolverError::InvalidProblem);

    // wrong pointer length
    assert_eq!(CscMatrix::new(2, 2, vec![0, 1], vec![0], vec![1.]), e);
    // row out of range
    assert_eq!(CscMatrix::new(2, 1, vec![0, 1], vec![2], vec![1.]), e);
    // unsorted rows
    assert_eq!(CscMatrix::new(2, 1, vec![0, 2], vec![1, 0], vec![1., 1.]), e);
    // decreasing pointers
    assert_eq!(CscMatrix::new(2, 2, vec![0, 1, 0], vec![0], vec![1.]), e);
    // non-finite
    assert_eq!(CscMatrix::new(1, 1, vec![0, 1], vec![0], vec![f64::NAN]), e);
    // triplet length mismatch
    assert_eq!(CscMatrix::from_triplets(1, 1, &[0], &[0, 0], &[1.]), e);
}
