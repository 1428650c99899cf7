use num_traits::Float;
use core::time::Duration;
use crate::solver::{LinSysStrategy, SolverError};

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParam<F: Float>
{
    /// Linear system strategy.
    pub strategy: LinSysStrategy,
    /// Max iteration number of first-order algorithm. `None` means no upper limit.
    pub max_iter: Option<usize>,
    /// Tolerance of the primal residual, dual residual and duality gap.
    pub eps_acc: F,
    /// Tolerance of the unboundness and infeasibility.
    pub eps_inf: F,
    /// Tolerance of small positive value to avoid division by zero.
    pub eps_zero: F,
    /// Whether to equilibrate the problem data.
    pub scaling: bool,
    /// Extra factor applied to the scaled \\(b\\) and \\(c\\) after equilibration.
    pub scale: F,
    /// Number of equilibration passes.
    pub scale_iter: usize,
    /// Over-relaxation parameter in \\((0, 2)\\).
    pub alpha: F,
    /// Anderson acceleration memory. `0` disables acceleration.
    pub accel_mem: usize,
    /// An accelerated step is rejected when it grows the fixed-point residual by more than this factor.
    pub accel_safeguard: F,
    /// Period of iterations to check termination criteria.
    pub check_period: usize,
    /// Inner iteration budget of the indirect linear system. `None` means \\(\max(n, 20)\\).
    pub cg_max_iter: Option<usize>,
    /// Tightening exponent of the inner tolerance of the indirect linear system.
    pub cg_rate: F,
    /// Wall-clock limit of iterations. `None` means no limit.
    pub time_limit: Option<Duration>,
    /// Period of iterations to output progress log(for debug/trace level).
    pub log_period: usize,
}

impl<F: Float> Default for SolverParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        SolverParam {
            strategy: LinSysStrategy::Direct,
            max_iter: Some(5000),
            eps_acc: ten.powi(-4),
            eps_inf: ten.powi(-4),
            eps_zero: ten.powi(-12),
            scaling: true,
            scale: F::one(),
            scale_iter: 10,
            alpha: F::from(1.5).unwrap(),
            accel_mem: 0,
            accel_safeguard: F::one(),
            check_period: 1,
            cg_max_iter: None,
            cg_rate: F::from(2).unwrap(),
            time_limit: None,
            log_period: 100,
        }
    }
}

impl<F: Float> SolverParam<F>
{
    /// Checks ranges of the parameters.
    /// 
    /// Returns `Ok`, or `Err` with [`SolverError::InvalidParam`].
    pub fn validate(&self) -> Result<(), SolverError>
    {
        let f0 = F::zero();
        let f2 = F::one() + F::one();

        let positive = |v: F| v > f0 && v.is_finite();

        if self.max_iter == Some(0) {
            log::error!("max_iter must be positive");
            return Err(SolverError::InvalidParam);
        }
        if !positive(self.eps_acc) || !positive(self.eps_inf) || !positive(self.eps_zero) {
            log::error!("eps_acc, eps_inf and eps_zero must be positive");
            return Err(SolverError::InvalidParam);
        }
        if !positive(self.scale) {
            log::error!("scale must be positive");
            return Err(SolverError::InvalidParam);
        }
        if !(self.alpha > f0 && self.alpha < f2) {
            log::error!("alpha must be in (0, 2)");
            return Err(SolverError::InvalidParam);
        }
        if !positive(self.accel_safeguard) {
            log::error!("accel_safeguard must be positive");
            return Err(SolverError::InvalidParam);
        }
        if self.check_period == 0 {
            log::error!("check_period must be positive");
            return Err(SolverError::InvalidParam);
        }
        if self.cg_max_iter == Some(0) {
            log::error!("cg_max_iter must be positive");
            return Err(SolverError::InvalidParam);
        }
        if !(self.cg_rate >= f0 && self.cg_rate.is_finite()) {
            log::error!("cg_rate must be nonnegative");
            return Err(SolverError::InvalidParam);
        }

        Ok(())
    }
}

//

#[test]
fn test_param1()
{
    let par = SolverParam::<f64>::default();
    assert_eq!(par.validate(), Ok(()));
    assert_eq!(par.strategy, LinSysStrategy::Direct);
    assert_eq!(par.max_iter, Some(5000));
    assert!(par.scaling);
    assert_eq!(par.accel_mem, 0);

    let bad = [
        SolverParam { alpha: 2., ..par.clone() },
        SolverParam { eps_acc: 0., ..par.clone() },
        SolverParam { max_iter: Some(0), ..par.clone() },
        SolverParam { check_period: 0, ..par.clone() },
        SolverParam { scale: f64::NAN, ..par.clone() },
        SolverParam { cg_rate: -1., ..par.clone() },
    ];
    for p in bad.iter() {
        assert_eq!(p.validate(), Err(SolverError::InvalidParam));
    }
}
