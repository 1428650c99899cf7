//! Splitting iteration over the homogeneous self-dual embedding

use num_traits::{Float, Zero, One, NumCast};
use core::fmt::{Debug, LowerExp};
use std::time::{Duration, Instant};
use crate::solver::{LinAlg, Operator, Cone, LinSys, LinSysStrategy, SolverError, SolverParam};
use crate::solver::{SolverStatus, Iterate, SolveInfo, Solution, Progress};
use crate::{Problem, ConeProduct, Equilibration, Anderson, LinSysDirect, LinSysIndirect};
use crate::{splitm, splitm_mut};

//

/// Runs one solve of a validated problem.
pub(crate) fn run<L, CB>(problem: &Problem<L::F>, par: &SolverParam<L::F>, callback: CB)
-> Result<Solution<L::F>, SolverError>
where L: LinAlg, L::F: Float + Debug + LowerExp, CB: FnMut(&Progress<L::F>) -> bool
{
    let t_start = Instant::now();

    log::info!("----- Initializing");
    let (m, n) = problem.size();
    let cone = ConeProduct::<L>::new(problem.cone());

    // Equilibration
    let mut b_hat = problem.b().to_vec();
    let mut c_hat = problem.c().to_vec();
    let (a_scaled, eq) = if par.scaling {
        let mut a = problem.a().clone();
        let eq = Equilibration::<L>::new(&mut a, &mut b_hat, &mut c_hat, &cone, par.scale_iter, par.scale);
        (Some(a), eq)
    }
    else {
        (None, Equilibration::<L>::identity(m, n))
    };
    let a_hat = match &a_scaled {
        Some(a) => a,
        None => problem.a(),
    };

    // Linear system
    let mut linsys: Box<dyn LinSys<L> + '_> = match par.strategy {
        LinSysStrategy::Direct => {
            Box::new(LinSysDirect::<L>::new(a_hat)?)
        },
        LinSysStrategy::Indirect => {
            let cg_max_iter = par.cg_max_iter.unwrap_or(n.max(20));
            Box::new(LinSysIndirect::<L, _>::new(a_hat, &a_hat.col_sq_norms(), cg_max_iter, par.cg_rate))
        },
    };

    // h = [c; b], g = M^-1 h
    let mut h = c_hat;
    h.append(&mut b_hat);
    let mut g = h.clone();
    linsys.solve(&mut g, None);
    let hg = L::dot(&h, &g);
    if !hg.is_finite() {
        log::error!("h'g is not finite: {:?}", hg);
        return Err(SolverError::SetupFailed);
    }

    let core = SolverCore {
        par,
        problem,
        eq,
        cone,
        linsys,
        h,
        g,
        hg,
        norm_b: L::norm(problem.b()),
        norm_c: L::norm(problem.c()),
    };

    core.solve(t_start, callback)
}

//

struct Residuals<F>
{
    tau: F,
    kappa: F,
    pres: F,
    dres: F,
    gap: F,
    cri_unbdd: F,
    cri_infeas: F,
    // unscaled, not normalized
    x: Vec<F>,
    y: Vec<F>,
    s: Vec<F>,
    ctx: F,
    bty: F,
}

struct SolverCore<'a, L>
where L: LinAlg, L::F: Float + Debug + LowerExp
{
    par: &'a SolverParam<L::F>,
    problem: &'a Problem<L::F>,

    eq: Equilibration<L>,
    cone: ConeProduct<L>,
    linsys: Box<dyn LinSys<L> + 'a>,

    h: Vec<L::F>,
    g: Vec<L::F>,
    hg: L::F,

    norm_b: L::F,
    norm_c: L::F,
}

impl<'a, L> SolverCore<'a, L>
where L: LinAlg, L::F: Float + Debug + LowerExp
{
    fn solve<CB>(mut self, t_start: Instant, mut callback: CB) -> Result<Solution<L::F>, SolverError>
    where CB: FnMut(&Progress<L::F>) -> bool
    {
        let f0 = L::F::zero();
        let inf = L::F::infinity();
        let (m, n) = self.problem.size();
        let l = n + m + 1;

        // Cold start
        let mut uv = vec![f0; 2 * l];
        {
            let sqrt_l = <L::F as NumCast>::from(l).unwrap().sqrt();
            let (u, v) = uv.split_at_mut(l);
            u[l - 1] = sqrt_l;
            v[l - 1] = sqrt_l;
        }
        let mut uv_prev = vec![f0; 2 * l];
        let mut ut = vec![f0; l];

        let mut aa = Anderson::<L>::new(self.par.accel_mem, 2 * l);
        let mut uv_acc = vec![f0; 2 * l];
        let mut uv_backup = vec![f0; 2 * l];
        let mut accelerated = false;
        let mut res_before_acc = f0;
        let mut accel_rejected = 0;

        let mut last: Option<Residuals<L::F>> = None;

        let setup_time = t_start.elapsed();
        let t_iter = Instant::now();

        // Iteration
        log::info!("----- Started");
        let mut i = 0;
        loop {
            let excess_iter = if let Some(max_iter) = self.par.max_iter {
                i + 1 >= max_iter
            } else {
                false
            };

            let log_trig = if self.par.log_period > 0 {
                i % self.par.log_period == 0
            }
            else {
                if i == 0 && log::log_enabled!(log::Level::Debug) {
                    log::warn!("log_period == 0: no periodic log");
                }
                false
            };

            // Update vectors
            L::copy(&uv, &mut uv_prev);
            self.update_vecs(&mut uv, &mut ut, i);

            let mut rejected = false;
            if accelerated {
                let res = L::norm_diff(&uv, &uv_prev);
                if !(res <= self.par.accel_safeguard * res_before_acc) {
                    log::trace!("{}: accel rejected {:.2e} {:.2e}", i, res, res_before_acc);
                    L::copy(&uv_backup, &mut uv);
                    aa.reset();
                    accel_rejected += 1;
                    rejected = true;
                }
            }

            // Termination criteria
            if (i + 1) % self.par.check_period == 0 || excess_iter {
                let r = self.calc_residuals(&uv);

                if r.tau > r.kappa {
                    let term_conv = (r.pres <= self.par.eps_acc) && (r.dres <= self.par.eps_acc) && (r.gap <= self.par.eps_acc);

                    if log_trig || excess_iter || term_conv {
                        log::debug!("{}: pri_dual_gap {:.2e} {:.2e} {:.2e}", i, r.pres, r.dres, r.gap);
                    }
                    else {
                        log::trace!("{}: pri_dual_gap {:.2e} {:.2e} {:.2e}", i, r.pres, r.dres, r.gap);
                    }

                    if term_conv {
                        log::info!("----- Converged");
                        return Ok(self.make_solution(SolverStatus::Solved, r, i + 1, setup_time, t_iter.elapsed(), accel_rejected));
                    }
                }
                else {
                    let term_unbdd = r.cri_unbdd <= self.par.eps_inf;
                    let term_infeas = r.cri_infeas <= self.par.eps_inf;

                    if log_trig || excess_iter || term_unbdd || term_infeas {
                        log::debug!("{}: unbdd_infeas {:.2e} {:.2e}", i, r.cri_unbdd, r.cri_infeas);
                    }
                    else {
                        log::trace!("{}: unbdd_infeas {:.2e} {:.2e}", i, r.cri_unbdd, r.cri_infeas);
                    }

                    if term_unbdd {
                        log::warn!("----- Unbounded");
                        return Ok(self.make_solution(SolverStatus::Unbounded, r, i + 1, setup_time, t_iter.elapsed(), accel_rejected));
                    }
                    else if term_infeas {
                        log::warn!("----- Infeasible");
                        return Ok(self.make_solution(SolverStatus::Infeasible, r, i + 1, setup_time, t_iter.elapsed(), accel_rejected));
                    }
                }

                if excess_iter {
                    log::warn!("----- ExcessIter");
                    return Ok(self.make_solution(SolverStatus::MaxIterationsReached, r, i + 1, setup_time, t_iter.elapsed(), accel_rejected));
                }

                last = Some(r);
            }

            // Early stop
            let timeout = self.par.time_limit.map_or(false, |limit| t_start.elapsed() >= limit);
            let progress = match &last {
                Some(r) => Progress {
                    iter: i + 1,
                    pri_res: r.pres, dual_res: r.dres, gap: r.gap,
                    tau: r.tau, kappa: r.kappa,
                    elapsed: t_start.elapsed(),
                },
                None => Progress {
                    iter: i + 1,
                    pri_res: inf, dual_res: inf, gap: inf,
                    tau: uv[l - 1], kappa: uv[2 * l - 1],
                    elapsed: t_start.elapsed(),
                },
            };
            if timeout || callback(&progress) {
                if timeout {
                    log::warn!("----- Interrupted by time limit");
                }
                else {
                    log::warn!("----- Interrupted by callback");
                }
                let r = self.calc_residuals(&uv);
                return Ok(self.make_solution(SolverStatus::Interrupted, r, i + 1, setup_time, t_iter.elapsed(), accel_rejected));
            }

            // Acceleration
            accelerated = false;
            if !rejected && aa.update(&uv_prev, &uv, &mut uv_acc) {
                res_before_acc = L::norm_diff(&uv, &uv_prev);
                L::copy(&uv, &mut uv_backup);
                L::copy(&uv_acc, &mut uv);
                accelerated = true;
            }

            i += 1;
        } // end of loop
    }

    fn update_vecs(&mut self, uv: &mut [L::F], ut: &mut [L::F], i: usize)
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();
        let (m, n) = self.problem.size();
        let l = n + m + 1;
        let alpha = self.par.alpha;

        let (u, v) = uv.split_at_mut(l);

        // ut = (I + Q)^-1 (u + v)
        L::copy(u, ut);
        L::add(f1, v, ut);
        {
            let (ut_xy, ut_tau) = ut.split_at_mut(n + m);
            self.linsys.solve(ut_xy, Some(i));
            let tau = (ut_tau[0] + L::dot(&self.h, ut_xy)) / (f1 + self.hg);
            L::add(-tau, &self.g, ut_xy);
            ut_tau[0] = tau;
        }

        // over-relaxation
        L::scale(alpha, ut);
        L::add(f1 - alpha, u, ut);

        // u = proj(ut - v)
        L::copy(ut, u);
        L::add(-f1, v, u);
        {
            splitm_mut!(u, (_u_x; n), (u_y; m), (u_tau; 1));
            self.cone.proj(true, u_y);
            u_tau[0] = u_tau[0].max(f0);
        }

        // v = v - ut + u
        L::add(-f1, ut, v);
        L::add(f1, u, v);
    }

    fn calc_residuals(&self, uv: &[L::F]) -> Residuals<L::F>
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();
        let inf = L::F::infinity();
        let eps_zero = self.par.eps_zero;
        let (m, n) = self.problem.size();
        let a = self.problem.a();
        let b = self.problem.b();
        let c = self.problem.c();

        splitm!(uv, (u_x; n), (u_y; m), (u_tau; 1), (_v_x; n), (v_y; m), (v_kappa; 1));
        let tau = u_tau[0];
        let kappa = v_kappa[0];

        let x = self.eq.unscale_x(u_x);
        let y = self.eq.unscale_y(u_y);
        let s = self.eq.unscale_s(v_y);

        // p = A x + s, d = A' y
        let mut p = s.clone();
        Operator::<L>::op(a, f1, &x, f1, &mut p);
        let mut d = vec![f0; n];
        Operator::<L>::trans_op(a, f1, &y, f0, &mut d);

        let ctx = L::dot(c, &x);
        let bty = L::dot(b, &y);

        let cri_unbdd = if -ctx > eps_zero {
            L::norm(&p) * self.norm_c / -ctx
        }
        else {
            inf
        };
        let cri_infeas = if -bty > eps_zero {
            L::norm(&d) * self.norm_b / -bty
        }
        else {
            inf
        };

        let (pres, dres, gap) = if tau > eps_zero {
            L::add(-tau, b, &mut p);
            L::add(tau, c, &mut d);
            let pres = L::norm(&p) / tau / (f1 + self.norm_b);
            let dres = L::norm(&d) / tau / (f1 + self.norm_c);
            let gap = (ctx + bty).abs() / (tau + ctx.abs() + bty.abs());
            (pres, dres, gap)
        }
        else {
            (inf, inf, inf)
        };

        Residuals {
            tau, kappa, pres, dres, gap, cri_unbdd, cri_infeas,
            x, y, s, ctx, bty,
        }
    }

    fn make_solution(&self, status: SolverStatus, r: Residuals<L::F>, iter: usize,
        setup_time: Duration, solve_time: Duration, accel_rejected: usize)
    -> Solution<L::F>
    {
        let f1 = L::F::one();
        let inf = L::F::infinity();

        let k = match status {
            SolverStatus::Solved => r.tau,
            SolverStatus::Unbounded => -r.ctx,
            SolverStatus::Infeasible => -r.bty,
            SolverStatus::MaxIterationsReached | SolverStatus::Interrupted => {
                if r.tau > self.par.eps_zero {r.tau} else {f1}
            },
        };

        let Residuals {mut x, mut y, mut s, ..} = r;
        L::scale(k.recip(), &mut x);
        L::scale(k.recip(), &mut y);
        L::scale(k.recip(), &mut s);

        let (objective, dual_objective) = match status {
            SolverStatus::Infeasible => (inf, inf),
            SolverStatus::Unbounded => (-inf, -inf),
            _ => (r.ctx / k, -r.bty / k),
        };

        let iterate = Iterate {x, y, s};
        let (sol_x, sol_y, sol_s) = match status {
            SolverStatus::Solved => (Some(iterate.x.clone()), Some(iterate.y.clone()), Some(iterate.s.clone())),
            SolverStatus::Infeasible => (None, Some(iterate.y.clone()), None),
            _ => (None, None, None),
        };

        log::debug!("{}: tau_kappa {:.2e} {:.2e}", iter, r.tau, r.kappa);
        log::trace!("x {:?}", iterate.x);
        log::trace!("y {:?}", iterate.y);

        Solution {
            status,
            x: sol_x,
            y: sol_y,
            s: sol_s,
            iterate,
            objective,
            dual_objective,
            info: SolveInfo {
                iter,
                pri_res: r.pres,
                dual_res: r.dres,
                gap: r.gap,
                tau: r.tau,
                kappa: r.kappa,
                setup_time,
                solve_time,
                accel_rejected,
                exp_fallbacks: self.cone.exp_fallbacks(),
                cg_iters: self.linsys.inner_iters(),
            },
        }
    }
}
