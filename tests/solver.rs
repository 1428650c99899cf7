use float_eq::assert_float_eq;
use std::sync::Arc;
use std::time::Duration;
use conesplit::prelude::*;
use conesplit::*;

type La = FloatGeneric<f64>;

type ASolver = Solver<La>;

// minimize x0 + x1 subject to x0 >= 1, x1 >= 2, x0 + x1 <= 10
fn lp_rows(scale: f64) -> Problem<f64>
{
    let a = CscMatrix::from_rowmaj(3, 2, &[
        -scale, 0.,
        0., -1.,
        1., 1.,
    ]).unwrap();

    Problem::new(a, vec![-scale, -2., 10.], vec![1., 1.], vec![ConeBlock::NonnegativeOrthant(3)])
}

fn accurate() -> ASolver
{
    ASolver::new().par(|p| {
        p.eps_acc = 1e-6;
        p.eps_inf = 1e-6;
        p.max_iter = Some(100_000);
    })
}

//

#[test]
fn test_max_iter()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.eps_acc = 1e-9;
        p.max_iter = Some(2);
    });
    let rslt = s.solve(&lp_rows(1.)).unwrap();

    assert_eq!(rslt.status, SolverStatus::MaxIterationsReached);
    assert_eq!(rslt.info.iter, 2);
    assert!(rslt.x.is_none());
    assert_eq!(rslt.iterate.x.len(), 2);
    assert_eq!(rslt.iterate.y.len(), 3);
}

//

#[test]
fn test_callback()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.eps_acc = 1e-9;
    });
    let mut calls = 0;
    let rslt = s.solve_with_callback(&lp_rows(1.), |progress| {
        calls += 1;
        assert_eq!(progress.iter, calls);
        progress.iter >= 3
    }).unwrap();

    assert_eq!(rslt.status, SolverStatus::Interrupted);
    assert_eq!(rslt.info.iter, 3);
    assert_eq!(calls, 3);
}

//

#[test]
fn test_time_limit()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new().par(|p| {
        p.eps_acc = 1e-9;
        p.time_limit = Some(Duration::ZERO);
    });
    let rslt = s.solve(&lp_rows(1.)).unwrap();

    assert_eq!(rslt.status, SolverStatus::Interrupted);
    assert_eq!(rslt.info.iter, 1);
}

//

#[test]
fn test_invalid()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let a = CscMatrix::from_rowmaj(2, 1, &[1., 1.]).unwrap();
    let problem = Problem::new(a.clone(), vec![1., 1.], vec![1.], vec![ConeBlock::NonnegativeOrthant(3)]);
    assert_eq!(ASolver::new().solve(&problem).unwrap_err(), SolverError::InvalidProblem);

    let problem = Problem::new(a.clone(), vec![1.], vec![1.], vec![ConeBlock::NonnegativeOrthant(2)]);
    assert_eq!(ASolver::new().solve(&problem).unwrap_err(), SolverError::InvalidProblem);

    let problem = Problem::new(a, vec![1., f64::NAN], vec![1.], vec![ConeBlock::NonnegativeOrthant(2)]);
    assert_eq!(ASolver::new().solve(&problem).unwrap_err(), SolverError::InvalidProblem);

    let s = ASolver::new().par(|p| {
        p.alpha = 2.5;
    });
    let rslt = s.solve(&lp_rows(1.)).unwrap_err();
    println!("{}", rslt);
    assert_eq!(rslt, SolverError::InvalidParam);
}

//

#[test]
fn test_scaling_invariance()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let r1 = accurate().solve(&lp_rows(1.)).unwrap();
    let r10 = accurate().solve(&lp_rows(10.)).unwrap();
    let r_off = accurate().par(|p| {
        p.scaling = false;
    }).solve(&lp_rows(10.)).unwrap();

    assert_eq!(r1.status, SolverStatus::Solved);
    assert_eq!(r10.status, SolverStatus::Solved);
    assert_eq!(r_off.status, SolverStatus::Solved);

    let x = vec![1., 2.];
    assert_float_eq!(r1.x.unwrap(), x, abs_all <= 1e-3);
    assert_float_eq!(r10.x.unwrap(), x, abs_all <= 1e-3);
    assert_float_eq!(r_off.x.unwrap(), x, abs_all <= 1e-3);
    assert_float_eq!(r10.objective, r1.objective, abs <= 1e-3);
}

//

#[test]
fn test_strategies()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let direct = accurate().solve(&lp_rows(1.)).unwrap();
    let indirect = accurate().par(|p| {
        p.strategy = LinSysStrategy::Indirect;
    }).solve(&lp_rows(1.)).unwrap();

    assert_eq!(direct.status, SolverStatus::Solved);
    assert_eq!(indirect.status, SolverStatus::Solved);
    assert_float_eq!(direct.x.unwrap(), indirect.x.unwrap(), abs_all <= 1e-3);
    assert_float_eq!(direct.y.unwrap(), indirect.y.unwrap(), abs_all <= 1e-3);
    assert_eq!(direct.info.cg_iters, 0);
    assert!(indirect.info.cg_iters > 0);
}

//

#[test]
fn test_anderson()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let rslt = accurate().par(|p| {
        p.accel_mem = 5;
    }).solve(&lp_rows(1.)).unwrap();
    println!("{:?}", rslt.info);

    assert_eq!(rslt.status, SolverStatus::Solved);
    assert_float_eq!(rslt.x.unwrap(), vec![1., 2.], abs_all <= 1e-3);
}

//

#[test]
fn test_reproducible()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let r1 = accurate().solve(&lp_rows(1.)).unwrap();
    let r2 = accurate().solve(&lp_rows(1.)).unwrap();

    assert_eq!(r1.status, r2.status);
    assert_eq!(r1.info.iter, r2.info.iter);
    assert_eq!(r1.x, r2.x);
    assert_eq!(r1.y, r2.y);
    assert_eq!(r1.iterate, r2.iterate);
}

//

#[test]
fn test_parallel()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let a = Arc::new(CscMatrix::from_rowmaj(2, 2, &[
        -1., 0.,
        0., -1.,
    ]).unwrap());

    let handles: Vec<_> = (1..=4).map(|k| {
        let problem = Problem::new(a.clone(), vec![-(k as f64), -2.], vec![1., 1.], vec![ConeBlock::NonnegativeOrthant(2)]);
        std::thread::spawn(move || {
            accurate().solve(&problem).unwrap()
        })
    }).collect();

    for (k, h) in (1..=4).zip(handles) {
        let rslt = h.join().unwrap();
        assert_eq!(rslt.status, SolverStatus::Solved);
        assert_float_eq!(rslt.objective, k as f64 + 2., abs <= 1e-3);
    }
    assert_eq!(Arc::strong_count(&a), 1);
}

//

#[test]
fn test_data_scaled()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let k = 10.;
    let p1 = lp_rows(1.);
    let a_k = CscMatrix::from_rowmaj(3, 2, &[
        -k, 0.,
        0., -k,
        k, k,
    ]).unwrap();
    let pk = Problem::new(a_k,
        p1.b().iter().map(|v| v * k).collect(),
        p1.c().iter().map(|v| v * k).collect(),
        p1.cone().to_vec());

    let r1 = accurate().solve(&p1).unwrap();
    let rk = accurate().solve(&pk).unwrap();

    assert_eq!(rk.status, SolverStatus::Solved);
    assert_float_eq!(rk.x.unwrap(), r1.x.unwrap(), abs_all <= 1e-3);
    assert_float_eq!(rk.objective, k * r1.objective, rmax <= 1e-3);
}
