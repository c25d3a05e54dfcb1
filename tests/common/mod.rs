macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "expected {} within {} of {} (off by {})",
            l, $tol, r, (l - r).abs()
        );
    };
}
