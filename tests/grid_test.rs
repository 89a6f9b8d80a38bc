// tests/grid_test.rs
use approx::assert_relative_eq;
use bs_surface::analytics::{Greek, GreekSelection, PricingInputs, TimeConvention};
use bs_surface::cache::{CacheConfig, PricingCache};
use bs_surface::error::PricingError;
use bs_surface::grid::{
    default_window, expiration_range, filter_market, greek_grid, greek_surfaces, model_error, price_grid,
    price_grid_cached, remove_sparse_rows, CallPutMatrices, GridConfig, GridParams, MarketWindow, OptionMatrix,
    TimeScale,
};
use bs_surface::market::{
    assemble_parameters, AssemblerConfig, MarketDataSource, SyntheticMarket, SyntheticTicker,
};
use chrono::NaiveDate;

const NA: f64 = f64::NAN;

fn params() -> GridParams {
    GridParams::new(100.0, 0.0, 0.05, 0.2)
}

#[test]
fn test_grid_preserves_axis_order() {
    // deliberately unsorted axes
    let strikes = [110.0, 90.0, 100.0, 95.0];
    let expirations = [1.0, 0.25, 0.5];
    let grid = price_grid(&strikes, &expirations, &params(), &GridConfig::default()).unwrap();

    assert_eq!(grid.shape(), (4, 3));
    assert_eq!(grid.strikes(), &strikes[..]);
    assert_eq!(grid.expirations(), &expirations[..]);
    for (i, &k) in strikes.iter().enumerate() {
        for (j, &e) in expirations.iter().enumerate() {
            let (c, p) = PricingInputs::new(100.0, k, e, 0.0, 0.05, 0.2).prices().unwrap();
            assert_eq!(grid.call.get(i, j), Some(c));
            assert_eq!(grid.put.get(i, j), Some(p));
        }
    }
}

#[test]
fn test_parallel_grid_matches_serial() {
    let strikes: Vec<f64> = (0..50).map(|i| 50.0 + 2.0 * i as f64).collect();
    let expirations = expiration_range(TimeScale::Week, 30);
    let parallel = GridConfig {
        parallel_threshold: 1,
        ..GridConfig::default()
    };
    let a = price_grid(&strikes, &expirations, &params(), &parallel).unwrap();
    let b = price_grid(&strikes, &expirations, &params(), &GridConfig::serial()).unwrap();
    assert_eq!(a.call.values(), b.call.values());
    assert_eq!(a.put.values(), b.put.values());
}

#[test]
fn test_expired_cells_are_not_available() {
    let p = GridParams::new(100.0, 0.5, 0.05, 0.2);
    let grid = price_grid(&[100.0], &[0.25, 0.5, 1.0], &p, &GridConfig::default()).unwrap();
    assert_eq!(grid.call.get(0, 0), None);
    assert_eq!(grid.put.get(0, 1), None);
    assert!(grid.call.get(0, 2).is_some());

    let strict = GridConfig {
        fail_fast: true,
        ..GridConfig::default()
    };
    assert!(price_grid(&[100.0], &[0.25, 1.0], &p, &strict).unwrap_err().is_domain());
}

#[test]
fn test_non_finite_axis_values_only_blank_their_cells() {
    let strikes = [95.0, f64::NAN, 105.0];
    let expirations = [0.5, f64::INFINITY];
    let grid = price_grid(&strikes, &expirations, &params(), &GridConfig::default()).unwrap();

    assert_eq!(grid.shape(), (3, 2));
    assert_eq!(grid.call.row_missing_counts(), vec![1, 2, 1]);
    assert_eq!(grid.put.count_available(), 2);
    let (c, _) = PricingInputs::new(100.0, 105.0, 0.5, 0.0, 0.05, 0.2).prices().unwrap();
    assert_eq!(grid.call.get(2, 0), Some(c));

    let greeks = greek_grid(Greek::Delta, &strikes, &expirations, &params(), &GridConfig::default()).unwrap();
    assert_eq!(greeks.call.count_available(), 2);

    let strict = GridConfig {
        fail_fast: true,
        ..GridConfig::default()
    };
    assert!(price_grid(&strikes, &expirations, &params(), &strict).unwrap_err().is_domain());
}

#[test]
fn test_empty_axes_give_empty_grid() {
    let grid = price_grid(&[], &[0.5], &params(), &GridConfig::default()).unwrap();
    assert_eq!(grid.shape(), (0, 1));
    let grid = price_grid(&[100.0], &[], &params(), &GridConfig::default()).unwrap();
    assert_eq!(grid.shape(), (1, 0));
}

#[test]
fn test_greek_surfaces_follow_selection_order() {
    let selection = GreekSelection::RHO | GreekSelection::DELTA | GreekSelection::VEGA;
    let strikes = [90.0, 100.0, 110.0];
    let expirations = [0.5, 1.0];
    let surfaces = greek_surfaces(selection, &strikes, &expirations, &params(), &GridConfig::default()).unwrap();
    let order: Vec<Greek> = surfaces.iter().map(|(g, _)| *g).collect();
    assert_eq!(order, vec![Greek::Delta, Greek::Vega, Greek::Rho]);

    let vega = &surfaces[1].1;
    assert_eq!(vega.call.values(), vega.put.values());
    // vega at one year, at the money
    assert_relative_eq!(vega.call.get(1, 1).unwrap(), 0.375_240_346_916_937_9, max_relative = 1e-9);
}

#[test]
fn test_greek_grid_convention_changes_theta() {
    let p = GridParams::new(100.0, 0.5, 0.05, 0.2);
    let remaining = greek_grid(Greek::Theta, &[100.0], &[1.5], &p, &GridConfig::default()).unwrap();
    let maturity_cfg = GridConfig {
        convention: TimeConvention::Maturity,
        ..GridConfig::default()
    };
    let maturity = greek_grid(Greek::Theta, &[100.0], &[1.5], &p, &maturity_cfg).unwrap();
    assert_relative_eq!(remaining.call.get(0, 0).unwrap(), -0.017_572_678_209_419_72, max_relative = 1e-9);
    assert_relative_eq!(maturity.call.get(0, 0).unwrap(), -0.015_506_117_664_360_762, max_relative = 1e-9);
}

#[test]
fn test_cached_grid_reuses_result() {
    let mut cache: PricingCache<CallPutMatrices> = PricingCache::new(CacheConfig::default()).unwrap();
    let strikes = [95.0, 100.0, 105.0];
    let expirations = [0.25, 0.5];
    let config = GridConfig::default();

    let first = price_grid_cached(&strikes, &expirations, &params(), &config, &mut cache).unwrap();
    let second = price_grid_cached(&strikes, &expirations, &params(), &config, &mut cache).unwrap();
    assert_eq!(first.call.values(), second.call.values());
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().misses, 1);

    let other = GridParams::new(101.0, 0.0, 0.05, 0.2);
    price_grid_cached(&strikes, &expirations, &other, &config, &mut cache).unwrap();
    assert_eq!(cache.stats().misses, 2);
    assert_eq!(cache.len(), 2);
}

fn sparse_market() -> CallPutMatrices {
    let strikes = vec![90.0, 95.0, 100.0, 105.0];
    let expirations = vec![0.1, 0.2, 0.3, 0.4, 0.5];
    let call = OptionMatrix::from_rows(
        vec![
            vec![11.0, 12.0, 13.0, 14.0, 15.0],
            vec![7.0, NA, NA, NA, 9.0],
            vec![3.0, 4.0, NA, 5.0, 6.0],
            vec![1.0, 1.5, 2.0, 2.5, 3.0],
        ],
        strikes.clone(),
        expirations.clone(),
    )
    .unwrap();
    let put = OptionMatrix::from_rows(
        vec![
            vec![0.5, 0.8, 1.0, 1.2, 1.4],
            vec![1.0, 1.5, 2.0, 2.4, 2.8],
            vec![2.5, 3.0, 3.5, 4.0, 4.4],
            vec![NA, NA, NA, 6.0, 6.5],
        ],
        strikes,
        expirations,
    )
    .unwrap();
    CallPutMatrices { call, put }
}

#[test]
fn test_sparse_rows_dropped_from_both_sides() {
    let filtered = remove_sparse_rows(&sparse_market()).unwrap();
    // 95 misses 3 of 5 calls, 105 misses 3 of 5 puts
    assert_eq!(filtered.strikes(), &[90.0, 100.0]);
    assert_eq!(filtered.put.strikes(), &[90.0, 100.0]);
    assert_eq!(filtered.put.get(1, 0), Some(2.5));
    assert_eq!(filtered.call.get(1, 2), None);
}

#[test]
fn test_window_out_of_bounds() {
    let err = filter_market(&sparse_market(), &MarketWindow::new(0, 5, 0, 2)).unwrap_err();
    assert!(matches!(err, PricingError::InvalidArgument { .. }));
}

#[test]
fn test_model_error_propagates_missing_quotes() {
    let market = sparse_market();
    let model = price_grid(market.strikes(), market.expirations(), &params(), &GridConfig::default()).unwrap();
    let err = model_error(&model, &market).unwrap();
    assert_eq!(err.shape(), market.shape());
    assert_eq!(err.call.get(1, 1), None);
    let expected = model.call.get(0, 0).unwrap() - 11.0;
    assert_relative_eq!(err.call.get(0, 0).unwrap(), expected, epsilon = 1e-12);
}

#[test]
fn test_synthetic_chain_through_filter() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let market = SyntheticMarket::new(today, 4.5).with_ticker(
        "DEMO",
        SyntheticTicker {
            s0: 150.0,
            mu: 0.04,
            sigma: 0.25,
            seed: 42,
        },
    );

    let bs = assemble_parameters(&market, "DEMO", today, &AssemblerConfig::default()).unwrap();
    assert_relative_eq!(bs.r, 0.045, epsilon = 1e-15);
    assert!(bs.sigma > 0.1 && bs.sigma < 0.4, "sigma = {}", bs.sigma);

    let surface = market.option_chain("DEMO").unwrap().to_matrices(today).unwrap();
    let prices = &surface.prices;
    let window = default_window(prices.strikes(), prices.expirations().len(), bs.s).unwrap();
    let filtered = filter_market(prices, &window).unwrap();

    let (rows, cols) = filtered.shape();
    assert!(rows <= window.strike_end - window.strike_start);
    assert_eq!(cols, window.exp_end - window.exp_start);
    for counts in [filtered.call.row_missing_counts(), filtered.put.row_missing_counts()] {
        assert!(counts.iter().all(|&missing| 2 * missing < cols));
    }
}

#[test]
fn test_spot_independent_of_lookback() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let market = SyntheticMarket::new(today, 4.5).with_ticker(
        "DEMO",
        SyntheticTicker {
            s0: 150.0,
            mu: 0.04,
            sigma: 0.25,
            seed: 42,
        },
    );

    let short = AssemblerConfig {
        lookback_days: 30,
        ..AssemblerConfig::default()
    };
    let a = assemble_parameters(&market, "DEMO", today, &short).unwrap();
    let b = assemble_parameters(&market, "DEMO", today, &AssemblerConfig::default()).unwrap();
    assert_eq!(a.s, b.s);

    let strikes = market.option_chain("DEMO").unwrap().strike_union();
    assert!(strikes.iter().any(|&k| k < a.s), "no strike below spot {}", a.s);
    assert!(strikes.iter().any(|&k| k > a.s), "no strike above spot {}", a.s);
}
