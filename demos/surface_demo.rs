// demos/surface_demo.rs
//! End-to-end walk through the library against the offline synthetic market:
//! parameters from history, a pricing and Greek surface over the dashboard
//! window, the market comparison and a PnL profile. CSV files land in `out/`.
use bs_surface::analytics::{compute_greeks, GreekSelection, OptionSide, PricingInputs};
use bs_surface::dates::format_expiration;
use bs_surface::grid::{
    default_window, filter_market, greek_surfaces, model_error, price_grid, GridConfig, GridParams,
};
use bs_surface::market::{assemble_parameters, AssemblerConfig, MarketDataSource, SyntheticMarket, SyntheticTicker};
use bs_surface::math_utils::Timer;
use bs_surface::output;
use bs_surface::pnl::compute_pnl;
use bs_surface::volatility::VolatilityMethod;
use bs_surface::PricingResult;
use chrono::NaiveDate;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TICKER: &str = "DEMO";

fn main() -> PricingResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap_or_else(bs_surface::dates::today);
    let market = SyntheticMarket::new(today, 4.3).with_ticker(
        TICKER,
        SyntheticTicker {
            s0: 180.0,
            mu: 0.06,
            sigma: 0.28,
            seed: 2024,
        },
    );

    println!("Black-Scholes Surface Demo");
    println!("==========================\n");

    // Parameters under each estimator
    println!("Volatility estimates for {} as of {}:", TICKER, today);
    for method in VolatilityMethod::ALL {
        let config = AssemblerConfig {
            method,
            ..AssemblerConfig::default()
        };
        let p = assemble_parameters(&market, TICKER, today, &config)?;
        println!("  {:<9} sigma = {:.4}", method.name(), p.sigma);
    }
    let bs = assemble_parameters(&market, TICKER, today, &AssemblerConfig::default())?;
    println!("\nSpot S = {:.2}, risk-free r = {:.4}, sigma = {:.4}\n", bs.s, bs.r, bs.sigma);

    // Market chain and the window the dashboard opens on
    let surface = market.option_chain(TICKER)?.to_matrices(today)?;
    let window = default_window(surface.prices.strikes(), surface.expiration_dates.len(), bs.s)?;
    let filtered = filter_market(&surface.prices, &window)?;
    let (rows, cols) = filtered.shape();
    println!("Market window: {} strikes x {} expirations after sparse-row removal", rows, cols);
    for date in &surface.expiration_dates[window.exp_start..window.exp_end] {
        print!("  {}", format_expiration(*date));
    }
    println!("\n");

    // Model surface over the same axes
    let params = GridParams::new(bs.s, 0.0, bs.r, bs.sigma);
    let config = GridConfig::default();
    let mut timer = Timer::new();
    let model = price_grid(filtered.strikes(), filtered.expirations(), &params, &config)?;
    info!(elapsed_ms = timer.elapsed_ms(), "model surface priced");

    let error = model_error(&model, &filtered)?;
    if let Some((lo, hi)) = error.call.available_range() {
        println!("Call model error range: [{:.3}, {:.3}]", lo, hi);
    }
    if let Some((lo, hi)) = error.put.available_range() {
        println!("Put model error range:  [{:.3}, {:.3}]", lo, hi);
    }

    // Greek surfaces
    timer.start();
    let selection = GreekSelection::DELTA | GreekSelection::GAMMA | GreekSelection::VEGA;
    let greeks = greek_surfaces(selection, filtered.strikes(), filtered.expirations(), &params, &config)?;
    println!("\nGreek surfaces computed in {:.3} ms", timer.elapsed_ms());
    for (greek, m) in &greeks {
        if let Some((lo, hi)) = m.call.available_range() {
            println!("  {:<6} call range [{:.4}, {:.4}]", greek.name(), lo, hi);
        }
    }

    // One contract in detail
    let k = filtered.strikes().get(rows / 2).copied().unwrap_or(bs.s.round());
    let big_t = filtered.expirations().last().copied().unwrap_or(0.25);
    let inputs = PricingInputs::new(bs.s, k, big_t, 0.0, bs.r, bs.sigma);
    let (call, put) = inputs.prices()?;
    let single = compute_greeks(&inputs, config.convention)?;
    println!("\nK = {}, T = {:.4}:", k, big_t);
    for side in [OptionSide::Call, OptionSide::Put] {
        let g = single.side(side);
        println!(
            "  {:<4} delta {:+.4} gamma {:.4} theta {:+.4} vega {:.4} rho {:+.4}",
            side.to_string(),
            g.delta,
            g.gamma,
            g.theta,
            g.vega,
            g.rho
        );
    }

    let pnl = compute_pnl(k, call, put)?;
    println!(
        "  call {:.4} breaks even at {:.2}, put {:.4} breaks even at {:.2}",
        call, pnl.call_break_even, put, pnl.put_break_even
    );

    fs::create_dir_all("out")?;
    output::write_matrix_to_csv("out/model_call.csv", &model.call)?;
    output::write_matrix_to_csv("out/market_call.csv", &filtered.call)?;
    output::write_matrix_to_csv("out/model_error_call.csv", &error.call)?;
    output::write_pnl_to_csv("out/pnl.csv", &pnl)?;
    output::write_summary_to_csv(
        "out/summary.csv",
        &[
            ("ticker", TICKER.to_string()),
            ("spot", format!("{:.4}", bs.s)),
            ("rate", format!("{:.4}", bs.r)),
            ("sigma", format!("{:.4}", bs.sigma)),
            ("strike", k.to_string()),
            ("call", format!("{:.4}", call)),
            ("put", format!("{:.4}", put)),
        ],
    )?;
    println!("\nResults written to out/");
    Ok(())
}
