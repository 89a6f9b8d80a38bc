// demos/error_handling_demo.rs
use bs_surface::analytics::PricingInputs;
use bs_surface::error::PricingError;
use bs_surface::grid::{filter_market, price_grid, GridConfig, GridParams, MarketWindow};
use bs_surface::market::{assemble_parameters, AssemblerConfig, MarketDataSource, SyntheticMarket};
use bs_surface::pnl::compute_pnl;
use bs_surface::volatility::get_volatility;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Error Handling Demo for bs-surface");
    println!("==================================\n");

    // Test 1: Expiration equal to elapsed time
    println!("1. Pricing an option with T == t...");
    match PricingInputs::new(100.0, 100.0, 1.0, 1.0, 0.05, 0.2).call_price() {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 2: Zero volatility
    println!("\n2. Pricing with sigma = 0...");
    match PricingInputs::new(100.0, 100.0, 1.0, 0.0, 0.05, 0.0).prices() {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: Grid with expired columns keeps going
    println!("\n3. Pricing a grid where some expirations are already past...");
    let params = GridParams::new(100.0, 0.5, 0.05, 0.2);
    match price_grid(&[95.0, 100.0, 105.0], &[0.25, 0.75, 1.0], &params, &GridConfig::default()) {
        Ok(grid) => println!(
            "   ✓ Grid priced: {} of {} cells available",
            grid.call.count_available(),
            grid.shape().0 * grid.shape().1
        ),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 4: Same grid with fail_fast
    println!("\n4. Same grid with fail_fast enabled...");
    let strict = GridConfig {
        fail_fast: true,
        ..GridConfig::default()
    };
    match price_grid(&[95.0, 100.0, 105.0], &[0.25, 0.75, 1.0], &params, &strict) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 5: Too little history
    println!("\n5. Estimating volatility from two closes...");
    match get_volatility(&[100.0, 101.0], "log") {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 6: Unsupported estimator
    println!("\n6. Requesting the garch estimator...");
    match get_volatility(&[100.0, 101.0, 99.0, 102.0], "garch") {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 7: Unknown ticker
    println!("\n7. Assembling parameters for an unknown ticker...");
    let market = SyntheticMarket::new(bs_surface::dates::today(), 4.5);
    match assemble_parameters(&market, "NOPE", market.as_of(), &AssemblerConfig::default()) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }
    if let Err(e) = market.option_chain("NOPE") {
        println!("   ✓ Chain lookup also failed: {}", e);
    }

    // Test 8: Window outside the market matrix
    println!("\n8. Filtering with an out-of-range window...");
    match price_grid(&[95.0, 100.0], &[0.5, 1.0], &GridParams::new(100.0, 0.0, 0.05, 0.2), &GridConfig::default()) {
        Ok(grid) => match filter_market(&grid, &MarketWindow::new(0, 4, 0, 2)) {
            Ok(_) => println!("   Unexpected: Should have failed!"),
            Err(e) => println!("   ✓ Caught error: {}", e),
        },
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 9: Error type matching
    println!("\n9. Testing error type matching...");
    match compute_pnl(-100.0, 5.0, 3.0) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(PricingError::Domain {
            parameter,
            value,
            constraint,
        }) => {
            println!("   ✓ Caught Domain: {} = {} ({})", parameter, value, constraint);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    println!("\n✓ Error handling demo complete!");
    println!("All error cases were properly caught and handled.");
}
