// scripts/benchmark.rs
use bs_surface::analytics::GreekSelection;
use bs_surface::grid::{expiration_range, greek_surfaces, price_grid, GridConfig, GridParams, TimeScale};
use bs_surface::market::synthetic::simulate_closes;
use bs_surface::math_utils::Timer;
use bs_surface::volatility::VolatilityMethod;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process::Command;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rust_version: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        SystemInfo {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            cpu_cores: num_cpus::get(),
            rust_version: Self::get_rust_version(),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("sysctl")
                .args(["-n", "machdep.cpu.brand_string"])
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown CPU".to_string())
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            "Unknown CPU".to_string()
        }
    }

    fn get_rust_version() -> String {
        Command::new("rustc")
            .arg("--version")
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_else(|_| "Unknown Rust version".to_string())
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    cells: usize,
    time_ms: f64,
    throughput_cells_per_sec: f64,
    checksum: f64,
}

impl BenchmarkResult {
    fn new(name: String, cells: usize, time_ms: f64, checksum: f64) -> Self {
        BenchmarkResult {
            name,
            cells,
            time_ms,
            throughput_cells_per_sec: cells as f64 / (time_ms.max(1e-6) / 1000.0),
            checksum,
        }
    }
}

fn axes(strike_count: usize, expiration_count: usize) -> (Vec<f64>, Vec<f64>) {
    let strikes = (0..strike_count)
        .map(|i| 50.0 + 100.0 * i as f64 / strike_count as f64)
        .collect();
    (strikes, expiration_range(TimeScale::Day, expiration_count))
}

fn run_grid_benchmarks() -> Result<Vec<BenchmarkResult>, Box<dyn std::error::Error>> {
    let mut results = Vec::new();
    let params = GridParams::new(100.0, 0.0, 0.05, 0.2);
    let sizes = [(50, 50), (200, 250), (500, 1000)];

    for &(m, n) in &sizes {
        println!("Pricing {} x {} grid...", m, n);
        let (strikes, expirations) = axes(m, n);

        let mut timer = Timer::new();
        let serial = price_grid(&strikes, &expirations, &params, &GridConfig::serial())?;
        let serial_ms = timer.elapsed_ms();
        results.push(BenchmarkResult::new(
            format!("Price grid serial {}x{}", m, n),
            m * n,
            serial_ms,
            serial.call.values().sum(),
        ));

        timer.start();
        let parallel = price_grid(&strikes, &expirations, &params, &GridConfig::default())?;
        let parallel_ms = timer.elapsed_ms();
        results.push(BenchmarkResult::new(
            format!("Price grid parallel {}x{}", m, n),
            m * n,
            parallel_ms,
            parallel.call.values().sum(),
        ));

        println!("  serial {:.2} ms, parallel {:.2} ms, speedup {:.2}x", serial_ms, parallel_ms, serial_ms / parallel_ms);
    }

    let (strikes, expirations) = axes(200, 250);
    println!("Computing all Greek surfaces on 200 x 250 grid...");
    let timer = Timer::new();
    let surfaces = greek_surfaces(GreekSelection::all(), &strikes, &expirations, &params, &GridConfig::default())?;
    let time_ms = timer.elapsed_ms();
    let checksum = surfaces.iter().map(|(_, g)| g.call.values().sum()).sum();
    results.push(BenchmarkResult::new(
        "Greek surfaces 200x250".to_string(),
        surfaces.len() * strikes.len() * expirations.len(),
        time_ms,
        checksum,
    ));

    Ok(results)
}

fn run_volatility_benchmarks() -> Result<Vec<BenchmarkResult>, Box<dyn std::error::Error>> {
    let mut results = Vec::new();
    let closes = simulate_closes(100.0, 0.05, 0.2, 100_000, 42)?;

    for method in VolatilityMethod::ALL {
        println!("Estimating {} volatility over {} closes...", method, closes.len());
        let timer = Timer::new();
        let sigma = method.estimate(&closes)?;
        results.push(BenchmarkResult::new(
            format!("Volatility {}", method),
            closes.len(),
            timer.elapsed_ms(),
            sigma,
        ));
    }

    Ok(results)
}

fn write_results_to_csv(results: &[BenchmarkResult], system_info: &SystemInfo, filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(file, "# Benchmark Date: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(file, "#")?;

    writeln!(file, "Benchmark,Cells,Time_ms,Throughput_cells_per_sec,Checksum")?;
    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{:.6}",
            result.name, result.cells, result.time_ms, result.throughput_cells_per_sec, result.checksum
        )?;
    }

    println!("Results written to {}", filename);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("bs-surface Benchmark Suite");
    println!("==========================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let mut results = run_grid_benchmarks()?;
    results.extend(run_volatility_benchmarks()?);

    println!("\n{:<32} {:>10} {:>12} {:>16}", "Benchmark", "Cells", "Time (ms)", "Cells/sec");
    println!("{}", "-".repeat(74));
    for r in &results {
        println!(
            "{:<32} {:>10} {:>12.2} {:>16.0}",
            r.name, r.cells, r.time_ms, r.throughput_cells_per_sec
        );
    }
    println!();

    let filename = env::args().nth(1).unwrap_or_else(|| "benchmark_results.csv".to_string());
    write_results_to_csv(&results, &system_info, &filename)?;
    Ok(())
}
