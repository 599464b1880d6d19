//! Booth Simulator - CLI Entry Point
//!
//! Commands:
//! - `booth-sim run <m> <q>` - Run a multiplication to completion
//! - `booth-sim step <m> <q> -n <k>` - Show the first k steps
//! - `booth-sim verify -b <bits>` - Exhaustively check a width
//! - `booth-sim tui` - Interactive visualizer

use clap::{Parser, Subcommand};
use booth_sim::{BoothEngine, SimConfig, StepOutcome};
use booth_sim::booth::trace::{format_step, format_table, to_binary};

#[derive(Parser)]
#[command(name = "booth-sim")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "A step-by-step simulator of Booth's signed multiplication algorithm")]
struct Cli {
    /// JSON file with default operands, width and run delay
    #[arg(short, long, global = true)]
    config: Option<String>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a multiplication to completion
    Run {
        /// Multiplicand (M)
        #[arg(allow_negative_numbers = true)]
        multiplicand: Option<i64>,
        /// Multiplier (Q)
        #[arg(allow_negative_numbers = true)]
        multiplier: Option<i64>,
        /// Register width in bits (4-64)
        #[arg(short, long)]
        bits: Option<u32>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Advance a fixed number of steps and show each one
    Step {
        /// Multiplicand (M)
        #[arg(allow_negative_numbers = true)]
        multiplicand: Option<i64>,
        /// Multiplier (Q)
        #[arg(allow_negative_numbers = true)]
        multiplier: Option<i64>,
        /// Register width in bits (4-64)
        #[arg(short, long)]
        bits: Option<u32>,
        /// Number of steps to take
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },
    /// Check every signed operand pair at a width
    Verify {
        /// Register width in bits (4-10)
        #[arg(short, long, default_value = "4")]
        bits: u32,
    },
    /// Interactive terminal visualizer
    Tui {
        /// Multiplicand (M)
        #[arg(allow_negative_numbers = true)]
        multiplicand: Option<i64>,
        /// Multiplier (Q)
        #[arg(allow_negative_numbers = true)]
        multiplier: Option<i64>,
        /// Register width in bits (4-64)
        #[arg(short, long)]
        bits: Option<u32>,
    },
}

/// Widest width `verify` will enumerate.
const MAX_VERIFY_BITS: u32 = 10;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Some(Commands::Run { multiplicand, multiplier, bits, json }) => {
            let engine = make_engine(&config, multiplicand, multiplier, bits);
            run_multiplication(engine, json);
        }
        Some(Commands::Step { multiplicand, multiplier, bits, count }) => {
            let engine = make_engine(&config, multiplicand, multiplier, bits);
            step_multiplication(engine, count);
        }
        Some(Commands::Verify { bits }) => {
            verify_width(bits);
        }
        Some(Commands::Tui { multiplicand, multiplier, bits }) => {
            let config = override_config(config, multiplicand, multiplier, bits);
            visualize(config);
        }
        None => {
            println!("Booth Simulator v0.1.0");
            println!("Signed multiplication, one register shift at a time");
            println!();
            println!("Use --help for available commands");
            println!();
            let engine = make_engine(&config, None, None, None);
            run_multiplication(engine, false);
        }
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> SimConfig {
    let Some(path) = path else {
        return SimConfig::default();
    };

    match SimConfig::load(path) {
        Ok(config) => {
            tracing::info!(path, "loaded configuration");
            config
        }
        Err(e) => {
            eprintln!("❌ Failed to load config {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

/// Apply command-line operands and width on top of the config.
fn override_config(
    mut config: SimConfig,
    multiplicand: Option<i64>,
    multiplier: Option<i64>,
    bits: Option<u32>,
) -> SimConfig {
    if let Some(m) = multiplicand {
        config.multiplicand = m;
    }
    if let Some(q) = multiplier {
        config.multiplier = q;
    }
    if let Some(bits) = bits {
        config = match config.with_bits(bits) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        };
    }
    config
}

fn make_engine(
    config: &SimConfig,
    multiplicand: Option<i64>,
    multiplier: Option<i64>,
    bits: Option<u32>,
) -> BoothEngine {
    let m = multiplicand.unwrap_or(config.multiplicand);
    let q = multiplier.unwrap_or(config.multiplier);
    let bits = bits.unwrap_or(config.bits.get());

    match BoothEngine::new(m, q, bits) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn print_header(engine: &BoothEngine) {
    let bits = engine.bits();
    println!("━━━ Booth's Algorithm ━━━");
    println!("  M = {:>6}  {}", engine.multiplicand(), to_binary(engine.m() as u128, bits));
    println!("  Q = {:>6}  {}", engine.multiplier(), to_binary(engine.q() as u128, bits));
    println!("  Width: {} bits", bits);
    if engine.multiplicand_negation_overflows() {
        println!("  ⚠ M is the most negative {}-bit value; A - M wraps and the product may be wrong", bits);
    }
    println!();
}

fn run_multiplication(mut engine: BoothEngine, json: bool) {
    if json {
        let result = engine.run();
        match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to encode result: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    print_header(&engine);
    let result = engine.run();
    print!("{}", format_table(engine.bits(), &result.steps));
    println!();

    let product_bits = engine.width().product_bits();
    println!("Product (A Q):");
    println!("  binary:   {}", to_binary(result.product_unsigned, product_bits));
    println!("  unsigned: {}", result.product_unsigned);
    println!("  signed:   {}", result.product_signed);

    let expected = engine.multiplicand() as i128 * engine.multiplier() as i128;
    if result.product_signed == expected {
        println!("✓ {} × {} = {}", engine.multiplicand(), engine.multiplier(), result.product_signed);
    } else {
        println!(
            "✗ {} × {} = {}, but the {}-bit registers give {}",
            engine.multiplicand(),
            engine.multiplier(),
            expected,
            engine.bits(),
            result.product_signed
        );
    }
}

fn step_multiplication(mut engine: BoothEngine, count: u32) {
    print_header(&engine);

    for _ in 0..count {
        match engine.step() {
            StepOutcome::Stepped(snap) => println!("{}", format_step(&snap)),
            StepOutcome::Finished => {
                println!("(finished after {} steps)", engine.step_count());
                break;
            }
        }
    }

    let bits = engine.bits();
    println!();
    println!("━━━ Registers after {}/{} steps ━━━", engine.step_count(), bits);
    println!("  A   = {}", to_binary(engine.a() as u128, bits));
    println!("  Q   = {}", to_binary(engine.q() as u128, bits));
    println!("  Q-1 = {}", engine.q1());
    println!("  A Q = {} ({})", engine.product_unsigned(), engine.product_signed());
}

fn verify_width(bits: u32) {
    if !(booth_sim::booth::MIN_BITS..=MAX_VERIFY_BITS).contains(&bits) {
        eprintln!(
            "❌ verify supports {} to {} bits, got {}",
            booth_sim::booth::MIN_BITS,
            MAX_VERIFY_BITS,
            bits
        );
        std::process::exit(1);
    }

    println!("━━━ Verifying {}-bit Booth multiplication ━━━", bits);
    println!();

    let half = 1i64 << (bits - 1);
    let mut passed = 0u64;
    let mut failed = 0u64;
    let mut wrapped = 0u64;

    for m in -half..half {
        for q in -half..half {
            let mut engine = match BoothEngine::new(m, q, bits) {
                Ok(engine) => engine,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };
            let product = engine.run().product_signed;

            if product == (m * q) as i128 {
                passed += 1;
            } else if engine.multiplicand_negation_overflows() {
                // Known limit of n-bit Booth: -M is not representable.
                wrapped += 1;
            } else {
                println!("✗ {} × {} gave {}", m, q, product);
                failed += 1;
            }
        }
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);
    println!("({} pairs with M = {} wrap as expected)", wrapped, -half);

    if failed == 0 {
        println!("✓ All representable products match!");
    } else {
        std::process::exit(1);
    }
}

#[cfg(feature = "tui")]
fn visualize(config: SimConfig) {
    if let Err(e) = booth_sim::run_visualizer(config) {
        eprintln!("❌ Visualizer error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn visualize(_config: SimConfig) {
    eprintln!("❌ Built without the `tui` feature");
    std::process::exit(1);
}
