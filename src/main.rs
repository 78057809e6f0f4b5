//! Loan Simulator CLI
//!
//! Computes the amortization schedule for one loan and writes it to CSV

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use loan_simulator::export::{format_thousands, write_schedule_csv, write_year_end_csv};
use loan_simulator::loan::{apply_floating_shift, load_period_inputs};
use loan_simulator::{
    compute_schedule, cost_of_funds, LoanConfig, ResetFrequency, Scenario, ScenarioRunner,
};

/// Amortization schedule for a blended fixed/floating rate loan
#[derive(Parser, Debug)]
#[command(name = "loan_simulator", version, about)]
struct Cli {
    /// JSON file with loan fields; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Principal amount of the bond
    #[arg(long)]
    principal: Option<f64>,

    /// Maturity in years
    #[arg(long)]
    duration: Option<u32>,

    /// Fixed interest rate in basis points
    #[arg(long)]
    fixed_bp: Option<f64>,

    /// Floating interest rate in basis points
    #[arg(long)]
    floating_bp: Option<f64>,

    /// Floating rate reset period: "12 months", "6 months" or "3 months"
    #[arg(long)]
    reset: Option<ResetFrequency>,

    /// Capitalize yearly interest instead of paying it (payment in kind)
    #[arg(long, overrides_with = "no_pik")]
    pik: bool,

    /// Pay yearly interest in cash, overriding a config that enables payment in kind
    #[arg(long, overrides_with = "pik")]
    no_pik: bool,

    /// Cost of the hedging instrument
    #[arg(long)]
    hedge_cost: Option<f64>,

    /// Edited input table (Year, Period, Floating interest rate, Fixed interest rate, Prepayment)
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Shift the floating rate by this many basis points (see --from-year)
    #[arg(long, allow_hyphen_values = true)]
    shift_floating: Option<f64>,

    /// First year the floating rate shift applies to
    #[arg(long, default_value_t = 1)]
    from_year: u32,

    /// Full schedule output
    #[arg(long, default_value = "data_bond.csv")]
    output: PathBuf,

    /// Optional year-end summary output
    #[arg(long)]
    year_end: Option<PathBuf>,

    /// JSON list of what-if scenarios to compare against the base case
    #[arg(long)]
    scenarios: Option<PathBuf>,
}

impl Cli {
    fn loan_config(&self) -> Result<LoanConfig> {
        let mut config = match &self.config {
            Some(path) => LoanConfig::from_json_path(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => LoanConfig::default(),
        };

        if let Some(v) = self.principal {
            config.principal = v;
        }
        if let Some(v) = self.duration {
            config.duration_years = v;
        }
        if let Some(v) = self.fixed_bp {
            config.fixed_rate_bp = v;
        }
        if let Some(v) = self.floating_bp {
            config.floating_rate_bp = v;
        }
        if let Some(v) = self.reset {
            config.reset_frequency = v;
        }
        if self.pik {
            config.payment_in_kind = true;
        } else if self.no_pik {
            config.payment_in_kind = false;
        }
        if let Some(v) = self.hedge_cost {
            config.hedge_cost = v;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.loan_config()?;
    let params = config.parameters()?;

    let mut inputs = match &cli.inputs {
        Some(path) => load_period_inputs(path)
            .with_context(|| format!("loading input table {}", path.display()))?,
        None => config.default_inputs()?,
    };
    if let Some(shift) = cli.shift_floating {
        inputs = apply_floating_shift(&inputs, cli.from_year, shift);
    }

    let schedule = compute_schedule(&params, &inputs)?;
    let summary = &schedule.summary;

    println!("Loan Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("The number of reference periods per year is {}", summary.periods_per_year);
    println!(
        "The total net cost is {} with {} from the Floating {} from the Fixed interest rate and {} from the hedging instrument",
        format_thousands(summary.total_net_cost),
        format_thousands(summary.total_floating_interest),
        format_thousands(summary.total_fixed_interest),
        format_thousands(summary.hedge_cost),
    );
    println!(
        "The payment in kind option is {}",
        if summary.payment_in_kind { "enabled" } else { "disabled" }
    );
    match cost_of_funds(&schedule, &params) {
        Some(rate) => println!("All-in cost of funds: {:.4}%", rate * 100.0),
        None => println!("All-in cost of funds: n/a"),
    }

    println!();
    println!("{:>5} {:>18} {:>18} {:>18} {:>18}",
        "Year", "Principal", "Interest added", "Interest to pay", "Net cash outflow");
    println!("{}", "-".repeat(81));
    for row in schedule.year_end_rows() {
        println!("{:>5} {:>18} {:>18} {:>18} {:>18}",
            row.year,
            format_thousands(row.principal),
            format_thousands(row.interest_added_to_principal),
            format_thousands(row.interest_due),
            format_thousands(row.net_cash_outflow),
        );
    }

    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    write_schedule_csv(BufWriter::new(file), &schedule)?;
    println!("\nFull schedule written to: {}", cli.output.display());

    if let Some(path) = &cli.year_end {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_year_end_csv(BufWriter::new(file), &schedule)?;
        println!("Year-end summary written to: {}", path.display());
    }

    if let Some(path) = &cli.scenarios {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let scenarios: Vec<Scenario> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing scenarios {}", path.display()))?;

        let runner = ScenarioRunner::new(params, inputs);
        let results = runner.run_batch(&scenarios)?;

        println!("\nScenarios:");
        println!("{:<32} {:>18} {:>14}", "Name", "Total net cost", "Cost of funds");
        println!("{}", "-".repeat(66));
        for result in &results {
            let cof = result
                .cost_of_funds
                .map(|r| format!("{:.4}%", r * 100.0))
                .unwrap_or_else(|| "n/a".to_string());
            println!("{:<32} {:>18} {:>14}",
                result.name,
                format_thousands(result.schedule.summary.total_net_cost),
                cof,
            );
        }
    }

    Ok(())
}
