//! CAPM Lab CLI — one-shot calculation, SML export and settings dump.
//!
//! Commands:
//! - `calc` — expected return for one asset, as text or a JSON report
//! - `sml` — the sampled Security Market Line as a table or CSV
//! - `settings` — the effective settings rendered as TOML
//!
//! Rates are entered in percent (`--rf 2` means 2%), as on the TUI form.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use capmlab_core::{
    calculate, generate_curve_with, highlight_point, BetaDomain, CapmInputs, FormatPolicy,
    Settings,
};

#[derive(Parser)]
#[command(
    name = "capmlab",
    version,
    about = "CAPM Lab CLI — Capital Asset Pricing Model calculator"
)]
struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Shared rate inputs, in percent.
#[derive(Args, Debug, Clone)]
struct RateArgs {
    /// Risk-free rate in percent (2.0 = 2%).
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    rf: f64,

    /// Expected market return in percent.
    #[arg(long, default_value_t = 8.0, allow_negative_numbers = true)]
    rm: f64,

    /// Beta of the asset.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    beta: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the expected return for one asset.
    Calc {
        #[command(flatten)]
        rates: RateArgs,

        /// Display precision: fixed2, rounded9, trimmed9.
        #[arg(long, default_value = "fixed2")]
        format: String,

        /// Print the full report as JSON instead of one line.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the sampled Security Market Line.
    Sml {
        #[command(flatten)]
        rates: RateArgs,

        /// Number of evenly spaced samples (endpoints included).
        #[arg(long, default_value_t = capmlab_core::DEFAULT_SAMPLE_COUNT)]
        samples: usize,

        /// Lower end of the beta domain.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        from: f64,

        /// Upper end of the beta domain.
        #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
        to: f64,

        /// Emit CSV (beta,expected_return) instead of a table.
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// Show the effective settings as TOML.
    Settings {
        /// Display precision to show in the dump.
        #[arg(long, default_value = "fixed2")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Calc {
            rates,
            format,
            json,
        } => run_calc(&rates, &format, json, &mut out),
        Commands::Sml {
            rates,
            samples,
            from,
            to,
            csv,
        } => run_sml(&rates, samples, from, to, csv, &mut out),
        Commands::Settings { format } => run_settings(&format, &mut out),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("capmlab=debug,capmlab_core=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries results, so logs go to stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn parse_policy(name: &str) -> Result<FormatPolicy> {
    name.parse::<FormatPolicy>()
        .with_context(|| "valid formats: fixed2, rounded9, trimmed9")
}

fn collect_inputs(rates: &RateArgs) -> Result<CapmInputs> {
    let inputs = CapmInputs::from_percent(rates.rf, rates.beta, rates.rm);
    inputs.validate()?;
    Ok(inputs)
}

fn run_calc(rates: &RateArgs, format: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let policy = parse_policy(format)?;
    let inputs = collect_inputs(rates)?;
    let settings = Settings::default().with_format(policy);

    let report = calculate(&inputs, &settings);
    tracing::info!(display = %report.display, "calculation complete");

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Risk-Free Rate:   {}%", policy.format(inputs.risk_free_pct()))?;
    writeln!(out, "Beta:             {}", policy.format(inputs.beta))?;
    writeln!(out, "Market Return:    {}%", policy.format(inputs.market_return_pct()))?;
    writeln!(
        out,
        "Market Premium:   {}%",
        policy.format(inputs.market_risk_premium() * 100.0)
    )?;
    writeln!(out, "{}", report.headline())?;
    Ok(())
}

fn run_sml(
    rates: &RateArgs,
    samples: usize,
    from: f64,
    to: f64,
    csv: bool,
    out: &mut impl Write,
) -> Result<()> {
    if samples < 2 {
        bail!("--samples must be at least 2 (got {samples})");
    }
    let domain = BetaDomain::new(from, to)?;
    let inputs = collect_inputs(rates)?;

    let curve = generate_curve_with(inputs.risk_free_rate, inputs.market_return, domain, samples);
    let highlight = highlight_point(inputs.risk_free_rate, inputs.market_return, inputs.beta);

    if csv {
        let mut writer = csv::Writer::from_writer(&mut *out);
        for point in &curve.points {
            writer.serialize(point)?;
        }
        writer.flush()?;
        return Ok(());
    }

    writeln!(
        out,
        "Security Market Line ({} samples, beta {} to {})",
        curve.len(),
        domain.start,
        domain.end
    )?;
    writeln!(out, "{:>10} {:>16}", "Beta", "Expected (%)")?;
    writeln!(out, "{}", "-".repeat(27))?;
    for point in &curve.points {
        writeln!(out, "{:>10.4} {:>16.6}", point.beta, point.expected_return)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Your Asset: beta {:.4} -> {:.6}%",
        highlight.beta, highlight.expected_return
    )?;
    Ok(())
}

fn run_settings(format: &str, out: &mut impl Write) -> Result<()> {
    let settings = Settings::default().with_format(parse_policy(format)?);
    settings.validate()?;
    write!(out, "{}", settings.to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(rf: f64, beta: f64, rm: f64) -> RateArgs {
        RateArgs { rf, rm, beta }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cli_parses_calc_with_defaults() {
        let cli = Cli::try_parse_from(["capmlab", "calc"]).unwrap();
        match cli.command {
            Commands::Calc { rates, format, json } => {
                assert_eq!(rates.rf, 2.0);
                assert_eq!(rates.beta, 1.0);
                assert_eq!(rates.rm, 8.0);
                assert_eq!(format, "fixed2");
                assert!(!json);
            }
            _ => panic!("expected calc"),
        }
    }

    #[test]
    fn cli_accepts_negative_flag_values() {
        let cli = Cli::try_parse_from(["capmlab", "sml", "--from", "-1", "--to", "3"]).unwrap();
        match cli.command {
            Commands::Sml { from, to, .. } => {
                assert_eq!(from, -1.0);
                assert_eq!(to, 3.0);
            }
            _ => panic!("expected sml"),
        }
    }

    #[test]
    fn calc_prints_headline() {
        let text = render(|out| run_calc(&rates(2.0, 1.0, 8.0), "fixed2", false, out));
        assert!(text.contains("Expected Return: 8.00%"));
        assert!(text.contains("Market Premium:   6.00%"));
    }

    #[test]
    fn calc_trimmed_policy() {
        let text = render(|out| run_calc(&rates(2.0, 2.0, 8.0), "trimmed9", false, out));
        assert!(text.contains("Expected Return: 14%"));
    }

    #[test]
    fn calc_json_report() {
        let text = render(|out| run_calc(&rates(2.0, 0.0, 8.0), "fixed2", true, out));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["display"], "2.00%");
    }

    #[test]
    fn calc_rejects_negative_beta() {
        let mut buf = Vec::new();
        let err = run_calc(&rates(2.0, -1.0, 8.0), "fixed2", false, &mut buf).unwrap_err();
        assert!(err.to_string().contains("beta must not be negative"));
    }

    #[test]
    fn calc_rejects_unknown_policy() {
        let mut buf = Vec::new();
        assert!(run_calc(&rates(2.0, 1.0, 8.0), "sixdp", false, &mut buf).is_err());
    }

    #[test]
    fn sml_csv_has_header_and_rows() {
        let text = render(|out| run_sml(&rates(2.0, 1.0, 8.0), 5, 0.0, 2.0, true, out));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "beta,expected_return");
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "0.0,2.0");
        assert_eq!(lines[5], "2.0,14.0");
    }

    #[test]
    fn sml_table_shows_highlight() {
        let text = render(|out| run_sml(&rates(2.0, 1.5, 8.0), 3, 0.0, 2.0, false, out));
        assert!(text.contains("3 samples"));
        assert!(text.contains("Your Asset: beta 1.5000 -> 11.000000%"));
    }

    #[test]
    fn sml_rejects_bad_domain_and_count() {
        let mut buf = Vec::new();
        assert!(run_sml(&rates(2.0, 1.0, 8.0), 1, 0.0, 2.0, false, &mut buf).is_err());
        assert!(run_sml(&rates(2.0, 1.0, 8.0), 10, 2.0, 0.0, false, &mut buf).is_err());
    }

    #[test]
    fn settings_dump_is_toml() {
        let text = render(|out| run_settings("rounded9", out));
        assert!(text.contains("format = \"rounded9\""));
        assert!(text.contains("simulated_latency_ms = 2000"));
    }
}
