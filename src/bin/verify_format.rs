use anyhow::Context;
use clap::Parser;
use daylog_etl::core::verify::{compare_formats, FieldSample, FormatComparison};
use daylog_etl::utils::logger;

#[derive(Parser)]
#[command(name = "verify-format")]
#[command(about = "Compare the structure of a reference export and a converted file")]
struct Args {
    /// Reference table exported from the target application
    #[arg(default_value = "csv/Noctisium Echo AI Metrics.csv")]
    reference: String,

    /// Table produced by the conversion
    #[arg(default_value = "csv/Midnight_Log_Converted_to_Noctisium_Format.csv")]
    candidate: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let reference = std::fs::read(&args.reference)
        .with_context(|| format!("failed to read reference table '{}'", args.reference))?;
    let candidate = std::fs::read(&args.candidate)
        .with_context(|| format!("failed to read candidate table '{}'", args.candidate))?;

    let comparison = compare_formats(&reference, &candidate).context("failed to parse tables")?;
    tracing::debug!(
        "Compared {} reference rows with {} candidate rows",
        comparison.reference_rows,
        comparison.candidate_rows
    );

    print_report(&comparison);
    Ok(())
}

fn print_sample(label: &str, sample: &[FieldSample]) {
    let keys: Vec<&str> = sample.iter().map(|f| f.key.as_str()).collect();
    println!("{} fields: {:?}", label, keys);
    println!("Sample {} data:", label);
    for field in sample {
        println!("  {}: {} (type: {})", field.key, field.value, field.type_name);
    }
    println!();
}

fn print_report(comparison: &FormatComparison) {
    println!("Reference file has {} rows", comparison.reference_rows);
    println!("Converted file has {} rows", comparison.candidate_rows);
    println!();

    println!("Headers match: {}", comparison.headers_match());
    println!("Headers: {:?}", comparison.reference_headers);
    println!();

    println!("Comparing JSON structure of first row from each file:");
    println!("{}", "-".repeat(50));
    print_sample("Reference", &comparison.reference_sample);
    print_sample("Converted", &comparison.candidate_sample);
    println!("{}", "-".repeat(50));

    match comparison.field_order_matches {
        Some(true) => println!("✓ Field order matches exactly!"),
        Some(false) => {
            let expected: Vec<&str> = comparison
                .reference_sample
                .iter()
                .map(|f| f.key.as_str())
                .collect();
            let got: Vec<&str> = comparison
                .candidate_sample
                .iter()
                .map(|f| f.key.as_str())
                .collect();
            println!("✗ Field order does not match");
            println!("Expected order: {:?}", expected);
            println!("Got order: {:?}", got);
        }
        None => println!("- Field order not compared (a table has no rows)"),
    }

    if !comparison.inconsistent_candidate_rows.is_empty() {
        println!(
            "✗ Converted rows with a different key order than the first row: {:?}",
            comparison.inconsistent_candidate_rows
        );
    }
    if !comparison.non_canonical_candidate_rows.is_empty() {
        println!(
            "✗ Converted rows deviating from the canonical key order: {:?}",
            comparison.non_canonical_candidate_rows
        );
    }

    println!("\nChecking data types consistency...");
    if let Some(nulls) = &comparison.reference_null_sample {
        println!("\nReference row {} with null values:", nulls.row);
        for key in &nulls.null_fields {
            println!("  {}: null", key);
        }
    }
}
