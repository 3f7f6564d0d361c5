use clap::Parser;
use daylog_etl::utils::{logger, validation::Validate};
use daylog_etl::{ConversionPipeline, EtlEngine, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-convert")]
#[command(about = "Daily log conversion driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "daylog-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the year appended to source dates
    #[arg(long)]
    year: Option<i32>,

    /// Dry run - show what would be processed without writing output
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if args.verbose {
        logger::init_cli_logger(true);
    } else {
        logger::init_logger_with_level(config.log_level(), config.json_logs());
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(year) = args.year {
        config.conversion.year = year;
        tracing::info!("🔧 Year overridden to: {}", year);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        return perform_dry_run(config);
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = ConversionPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(summary) => {
            tracing::info!("✅ Conversion completed successfully!");
            println!("Conversion complete! Output saved to {}", summary.output_path);
            println!("Total data rows converted: {}", summary.converted_rows);
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    use daylog_etl::core::ConfigProvider;

    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Source: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  User ID: {}", config.user_id());
    println!("  Year: {}", config.year());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

/// 只跑 extract/transform，回報會轉出的筆數與被略過的原因
fn perform_dry_run(config: TomlConfig) -> anyhow::Result<()> {
    use daylog_etl::core::Pipeline;

    let pipeline = ConversionPipeline::new(LocalStorage::default(), config);
    let rows = pipeline.extract()?;
    let result = pipeline.transform(rows)?;

    println!("🔍 Dry Run Analysis:");
    println!("  Rows to convert: {}", result.output_rows.len());
    for (reason, count) in result.skipped.iter() {
        println!("  Skipped ({}): {}", reason.as_str(), count);
    }
    if let Some(first) = result.output_rows.first() {
        println!("  First row: {} {}", first.date, first.data);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
