use clap::Parser;
use menu_etl::core::ConfigProvider;
use menu_etl::utils::{logger, validation::Validate};
use menu_etl::{
    CalendarDate, CliConfig, EtlError, LocalStorage, MenuEtlEngine, MenuPipeline, MenuSchedule,
    TomlConfig,
};

#[tokio::main]
async fn main() {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting menu-etl");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let result = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(mut config) => {
                    args.apply_overrides(&mut config);
                    run(config, &args).await
                }
                Err(e) => Err(e),
            }
        }
        None => run(args.clone(), &args).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ menu-etl failed: {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 設定/輸入錯誤 1，其餘 I/O 類錯誤 2
        let exit_code = if e.is_config_error() { 1 } else { 2 };
        std::process::exit(exit_code);
    }
}

async fn run<C: ConfigProvider + Validate>(config: C, args: &CliConfig) -> Result<(), EtlError> {
    config.validate()?;
    tracing::info!("✅ Configuration validated");

    let storage = LocalStorage::new(".");
    let pipeline = MenuPipeline::new(storage, config);
    let engine = MenuEtlEngine::new(pipeline);

    let outcome = engine.run().await?;
    println!("✅ Parsed {} dates", outcome.schedule.len());
    for path in &outcome.written_files {
        println!("📁 Output saved to: {}", path);
    }

    if let Some(date) = args.date {
        print_menu(&outcome.schedule, CalendarDate::from(date));
    }
    Ok(())
}

fn print_menu(schedule: &MenuSchedule, date: CalendarDate) {
    println!();
    println!("🍱 {}", date.korean_label());
    match schedule.get(&date) {
        Some(items) => {
            for item in items {
                println!("  - {}", item);
            }
        }
        None => println!("  📭 해당 날짜의 급식 정보가 없습니다"),
    }
}
