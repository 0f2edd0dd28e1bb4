use clap::Parser;
use weather_etl::utils::{logger, validation::Validate};
use weather_etl::{
    Archiver, CliArgs, EtlConfig, EtlEngine, EtlError, HttpExtractor, Loader, PostgresWarehouse,
    S3ObjectStore, WeatherPipeline,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting weather-etl");

    // 載入並驗證配置
    let config = match EtlConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    tracing::debug!("Config: {:?}", config);

    // 建立各階段元件
    let extractor = match HttpExtractor::new(&config.source) {
        Ok(extractor) => extractor,
        Err(e) => exit_with(&e),
    };
    let store = S3ObjectStore::connect(&config.storage).await;
    let warehouse = PostgresWarehouse::new(&config.warehouse);

    let pipeline = WeatherPipeline::new(
        extractor,
        Archiver::new(store, config.source.location.clone()),
        Loader::new(warehouse),
        config.storage.bucket_name.clone(),
    );

    let mut engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ ETL process completed successfully!");
            tracing::info!(
                "📁 Raw snapshot: s3://{}/{}",
                report.archived.bucket,
                report.archived.key
            );
            println!("✅ ETL process completed successfully!");
            println!(
                "📁 s3://{}/{} | {} row(s) appended to {}",
                report.archived.bucket,
                report.archived.key,
                report.rows_appended,
                weather_etl::FACT_TABLE
            );
        }
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &EtlError) -> ! {
    tracing::error!("❌ ETL process failed: {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(1);
}
