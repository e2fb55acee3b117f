use clap::Parser;
use cliro_waitlist::config::Command;
use cliro_waitlist::core::ConfigProvider;
use cliro_waitlist::utils::error::{ErrorSeverity, WaitlistError};
use cliro_waitlist::utils::{logger, validation::Validate};
use cliro_waitlist::{CliConfig, SubmitResponse, TomlConfig, WaitlistService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    let mut config = match TomlConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url.clone());
        tracing::info!("🔧 API URL overridden to: {}", url);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let service = match WaitlistService::from_config(&config) {
        Ok(service) => service,
        Err(e) => fail(&e),
    };

    match cli.command {
        Command::Submit(args) => {
            let request = match args.to_request(config.max_languages()) {
                Ok(request) => request,
                Err(e) => fail(&e),
            };
            let result = service.submit(&request).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&SubmitResponse::from(&result))?
            );
            if let Err(e) = result {
                fail(&e);
            }
        }
        Command::Config => {
            let public_config = match service.public_config().await {
                Ok(public_config) => public_config,
                Err(e) => fail(&e),
            };
            println!("{}", serde_json::to_string_pretty(&public_config)?);
        }
        Command::Health => {
            if service.health().await {
                println!("✅ Backend at {} is healthy", config.api_url());
            } else {
                eprintln!("❌ Backend at {} is unreachable", config.api_url());
                std::process::exit(2);
            }
        }
    }

    Ok(())
}

fn fail(e: &WaitlistError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::High => 1,     // 輸入錯誤
        ErrorSeverity::Medium => 2,   // 可重試
        ErrorSeverity::Critical => 3, // 配置或系統錯誤
    };
    std::process::exit(exit_code);
}
