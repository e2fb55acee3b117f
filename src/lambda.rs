use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use cliro_waitlist::core::{ConfigProvider, SignupRequest};
use cliro_waitlist::utils::{logger, validation::Validate};
use cliro_waitlist::{LambdaConfig, S3SignupStore, SubmitResponse, WaitlistService};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

async fn function_handler(
    service: &WaitlistService,
    event: LambdaEvent<SignupRequest>,
) -> Result<SubmitResponse, Error> {
    tracing::info!("Handling waitlist request {}", event.context.request_id);

    let result = service.submit(&event.payload).await;
    if let Err(e) = &result {
        tracing::warn!("Signup failed ({:?}): {}", e.kind(), e);
    }

    // 驗證與儲存失敗都以回應內容表示，不讓 invocation 失敗
    Ok(SubmitResponse::from(&result))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    // 建立 AWS 配置與 S3 客戶端
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .force_path_style(true)
        .build();
    let s3_client = S3Client::from_conf(s3_config);

    let store = S3SignupStore::new(
        s3_client,
        lambda_config.s3_bucket.clone(),
        lambda_config.storage_path().to_string(),
        lambda_config.duplicate_policy(),
    );
    let service = WaitlistService::with_sink(&lambda_config, Arc::new(store));
    let service = &service;

    run(service_fn(move |event: LambdaEvent<SignupRequest>| async move {
        function_handler(service, event).await
    }))
    .await
}
