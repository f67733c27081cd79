//! # mxshop user-web サーバー
//!
//! ユーザーアカウント用の HTTP ゲートウェイ。
//!
//! ## 役割
//!
//! - **入力検証**: フォームを検証し、フィールド単位のエラーを返す
//! - **認証**: CAPTCHA 検証、トークン（JWT）の発行と検証
//! - **プロキシ**: User Service（gRPC）への転送とエラー変換
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `USER_WEB_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `USER_WEB_PORT` | **Yes** | ポート番号 |
//! | `USER_SRV_URL` | **Yes** | User Service の gRPC エンドポイント |
//! | `USER_SRV_TIMEOUT_MS` | No | 下流呼び出しの期限（デフォルト: 3000） |
//! | `JWT_SIGNING_KEY` | **Yes** | トークン署名鍵 |
//! | `REDIS_URL` | No | 設定時は CAPTCHA を Redis に保存 |
//! | `CAPTCHA_TTL_SECS` | No | CAPTCHA の有効期間（デフォルト: 300） |
//! | `CAPTCHA_MAX_ENTRIES` | No | メモリ内ストアの上限（デフォルト: 10000） |
//! | `VALIDATION_LOCALE` | No | `en` / `zh`（デフォルト: `en`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! USER_WEB_PORT=8021 USER_SRV_URL=http://127.0.0.1:50051 JWT_SIGNING_KEY=dev \
//!    cargo run -p mxshop-user-web
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use mxshop_domain::clock::SystemClock;
use mxshop_infra::{
    CaptchaService,
    CaptchaStore,
    DigitCaptchaRenderer,
    InMemoryCaptchaStore,
    RedisCaptchaStore,
    TokenIssuer,
    redis::create_connection_manager,
};
use mxshop_shared::observability::{TracingConfig, init_tracing};
use mxshop_user_web::{
    app_builder::{AppDependencies, build_app},
    client::UserServiceClientImpl,
    config::UserWebConfig,
    validation::Translator,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    // トレーシング初期化
    init_tracing(TracingConfig::from_env("user-web"));
    let _tracing_guard = tracing::info_span!("app", service = "user-web").entered();

    // 設定読み込み
    let config = UserWebConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "user-web サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // User Service への接続（失敗したら起動しない）
    let user_service_client = UserServiceClientImpl::connect(
        &config.user_srv_url,
        config.user_srv_timeout,
    )
    .await
    .with_context(|| format!("User Service への接続に失敗しました: {}", config.user_srv_url))?;
    tracing::info!("User Service に接続しました: {}", config.user_srv_url);

    // CAPTCHA ストア: REDIS_URL があれば Redis、無ければメモリ内
    let captcha_store: Arc<dyn CaptchaStore> = match &config.redis_url {
        Some(redis_url) => {
            let conn = create_connection_manager(redis_url)
                .await
                .context("Redis への接続に失敗しました")?;
            tracing::info!("CAPTCHA ストア: Redis");
            Arc::new(RedisCaptchaStore::new(conn, config.captcha_ttl))
        }
        None => {
            tracing::info!(
                max_entries = config.captcha_max_entries,
                "CAPTCHA ストア: メモリ内"
            );
            Arc::new(InMemoryCaptchaStore::new(
                config.captcha_ttl,
                config.captcha_max_entries,
            ))
        }
    };

    let app = build_app(AppDependencies {
        user_service_client: Arc::new(user_service_client),
        token_issuer:        Arc::new(TokenIssuer::new(
            config.jwt_signing_key.as_bytes(),
            Arc::new(SystemClock),
        )),
        captcha_service:     Arc::new(CaptchaService::new(
            Arc::new(DigitCaptchaRenderer::default()),
            captcha_store,
        )),
        translator:          Translator::new(config.validation_locale),
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("アドレスのパースに失敗しました: {}:{}", config.host, config.port))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("ポートのバインドに失敗しました: {addr}"))?;
    tracing::info!("user-web サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // チャネルは app と共に破棄される
    tracing::info!("User Service との接続を閉じました");

    Ok(())
}

/// SIGINT / SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+C ハンドラの登録に失敗: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM ハンドラの登録に失敗: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
