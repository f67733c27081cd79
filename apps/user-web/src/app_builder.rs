//! # user-web アプリケーション構築
//!
//! 依存（クライアント・トークン発行・CAPTCHA・翻訳器）から State を組み立て、
//! ルーターを構築する。`main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! グローバルな状態は持たず、統合テストもスタブを渡してこの関数で組み立てる。

use std::sync::Arc;

use axum::{
    Extension,
    Router,
    http::{HeaderName, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use mxshop_infra::{CaptchaService, TokenIssuer};
use mxshop_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    client::UserServiceClient,
    handler::{
        AuthState,
        UserState,
        get_captcha,
        get_user_detail,
        health_check,
        list_users,
        login,
        register,
        update_user,
    },
    middleware::{AuthnState, TOKEN_HEADER, no_store, request_id::store_request_id, require_auth},
    validation::Translator,
};

/// ルーター構築に必要な依存
pub struct AppDependencies {
    pub user_service_client: Arc<dyn UserServiceClient>,
    pub token_issuer:        Arc<TokenIssuer>,
    pub captcha_service:     Arc<CaptchaService>,
    pub translator:          Translator,
}

/// State を組み立ててルーターを返す
pub fn build_app(deps: AppDependencies) -> Router {
    // CAPTCHA・登録・ログインはトークン発行と CAPTCHA 検証が必要
    let auth_state = Arc::new(AuthState {
        user_service_client: deps.user_service_client.clone(),
        token_issuer:        deps.token_issuer.clone(),
        captcha_service:     deps.captcha_service,
    });

    // ユーザー API は User Service のみ必要（ユーザー ID はクレームから取る）
    let user_state = Arc::new(UserState {
        user_service_client: deps.user_service_client,
    });

    let authn_state = AuthnState {
        token_issuer: deps.token_issuer,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(TOKEN_HEADER),
        ]);

    // ルーター構築
    Router::new()
        .route("/health", get(health_check))
        // 認証不要 API
        .merge(
            Router::new()
                .route("/u/v1/captcha", get(get_captcha))
                .route("/u/v1/register", post(register))
                .route("/u/v1/login", post(login))
                .with_state(auth_state),
        )
        // 認証必須 API（クレームは Extension<SessionClaims> で渡る）
        .merge(
            Router::new()
                .route("/u/v1/user/detail", get(get_user_detail))
                .route("/u/v1/user/update", post(update_user))
                .route("/u/v1/user/list", get(list_users))
                .layer(from_fn_with_state(authn_state, require_auth))
                .with_state(user_state),
        )
        // 検証メッセージの翻訳器（ValidatedForm が参照する）
        .layer(Extension(Arc::new(deps.translator)))
        // キャッシュ制御: トークン・個人情報をキャッシュさせない
        .layer(no_store())
        .layer(cors)
        // Request ID レイヤー（レイヤー順序が重要: 下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: スパンに request_id を含め、全ログに自動注入
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 4. store_request_id: task-local に保存し、User Service への gRPC メタデータに使用
        .layer(from_fn(store_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
