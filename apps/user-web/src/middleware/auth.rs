//! # 認証ミドルウェア
//!
//! セッショントークンを検証し、クレームを型付きでハンドラへ渡す。
//!
//! トークンは `Authorization: Bearer <token>` または `x-token: <token>` で受け付ける。
//! 検証に成功すると [`SessionClaims`] をリクエスト extensions に格納するので、
//! ハンドラは `Extension<SessionClaims>` で受け取る。
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/u/v1/user/detail", get(get_user_detail))
//!     .layer(from_fn_with_state(authn_state, require_auth))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use mxshop_infra::{SessionClaims, TokenError, TokenIssuer};

use crate::error::unauthorized_response;

/// 代替のトークンヘッダー名
pub const TOKEN_HEADER: &str = "x-token";

/// 認証ミドルウェアの状態
#[derive(Clone)]
pub struct AuthnState {
    pub token_issuer: Arc<TokenIssuer>,
}

/// 認証ミドルウェア
///
/// トークンが無い・期限切れ・不正な場合は 401 を返す。
pub async fn require_auth(
    State(state): State<AuthnState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_token(request.headers()) else {
        return unauthorized_response("please log in");
    };

    let claims: SessionClaims = match state.token_issuer.verify(&token) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => return unauthorized_response("token has expired"),
        Err(e) => {
            tracing::debug!("トークン検証に失敗: {}", e);
            return unauthorized_response("invalid token");
        }
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// リクエストヘッダーからトークンを取り出す
///
/// `Authorization: Bearer` を優先し、無ければ `x-token` を見る。
/// スキーム名は大文字小文字を区別しない（RFC 7235）。
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim_start().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim());

    let token = bearer.or_else(|| {
        headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    })?;

    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        Router,
        body::to_bytes,
        http::StatusCode,
        middleware::from_fn_with_state,
        routing::get,
    };
    use chrono::Utc;
    use mxshop_domain::clock::{FixedClock, SystemClock};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    const KEY: &[u8] = b"authn-test-key";

    async fn whoami(Extension(claims): Extension<SessionClaims>) -> String {
        format!("{}:{}", claims.id, claims.nick_name)
    }

    fn app(issuer: Arc<TokenIssuer>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(
                AuthnState {
                    token_issuer: issuer,
                },
                require_auth,
            ))
    }

    fn system_issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(KEY, Arc::new(SystemClock)))
    }

    async fn send(app: Router, header: Option<(&str, String)>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn msg(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_bearerトークンでクレームがハンドラに渡る() {
        let issuer = system_issuer();
        let token = issuer.issue(7, "bobby", 1).unwrap().token;

        let (status, body) = send(
            app(issuer),
            Some(("authorization", format!("Bearer {token}"))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "7:bobby");
    }

    #[rstest]
    #[case("bearer")]
    #[case("BEARER")]
    #[case("bEaReR")]
    #[tokio::test]
    async fn test_bearerスキームは大文字小文字を区別しない(#[case] scheme: &str) {
        let issuer = system_issuer();
        let token = issuer.issue(7, "bobby", 1).unwrap().token;

        let (status, body) = send(
            app(issuer),
            Some(("authorization", format!("{scheme} {token}"))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "7:bobby");
    }

    #[test]
    fn test_extract_token_bearer以外のスキームは無視する() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert_eq!(extract_token(&headers), None);
    }

    #[tokio::test]
    async fn test_x_tokenヘッダーでも認証できる() {
        let issuer = system_issuer();
        let token = issuer.issue(8, "alice", 1).unwrap().token;

        let (status, body) = send(app(issuer), Some(("x-token", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "8:alice");
    }

    #[tokio::test]
    async fn test_トークンなしで401を返す() {
        let (status, body) = send(app(system_issuer()), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg(&body), json!({ "msg": "please log in" }));
    }

    #[tokio::test]
    async fn test_期限切れトークンで401を返す() {
        let forty_days_ago = Utc::now().timestamp() - 40 * 24 * 60 * 60;
        let old_issuer = TokenIssuer::new(KEY, Arc::new(FixedClock::at_unix(forty_days_ago)));
        let token = old_issuer.issue(1, "old", 1).unwrap().token;

        let (status, body) = send(app(system_issuer()), Some(("x-token", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg(&body), json!({ "msg": "token has expired" }));
    }

    #[tokio::test]
    async fn test_不正なトークンで401を返す() {
        let (status, body) = send(
            app(system_issuer()),
            Some(("authorization", "Bearer garbage".to_string())),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg(&body), json!({ "msg": "invalid token" }));
    }

    #[test]
    fn test_extract_token_空のbearerはnoneを返す() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer   ".parse().unwrap());

        assert_eq!(extract_token(&headers), None);
    }
}
