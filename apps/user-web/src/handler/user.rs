//! # ユーザー API ハンドラ
//!
//! 認証ミドルウェアを通過したリクエストのみが到達する。
//! 操作対象のユーザー ID はトークンのクレームから取り、リクエストからは受け取らない。
//!
//! ## エンドポイント
//!
//! - `GET /u/v1/user/detail` - 自分のプロフィール
//! - `POST /u/v1/user/update` - 自分のプロフィールを更新
//! - `GET /u/v1/user/list` - ユーザー一覧（ページング）

use std::sync::Arc;

use axum::{
   Extension,
   Json,
   extract::{Query, State, rejection::QueryRejection},
   http::StatusCode,
   response::{IntoResponse, Response},
};
use mxshop_domain::user::{Birthday, Gender};
use mxshop_infra::SessionClaims;
use mxshop_shared::{FieldErrorResponse, MessageResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
   client::{UpdateUserRequest, UserInfo, UserServiceClient},
   error::{bad_request_response, field_error_response, log_and_convert_user_service_error},
   validation::{ValidatedForm, validate_birthday, validate_gender},
};

/// 一覧のデフォルトページ番号
const DEFAULT_PAGE: u32 = 0;

/// 一覧のデフォルトページサイズ
const DEFAULT_PAGE_SIZE: u32 = 10;

/// ユーザー API の共有状態
pub struct UserState {
   pub user_service_client: Arc<dyn UserServiceClient>,
}

// --- リクエスト型 ---

/// ユーザー一覧クエリパラメータ
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
   /// ページ番号（0 始まり、省略時 0）
   pub pn:    Option<u32>,
   /// ページサイズ（省略時 10）
   pub psize: Option<u32>,
}

/// プロフィール更新フォーム
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserForm {
   #[serde(default)]
   #[validate(length(min = 3, max = 10))]
   pub name:     String,
   /// `male` / `female` / `unknown`
   #[serde(default)]
   #[validate(custom(function = "validate_gender"))]
   pub gender:   String,
   /// `YYYY-MM-DD`（1970-01-01 以降）
   #[serde(default)]
   #[validate(custom(function = "validate_birthday"))]
   pub birthday: String,
}

// --- レスポンス型 ---

/// プロフィールレスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailResponse {
   pub name:     String,
   /// `YYYY-MM-DD`
   pub birthday: String,
   pub gender:   String,
   pub mobile:   String,
}

/// ユーザー一覧の要素
#[derive(Debug, Serialize, ToSchema)]
pub struct UserItemData {
   pub id:        i32,
   pub nick_name: String,
   /// `YYYY-MM-DD`
   pub birthday:  String,
   pub gender:    String,
   pub mobile:    String,
}

impl From<UserInfo> for UserItemData {
   fn from(user: UserInfo) -> Self {
      Self {
         id:        user.id,
         nick_name: user.nick_name,
         birthday:  Birthday::from_unix_seconds(user.birth_day).to_string(),
         gender:    user.gender,
         mobile:    user.mobile,
      }
   }
}

/// ユーザー一覧レスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
   pub total: i32,
   pub data:  Vec<UserItemData>,
}

/// 更新成功レスポンス（`{}`）
#[derive(Debug, Serialize, ToSchema)]
pub struct EmptyResponse {}

// --- ハンドラ ---

/// GET /u/v1/user/detail
///
/// トークンの `id` で User Service からプロフィールを取得する。
#[utoipa::path(
   get,
   path = "/u/v1/user/detail",
   tag = "user",
   security(("bearer_auth" = []), ("x_token" = [])),
   responses(
      (status = 200, description = "取得成功", body = UserDetailResponse),
      (status = 401, description = "未認証", body = MessageResponse),
      (status = 404, description = "ユーザーが存在しない", body = MessageResponse)
   )
)]
#[tracing::instrument(skip_all, fields(user_id = claims.id))]
pub async fn get_user_detail(
   State(state): State<Arc<UserState>>,
   Extension(claims): Extension<SessionClaims>,
) -> Response {
   match state.user_service_client.get_user_by_id(claims.id).await {
      Ok(user) => (
         StatusCode::OK,
         Json(UserDetailResponse {
            name:     user.nick_name,
            birthday: Birthday::from_unix_seconds(user.birth_day).to_string(),
            gender:   user.gender,
            mobile:   user.mobile,
         }),
      )
         .into_response(),
      Err(e) => log_and_convert_user_service_error("プロフィール取得", e),
   }
}

/// POST /u/v1/user/update
///
/// トークンの `id` のユーザーについて、表示名・性別・誕生日を更新する。
#[utoipa::path(
   post,
   path = "/u/v1/user/update",
   tag = "user",
   security(("bearer_auth" = []), ("x_token" = [])),
   request_body = UpdateUserForm,
   responses(
      (status = 200, description = "更新成功", body = EmptyResponse),
      (status = 400, description = "入力エラー", body = FieldErrorResponse),
      (status = 401, description = "未認証", body = MessageResponse)
   )
)]
#[tracing::instrument(skip_all, fields(user_id = claims.id))]
pub async fn update_user(
   State(state): State<Arc<UserState>>,
   Extension(claims): Extension<SessionClaims>,
   ValidatedForm(form): ValidatedForm<UpdateUserForm>,
) -> Response {
   let birthday = match Birthday::parse(&form.birthday) {
      Ok(birthday) => birthday,
      Err(e) => return field_error_response("birthday", &e.to_string()),
   };

   let gender = match form.gender.parse::<Gender>() {
      Ok(gender) => gender,
      Err(e) => return field_error_response("gender", &e.to_string()),
   };

   let request = UpdateUserRequest {
      id:        claims.id,
      nick_name: form.name,
      gender,
      birth_day: birthday.to_unix_seconds(),
   };

   match state.user_service_client.update_user(&request).await {
      Ok(()) => {
         tracing::info!("プロフィールを更新しました");
         (StatusCode::OK, Json(EmptyResponse {})).into_response()
      }
      Err(e) => log_and_convert_user_service_error("プロフィール更新", e),
   }
}

/// GET /u/v1/user/list
///
/// ページ番号・サイズはそのまま User Service に渡す（`psize=0` も補正しない）。
#[utoipa::path(
   get,
   path = "/u/v1/user/list",
   tag = "user",
   security(("bearer_auth" = []), ("x_token" = [])),
   params(ListUsersQuery),
   responses(
      (status = 200, description = "取得成功", body = UserListResponse),
      (status = 400, description = "クエリが不正", body = MessageResponse),
      (status = 401, description = "未認証", body = MessageResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(
   State(state): State<Arc<UserState>>,
   query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Response {
   let Query(query) = match query {
      Ok(query) => query,
      Err(rejection) => return bad_request_response(rejection.body_text()),
   };
   let pn = query.pn.unwrap_or(DEFAULT_PAGE);
   let psize = query.psize.unwrap_or(DEFAULT_PAGE_SIZE);

   match state.user_service_client.list_users(pn, psize).await {
      Ok(page) => (
         StatusCode::OK,
         Json(UserListResponse {
            total: page.total,
            data:  page.users.into_iter().map(UserItemData::from).collect(),
         }),
      )
         .into_response(),
      Err(e) => log_and_convert_user_service_error("ユーザー一覧取得", e),
   }
}
