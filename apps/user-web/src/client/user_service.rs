//! # User Service クライアント
//!
//! user-web から下流の User Service への gRPC 通信を担当する。
//!
//! ## RPC
//!
//! | メソッド | 用途 |
//! |---------|------|
//! | `/User/GetUserList` | ユーザー一覧（ページング） |
//! | `/User/GetUserByMobile` | 携帯番号でユーザーを検索 |
//! | `/User/GetUserById` | ID でユーザーを取得 |
//! | `/User/CreateUser` | ユーザー登録 |
//! | `/User/UpdateUser` | プロフィール更新 |
//! | `/User/CheckPassWord` | パスワード照合（ハッシュ計算は下流が行う） |
//!
//! メッセージ定義はリポジトリ直下の `proto/user.proto` を参照。
//! 全ての呼び出しに期限を付け、期限切れは [`UserServiceError::Unavailable`] になる。

mod client_impl;
mod error;
mod proto;
mod types;
mod user_client;

pub use client_impl::UserServiceClientImpl;
pub use error::UserServiceError;
pub use types::{CreateUserRequest, UpdateUserRequest, UserInfo, UserPage};
pub use user_client::UserServiceClient;
