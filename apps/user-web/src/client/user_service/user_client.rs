//! User Service クライアントトレイト

use async_trait::async_trait;

use super::{
   error::UserServiceError,
   types::{CreateUserRequest, UpdateUserRequest, UserInfo, UserPage},
};

/// User Service クライアントトレイト
///
/// ハンドラは `Arc<dyn UserServiceClient>` で保持し、テストではスタブに差し替える。
#[async_trait]
pub trait UserServiceClient: Send + Sync {
   /// ユーザー一覧を取得する
   ///
   /// `pn` は 0 始まりのページ番号。値の補正は下流に任せる。
   async fn list_users(&self, pn: u32, psize: u32) -> Result<UserPage, UserServiceError>;

   /// 携帯番号でユーザーを検索する
   async fn get_user_by_mobile(&self, mobile: &str) -> Result<UserInfo, UserServiceError>;

   /// ID でユーザーを取得する
   async fn get_user_by_id(&self, id: i32) -> Result<UserInfo, UserServiceError>;

   /// ユーザーを登録する
   async fn create_user(&self, req: &CreateUserRequest) -> Result<UserInfo, UserServiceError>;

   /// プロフィールを更新する
   async fn update_user(&self, req: &UpdateUserRequest) -> Result<(), UserServiceError>;

   /// 平文パスワードと保存済みハッシュを照合する
   async fn check_password(
      &self,
      password: &str,
      encrypted_password: &str,
   ) -> Result<bool, UserServiceError>;
}
