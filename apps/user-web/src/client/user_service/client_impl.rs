//! gRPC による User Service クライアント実装
//!
//! `proto/user.proto` から生成した `UserClient` を包み、期限・Request ID の付与と
//! エラー分類を行う。

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use tonic::{
   Request,
   Response,
   Status,
   transport::{Channel, Endpoint},
};

use super::{
   error::UserServiceError,
   proto::{self, user_client::UserClient},
   types::{CreateUserRequest, UpdateUserRequest, UserInfo, UserPage},
   user_client::UserServiceClient,
};
use crate::middleware::request_id::inject_request_id;

/// User Service クライアント実装
///
/// 起動時に開いた 1 本のチャネルを clone して共有する。
#[derive(Clone)]
pub struct UserServiceClientImpl {
   inner:   UserClient<Channel>,
   timeout: Duration,
}

impl UserServiceClientImpl {
   /// User Service に接続する
   ///
   /// # 引数
   ///
   /// - `url`: User Service の URL（例: `http://127.0.0.1:50051`）
   /// - `timeout`: 接続と各呼び出しの期限
   pub async fn connect(url: &str, timeout: Duration) -> Result<Self, UserServiceError> {
      let channel = Endpoint::from_shared(url.to_string())?
         .connect_timeout(timeout)
         .timeout(timeout)
         .connect()
         .await?;
      Ok(Self::new(channel, timeout))
   }

   /// 既存のチャネルからクライアントを作る
   pub fn new(channel: Channel, timeout: Duration) -> Self {
      Self {
         inner: UserClient::new(channel),
         timeout,
      }
   }

   /// 期限と Request ID を付けたリクエストを作る
   ///
   /// 期限は gRPC の `grpc-timeout` として下流へ伝わる。
   fn request<T>(&self, message: T) -> Request<T> {
      let mut request = Request::new(message);
      request.set_timeout(self.timeout);
      inject_request_id(&mut request);
      request
   }

   /// 呼び出しをローカルでも期限で打ち切り、結果を分類する
   async fn call<T>(
      &self,
      rpc: &'static str,
      call: impl Future<Output = Result<Response<T>, Status>>,
   ) -> Result<T, UserServiceError> {
      match tokio::time::timeout(self.timeout, call).await {
         Ok(Ok(response)) => Ok(response.into_inner()),
         Ok(Err(status)) => Err(status.into()),
         Err(_) => Err(UserServiceError::Unavailable(format!(
            "{} が {}ms 以内に応答しませんでした",
            rpc,
            self.timeout.as_millis()
         ))),
      }
   }
}

#[async_trait]
impl UserServiceClient for UserServiceClientImpl {
   async fn list_users(&self, pn: u32, psize: u32) -> Result<UserPage, UserServiceError> {
      let mut client = self.inner.clone();
      let req = self.request(proto::PageInfo { pn, p_size: psize });
      let res = self.call("GetUserList", client.get_user_list(req)).await?;
      Ok(res.into())
   }

   async fn get_user_by_mobile(&self, mobile: &str) -> Result<UserInfo, UserServiceError> {
      let mut client = self.inner.clone();
      let req = self.request(proto::MobileRequest {
         mobile: mobile.to_string(),
      });
      let res = self
         .call("GetUserByMobile", client.get_user_by_mobile(req))
         .await?;
      Ok(res.into())
   }

   async fn get_user_by_id(&self, id: i32) -> Result<UserInfo, UserServiceError> {
      let mut client = self.inner.clone();
      let req = self.request(proto::IdRequest { id });
      let res = self.call("GetUserById", client.get_user_by_id(req)).await?;
      Ok(res.into())
   }

   async fn create_user(&self, req: &CreateUserRequest) -> Result<UserInfo, UserServiceError> {
      let mut client = self.inner.clone();
      let req = self.request(proto::CreateUserInfo::from(req));
      let res = self.call("CreateUser", client.create_user(req)).await?;
      Ok(res.into())
   }

   async fn update_user(&self, req: &UpdateUserRequest) -> Result<(), UserServiceError> {
      let mut client = self.inner.clone();
      let req = self.request(proto::UpdateUserInfo::from(req));
      // 戻り値は google.protobuf.Empty
      self.call("UpdateUser", client.update_user(req)).await
   }

   async fn check_password(
      &self,
      password: &str,
      encrypted_password: &str,
   ) -> Result<bool, UserServiceError> {
      let mut client = self.inner.clone();
      let req = self.request(proto::PasswordCheckInfo {
         password:           password.to_string(),
         encrypted_password: encrypted_password.to_string(),
      });
      let res = self.call("CheckPassWord", client.check_pass_word(req)).await?;
      Ok(res.success)
   }
}
