//! User Service とやり取りする値の型
//!
//! 生成コード（`proto`）はモジュール外へ出さず、ここで定義した型に詰め替える。

use mxshop_domain::user::{Gender, Mobile};

use super::proto;

/// ユーザー情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
   pub id:        i32,
   /// パスワードハッシュ（照合 RPC にそのまま渡すだけで、外部には出さない）
   pub password:  String,
   pub mobile:    String,
   pub nick_name: String,
   /// 誕生日（UTC 0 時の UNIX 秒、未設定は 0）
   pub birth_day: u64,
   pub gender:    String,
   pub role:      i32,
}

/// ユーザー一覧の 1 ページ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
   pub total: i32,
   pub users: Vec<UserInfo>,
}

/// ユーザー登録リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
   pub nick_name: String,
   pub password:  String,
   pub mobile:    Mobile,
}

/// プロフィール更新リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
   pub id:        i32,
   pub nick_name: String,
   pub gender:    Gender,
   pub birth_day: u64,
}

impl From<proto::UserInfoResponse> for UserInfo {
   fn from(res: proto::UserInfoResponse) -> Self {
      Self {
         id:        res.id,
         password:  res.pass_word,
         mobile:    res.mobile,
         nick_name: res.nick_name,
         birth_day: res.birth_day,
         gender:    res.gender,
         role:      res.role,
      }
   }
}

impl From<proto::UserListResponse> for UserPage {
   fn from(res: proto::UserListResponse) -> Self {
      Self {
         total: res.total,
         users: res.data.into_iter().map(UserInfo::from).collect(),
      }
   }
}

impl From<&CreateUserRequest> for proto::CreateUserInfo {
   fn from(req: &CreateUserRequest) -> Self {
      Self {
         nick_name: req.nick_name.clone(),
         pass_word: req.password.clone(),
         mobile:    req.mobile.as_str().to_string(),
      }
   }
}

impl From<&UpdateUserRequest> for proto::UpdateUserInfo {
   fn from(req: &UpdateUserRequest) -> Self {
      Self {
         id:        req.id,
         nick_name: req.nick_name.clone(),
         gender:    req.gender.as_str().to_string(),
         birth_day: req.birth_day,
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_登録リクエストは携帯番号を文字列で渡す() {
      let req = CreateUserRequest {
         nick_name: "13800000000".to_string(),
         password:  "secret".to_string(),
         mobile:    Mobile::new("13800000000").unwrap(),
      };

      let msg = proto::CreateUserInfo::from(&req);

      assert_eq!(msg.mobile, "13800000000");
      assert_eq!(msg.pass_word, "secret");
   }

   #[test]
   fn test_更新リクエストは性別を小文字で渡す() {
      let req = UpdateUserRequest {
         id:        1,
         nick_name: "alice".to_string(),
         gender:    Gender::Female,
         birth_day: 0,
      };

      let msg = proto::UpdateUserInfo::from(&req);

      assert_eq!(msg.gender, "female");
      assert_eq!(msg.id, 1);
   }
}
