//! `proto/user.proto` から生成したメッセージとクライアント
//!
//! 生成元はリポジトリ直下の `proto/user.proto`（`build.rs` 参照）。
//! パッケージ宣言が無いため RPC パスは `/User/<Method>` になる。

#![allow(clippy::all)]

tonic::include_proto!("_");

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use prost::Message as _;

   use super::*;

   #[test]
   fn test_id_requestのフィールド番号が定義どおりにエンコードされる() {
      let msg = IdRequest { id: 150 };
      // field 1, varint: 0x08, 150 = 0x96 0x01
      assert_eq!(msg.encode_to_vec(), vec![0x08, 0x96, 0x01]);
   }

   #[test]
   fn test_page_infoのp_sizeはフィールド2でエンコードされる() {
      let msg = PageInfo { pn: 0, p_size: 10 };
      // field 2, varint: 0x10, 10 = 0x0a（pn=0 は省略される）
      assert_eq!(msg.encode_to_vec(), vec![0x10, 0x0a]);
   }

   #[test]
   fn test_user_list_responseを復元できる() {
      let bytes = UserListResponse {
         total: 1,
         data:  vec![UserInfoResponse {
            id: 3,
            mobile: "13800000000".to_string(),
            ..Default::default()
         }],
      }
      .encode_to_vec();

      let decoded = UserListResponse::decode(bytes.as_slice()).unwrap();

      assert_eq!(decoded.total, 1);
      assert_eq!(decoded.data[0].id, 3);
      assert_eq!(decoded.data[0].mobile, "13800000000");
   }
}
