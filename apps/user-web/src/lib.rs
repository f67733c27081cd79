//! # mxshop user-web ライブラリ
//!
//! ユーザーアカウント用の HTTP ゲートウェイ（BFF）。
//! ブラウザ・モバイルからのリクエストを検証し、gRPC で User Service に転送し、
//! 結果を JSON に変換して返す。
//!
//! ## モジュール構成
//!
//! - `app_builder`: 依存関係からルーターを組み立てる
//! - `client`: 下流 User Service の gRPC クライアント
//! - `config`: 環境変数からの設定読み込み
//! - `error`: 下流エラー → HTTP レスポンスの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: 認証、Request ID、キャッシュ制御
//! - `openapi`: OpenAPI 仕様の定義
//! - `validation`: フォームの抽出・検証とエラーメッセージの翻訳

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod validation;
