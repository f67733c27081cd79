//! # 外部サービスクライアント
//!
//! 下流の User Service（gRPC）との通信を担当する。

pub mod user_service;

pub use user_service::{
    CreateUserRequest,
    UpdateUserRequest,
    UserInfo,
    UserPage,
    UserServiceClient,
    UserServiceClientImpl,
    UserServiceError,
};
