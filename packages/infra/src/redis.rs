//! # Redis 接続管理
//!
//! `ConnectionManager` は切断時に自動再接続し、clone して共有できる。

use redis::aio::ConnectionManager;

use crate::InfraError;

/// Redis 接続マネージャを作成する
///
/// # 引数
///
/// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379/0`）
pub async fn create_connection_manager(redis_url: &str) -> Result<ConnectionManager, InfraError> {
   let client = redis::Client::open(redis_url)?;
   let conn = ConnectionManager::new(client).await?;
   tracing::info!("Redis に接続しました");
   Ok(conn)
}
