//! # CAPTCHA
//!
//! ログインを自動化された試行から守るための画像チャレンジ。
//!
//! - [`CaptchaRenderer`]: 回答文字列と PNG 画像を生成する
//! - [`CaptchaStore`]: チャレンジ ID → 回答を一時保存する（単回使用）
//! - [`CaptchaService`]: 上記を組み合わせた発行・検証
//!
//! ## ストア
//!
//! | 実装 | 保存先 | 期限切れの扱い |
//! |------|--------|---------------|
//! | [`InMemoryCaptchaStore`] | プロセス内 `HashMap` | 挿入時に掃除、上限超過で期限が最も近いものを追い出す |
//! | [`RedisCaptchaStore`] | `captcha:{id}` | Redis の TTL（`SET EX`） |

use std::{
   collections::HashMap,
   sync::{Arc, Mutex},
   time::{Duration, Instant},
};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use redis::{AsyncCommands, aio::ConnectionManager};
use uuid::Uuid;

use crate::InfraError;

/// 画像の data URI 接頭辞
const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// 回答に使う文字
///
/// `captcha` クレート同梱のフォントには `'0'` のグリフが無く、描画時に黙って
/// 読み飛ばされるため含めない。
const DIGITS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// 指定桁数に満たない描画結果を作り直す上限回数
const MAX_RENDER_ATTEMPTS: usize = 3;

// =========================================================================
// Renderer
// =========================================================================

/// 生成済みのチャレンジ（回答と PNG）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCaptcha {
   pub answer: String,
   pub png:    Vec<u8>,
}

/// CAPTCHA 画像の生成器
pub trait CaptchaRenderer: Send + Sync {
   fn render(&self) -> Result<RenderedCaptcha, InfraError>;
}

/// 数字のみの CAPTCHA を生成する
#[derive(Debug, Clone, Copy)]
pub struct DigitCaptchaRenderer {
   length: u32,
   width:  u32,
   height: u32,
}

impl DigitCaptchaRenderer {
   pub fn new(length: u32, width: u32, height: u32) -> Self {
      Self {
         length,
         width,
         height,
      }
   }
}

impl Default for DigitCaptchaRenderer {
   /// 5 桁、幅 240 × 高さ 80
   fn default() -> Self {
      Self::new(5, 240, 80)
   }
}

impl CaptchaRenderer for DigitCaptchaRenderer {
   fn render(&self) -> Result<RenderedCaptcha, InfraError> {
      for _ in 0..MAX_RENDER_ATTEMPTS {
         let mut captcha = captcha::Captcha::new();
         captcha
            .set_chars(&DIGITS)
            .add_chars(self.length)
            .apply_filter(captcha::filters::Noise::new(0.1))
            .view(self.width, self.height);

         // グリフの無い文字は描画されず回答からも落ちる
         let answer = captcha.chars_as_string();
         if answer.chars().count() != self.length as usize {
            continue;
         }

         let png = captcha
            .as_png()
            .ok_or_else(|| InfraError::captcha("PNG へのエンコードに失敗しました"))?;
         return Ok(RenderedCaptcha { answer, png });
      }

      Err(InfraError::captcha(format!(
         "{} 桁の CAPTCHA を生成できませんでした",
         self.length
      )))
   }
}

// =========================================================================
// Store
// =========================================================================

/// チャレンジの回答を一時保存するストア
#[async_trait]
pub trait CaptchaStore: Send + Sync {
   /// 回答を保存する
   async fn put(&self, id: &str, answer: &str) -> Result<(), InfraError>;

   /// 回答を取り出す（取り出した時点で削除される）
   ///
   /// 存在しない・期限切れの場合は `None`。
   async fn take(&self, id: &str) -> Result<Option<String>, InfraError>;
}

struct Entry {
   answer:     String,
   expires_at: Instant,
}

/// プロセス内メモリに保存するストア
///
/// 件数に上限を持ち、負荷が高くても際限なく増えない。
pub struct InMemoryCaptchaStore {
   entries:     Mutex<HashMap<String, Entry>>,
   ttl:         Duration,
   max_entries: usize,
}

impl InMemoryCaptchaStore {
   pub fn new(ttl: Duration, max_entries: usize) -> Self {
      Self {
         entries: Mutex::new(HashMap::new()),
         ttl,
         max_entries: max_entries.max(1),
      }
   }

   /// 現在の保存件数（期限切れを含む）
   pub fn len(&self) -> usize {
      self.lock().len()
   }

   pub fn is_empty(&self) -> bool {
      self.len() == 0
   }

   fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
      // 保持中にパニックしても HashMap 自体は壊れないので続行する
      self.entries
         .lock()
         .unwrap_or_else(std::sync::PoisonError::into_inner)
   }

   fn put_at(&self, id: &str, answer: &str, now: Instant) {
      let mut entries = self.lock();
      entries.retain(|_, entry| entry.expires_at > now);

      while entries.len() >= self.max_entries {
         let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone())
         else {
            break;
         };
         entries.remove(&oldest);
      }

      entries.insert(
         id.to_string(),
         Entry {
            answer:     answer.to_string(),
            expires_at: now + self.ttl,
         },
      );
   }

   fn take_at(&self, id: &str, now: Instant) -> Option<String> {
      self.lock()
         .remove(id)
         .filter(|entry| entry.expires_at > now)
         .map(|entry| entry.answer)
   }
}

#[async_trait]
impl CaptchaStore for InMemoryCaptchaStore {
   async fn put(&self, id: &str, answer: &str) -> Result<(), InfraError> {
      self.put_at(id, answer, Instant::now());
      Ok(())
   }

   async fn take(&self, id: &str) -> Result<Option<String>, InfraError> {
      Ok(self.take_at(id, Instant::now()))
   }
}

/// Redis に保存するストア
///
/// 複数インスタンスでゲートウェイを動かす場合に使う。
pub struct RedisCaptchaStore {
   conn:     ConnectionManager,
   ttl_secs: u64,
}

impl RedisCaptchaStore {
   pub fn new(conn: ConnectionManager, ttl: Duration) -> Self {
      Self {
         conn,
         ttl_secs: ttl.as_secs().max(1),
      }
   }

   fn key(id: &str) -> String {
      format!("captcha:{}", id)
   }
}

#[async_trait]
impl CaptchaStore for RedisCaptchaStore {
   async fn put(&self, id: &str, answer: &str) -> Result<(), InfraError> {
      let mut conn = self.conn.clone();
      let _: () = conn.set_ex(Self::key(id), answer, self.ttl_secs).await?;
      Ok(())
   }

   async fn take(&self, id: &str) -> Result<Option<String>, InfraError> {
      let mut conn = self.conn.clone();
      let answer: Option<String> = conn.get_del(Self::key(id)).await?;
      Ok(answer)
   }
}

// =========================================================================
// Service
// =========================================================================

/// 発行したチャレンジ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaChallenge {
   pub id:    String,
   /// `data:image/png;base64,...` 形式の画像
   pub image: String,
}

/// CAPTCHA の発行と検証
pub struct CaptchaService {
   renderer: Arc<dyn CaptchaRenderer>,
   store:    Arc<dyn CaptchaStore>,
}

impl CaptchaService {
   pub fn new(renderer: Arc<dyn CaptchaRenderer>, store: Arc<dyn CaptchaStore>) -> Self {
      Self { renderer, store }
   }

   /// チャレンジを生成してストアに登録する
   ///
   /// 画像の描画は CPU を占有するため blocking スレッドで行う。
   pub async fn issue(&self) -> Result<CaptchaChallenge, InfraError> {
      let renderer = Arc::clone(&self.renderer);
      let rendered = tokio::task::spawn_blocking(move || renderer.render())
         .await
         .map_err(|e| InfraError::captcha(format!("描画タスクが異常終了しました: {e}")))??;
      let id = Uuid::now_v7().to_string();
      self.store.put(&id, &rendered.answer).await?;

      Ok(CaptchaChallenge {
         image: format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(&rendered.png)),
         id,
      })
   }

   /// 回答を検証する
   ///
   /// 結果に関わらずチャレンジは消費される。未知・期限切れの ID は `false`。
   /// 比較は前後の空白を除き、大文字小文字を区別しない。
   pub async fn verify(&self, id: &str, answer: &str) -> Result<bool, InfraError> {
      if id.is_empty() {
         return Ok(false);
      }
      let Some(expected) = self.store.take(id).await? else {
         return Ok(false);
      };
      Ok(expected.eq_ignore_ascii_case(answer.trim()))
   }
}
