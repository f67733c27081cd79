//! # 検証エラーの翻訳
//!
//! `validator` の [`ValidationErrors`] を「フィールド名 → メッセージ」の表に変換する。
//!
//! - キーはクライアントが送ったフィールド名。ネストした値は `address.city`、
//!   配列要素は `items[0].name` のように、トップレベル構造体名を含まないパスで表す
//! - 1 フィールドに複数のエラーがある場合は最初の 1 件のみ返す
//! - メッセージの言語は [`Locale`] で切り替える

use std::{borrow::Cow, collections::BTreeMap, str::FromStr};

use serde_json::Value;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// 検証メッセージの言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            other => Err(format!("未対応のロケール: {other}（en / zh のいずれか）")),
        }
    }
}

/// 検証エラーの翻訳器
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// 検証エラーをフィールド名 → メッセージの表に変換する
    pub fn translate(&self, errors: &ValidationErrors) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        self.collect(None, errors, &mut out);
        out
    }

    fn collect(
        &self,
        prefix: Option<&str>,
        errors: &ValidationErrors,
        out: &mut BTreeMap<String, String>,
    ) {
        for (field, kind) in errors.errors() {
            let path = match prefix {
                Some(prefix) => format!("{prefix}.{field}"),
                None => field.to_string(),
            };
            match kind {
                ValidationErrorsKind::Field(list) => {
                    if let Some(first) = list.first() {
                        out.insert(path.clone(), self.message(field, first));
                    }
                }
                ValidationErrorsKind::Struct(nested) => self.collect(Some(&path), nested, out),
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        self.collect(Some(&format!("{path}[{index}]")), nested, out);
                    }
                }
            }
        }
    }

    /// 1 件のエラーをメッセージにする
    ///
    /// `message` が指定されていればそれを優先する。
    fn message(&self, field: &str, error: &ValidationError) -> String {
        if let Some(message) = &error.message {
            return message.to_string();
        }

        let param = |name: &str| error.params.get(name).and_then(Value::as_u64);
        let code: &str = &error.code;

        match (self.locale, code) {
            (Locale::En, "required") => format!("{field} is required"),
            (Locale::Zh, "required") => format!("{field}为必填字段"),

            (locale, "length") => length_message(locale, field, param("min"), param("max"), param("equal")),

            (Locale::En, "mobile") => format!("{field} is not a valid mobile number"),
            (Locale::Zh, "mobile") => format!("{field} 非法的手机号码!"),

            (Locale::En, "must_match") => format!("{field} does not match"),
            (Locale::Zh, "must_match") => format!("{field}不一致"),

            (Locale::En, "gender") => format!("{field} must be one of male, female, unknown"),
            (Locale::Zh, "gender") => format!("{field}必须是[male female unknown]中的一个"),

            (Locale::En, "birthday") => {
                format!("{field} must be a date in YYYY-MM-DD format, not before 1970-01-01")
            }
            (Locale::Zh, "birthday") => format!("{field}的格式必须是2006-01-02"),

            (Locale::En, _) => format!("{field} is invalid"),
            (Locale::Zh, _) => format!("{field}无效"),
        }
    }
}

fn length_message(
    locale: Locale,
    field: &str,
    min: Option<u64>,
    max: Option<u64>,
    equal: Option<u64>,
) -> String {
    let text: Cow<'static, str> = match (locale, equal, min, max) {
        (Locale::En, Some(n), _, _) => format!("must be exactly {n} characters").into(),
        (Locale::Zh, Some(n), _, _) => format!("长度必须是{n}个字符").into(),
        (Locale::En, None, Some(min), Some(max)) => {
            format!("must be between {min} and {max} characters").into()
        }
        (Locale::Zh, None, Some(min), Some(max)) => format!("长度必须在{min}到{max}个字符之间").into(),
        (Locale::En, None, Some(min), None) => format!("must be at least {min} characters").into(),
        (Locale::Zh, None, Some(min), None) => format!("长度必须至少为{min}个字符").into(),
        (Locale::En, None, None, Some(max)) => format!("must be at most {max} characters").into(),
        (Locale::Zh, None, None, Some(max)) => format!("长度不能超过{max}个字符").into(),
        (Locale::En, None, None, None) => "has an invalid length".into(),
        (Locale::Zh, None, None, None) => "长度无效".into(),
    };
    match locale {
        Locale::En => format!("{field} {text}"),
        Locale::Zh => format!("{field}{text}"),
    }
}
