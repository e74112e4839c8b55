use regex::Regex;
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};

static CN_MOBILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("valid mobile regex"));

pub const PHONE_REQUIRED_MESSAGE: &str = "请输入手机号";
pub const PHONE_INVALID_MESSAGE: &str = "请输入正确的手机号格式";

/// 校验中国大陆手机号（1 开头，第二位 3-9，共 11 位）
///
/// 只有判空时忽略空白；格式按原样匹配，带空格的号码不合法。
pub fn validate_cn_phone(phone: &str) -> AppResult<String> {
    if phone.trim().is_empty() {
        return Err(AppError::ValidationError(PHONE_REQUIRED_MESSAGE.to_string()));
    }

    if !CN_MOBILE_REGEX.is_match(phone) {
        return Err(AppError::ValidationError(PHONE_INVALID_MESSAGE.to_string()));
    }

    Ok(phone.to_string())
}

/// 清洗输入框内容：只保留数字，最多 11 位
pub fn sanitize_phone_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(11)
        .collect()
}
