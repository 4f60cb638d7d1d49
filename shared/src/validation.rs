//! 表单校验
//!
//! 纯函数，同步执行，无副作用。页面在发出任何网络请求前调用。

use crate::error::{ClientError, ClientResult};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[a-z0-9][a-z0-9_.!#$%\&'*+,\-/=?^`\{\|\}\~]{0,63}@[0-9a-z.\-]{1,253}\.[a-z.]{2,6}$"#,
    )
    .expect("email pattern is valid")
});

// 与服务端 safe_text_validator 保持一致
static UNSAFE_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(drop database)|(drop table (adventure|custom_field|encounter|scene|user))")
        .expect("safe text pattern is valid")
});

pub const MIN_PASSWORD_LEN: usize = 8;

/// 校验邮箱格式（不区分大小写）
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

/// 校验密码强度
///
/// 至少 8 位，包含小写字母、大写字母和数字；
/// 只允许可打印 ASCII 字符（空格、`` ` ``、`|`、`~` 除外）。
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, '`' | '|' | '~'))
}

/// 服务端会拒绝的文本，提前在客户端标记
pub fn is_safe_text(text: &str) -> bool {
    !UNSAFE_TEXT_RE.is_match(text)
}

// ===== 表单级校验 =====

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const MISSING_PASSWORD_MESSAGE: &str =
    "Please enter your password or click \"Forgot Password?\"";
pub const WEAK_PASSWORD_MESSAGE: &str = "Password must contain at least 8 characters, including an uppercase letter, a lowercase letter, and a number.";
pub const PASSWORD_MISMATCH_MESSAGE: &str =
    "Password confirmation must match Password entered above";

fn check_email(email: &str) -> ClientResult<()> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(ClientError::validation("email", INVALID_EMAIL_MESSAGE))
    }
}

fn check_new_password(password: &str, confirm: &str) -> ClientResult<()> {
    if !validate_password(password) {
        return Err(ClientError::validation("password", WEAK_PASSWORD_MESSAGE));
    }
    if password != confirm {
        return Err(ClientError::validation("confirm", PASSWORD_MISMATCH_MESSAGE));
    }
    Ok(())
}

/// 登录表单
pub fn check_login(email: &str, password: &str) -> ClientResult<()> {
    check_email(email)?;
    if !validate_password(password) {
        return Err(ClientError::validation("password", MISSING_PASSWORD_MESSAGE));
    }
    Ok(())
}

/// 注册表单
pub fn check_new_account(email: &str, password: &str, confirm: &str) -> ClientResult<()> {
    check_email(email)?;
    check_new_password(password, confirm)
}

/// 账户设置：留空的字段表示不修改
pub fn check_account_update(email: &str, password: &str, confirm: &str) -> ClientResult<()> {
    if email.is_empty() && password.is_empty() {
        return Err(ClientError::validation("form", "There are no changes to save."));
    }
    if !email.is_empty() {
        check_email(email)?;
    }
    if !password.is_empty() {
        check_new_password(password, confirm)?;
    }
    Ok(())
}

/// 重置密码确认
pub fn check_password_reset(password: &str, confirm: &str) -> ClientResult<()> {
    check_new_password(password, confirm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.co"));
        assert!(validate_email("Game.Master+odyssey@example.org"));
        assert!(validate_email("gm@mail.example.co.uk"));

        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("gm@example"));
        assert!(!validate_email("gm@example.toolongtld"));
        assert!(!validate_email(".gm@example.com"));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Abcdefg1"));
        assert!(validate_password("S3cure!Pass#"));

        assert!(!validate_password("abcdefgh"));
        assert!(!validate_password("ABCDEFG1"));
        assert!(!validate_password("Abcdefgh"));
        assert!(!validate_password("Abc1"));
        assert!(!validate_password("Abcd efg1"));
        assert!(!validate_password("Abcdefg1~"));
    }

    #[test]
    fn test_safe_text() {
        assert!(is_safe_text("The dragon drops the table"));
        assert!(!is_safe_text("please DROP TABLE scene now"));
        assert!(!is_safe_text("drop database"));
    }

    fn field_of(result: ClientResult<()>) -> Option<String> {
        match result {
            Err(ClientError::Validation { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_form_checks() {
        assert!(check_login("gm@example.com", "Abcdefg1").is_ok());
        assert_eq!(field_of(check_login("gm", "Abcdefg1")).as_deref(), Some("email"));
        assert_eq!(field_of(check_login("gm@example.com", "")).as_deref(), Some("password"));

        assert!(check_new_account("gm@example.com", "Abcdefg1", "Abcdefg1").is_ok());
        assert_eq!(
            field_of(check_new_account("gm@example.com", "Abcdefg1", "Abcdefg2")).as_deref(),
            Some("confirm")
        );
    }

    #[test]
    fn test_account_update_allows_partial_changes() {
        assert!(check_account_update("new@example.com", "", "").is_ok());
        assert!(check_account_update("", "Abcdefg1", "Abcdefg1").is_ok());
        assert_eq!(field_of(check_account_update("", "", "")).as_deref(), Some("form"));
        assert_eq!(
            field_of(check_account_update("", "weak", "weak")).as_deref(),
            Some("password")
        );
        assert!(check_password_reset("Abcdefg1", "Abcdefg1").is_ok());
    }
}
