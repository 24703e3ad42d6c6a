/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a globally unique record id (UUID v4, hyphenated).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Mask all but the last four characters of a card number.
///
/// `"1111-2222-3333-4444"` → `"****4444"`. Short inputs are masked entirely.
pub fn mask_card_number(card: &str) -> String {
    let digits: Vec<char> = card.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("****{tail}")
}
