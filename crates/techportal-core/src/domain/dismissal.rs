//! Dismissal marker - インストールバナーの非表示タイムスタンプ
//!
//! ストレージには epoch ミリ秒が文字列で保存されます。
//! 読み取りは「先頭の整数部分だけを解釈する」寛容なパースです。
//!
//! # 判定ルール
//! - 値なし（または空文字列）: 一度も dismiss されていない → 表示
//! - 数値あり: 経過時間がクールダウンを **超えた** ときだけ表示
//! - 数値として読めない: 表示しない（次の dismiss で上書きされるまで）

/// 1 日のミリ秒数
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// デフォルトのクールダウン（7 日 = 604,800,000 ms）
pub const DEFAULT_COOLDOWN_MS: i64 = 7 * DAY_MS;

/// DismissalMarker は保存済みの dismiss 記録を解釈した結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissalMarker {
    /// 一度も dismiss されていない
    Never,
    /// dismiss された時刻（epoch ms）
    At(i64),
    /// 値はあるが数値として読めない
    Unreadable,
}

impl DismissalMarker {
    /// ストレージの生の値を解釈
    pub fn parse(stored: Option<&str>) -> Self {
        match stored {
            None | Some("") => DismissalMarker::Never,
            Some(raw) => parse_leading_int(raw)
                .map(DismissalMarker::At)
                .unwrap_or(DismissalMarker::Unreadable),
        }
    }

    /// 保存用にエンコード
    pub fn encode(timestamp_ms: i64) -> String {
        timestamp_ms.to_string()
    }

    /// バナーを表示してよいか
    ///
    /// 境界ちょうど（elapsed == cooldown）は表示しない。
    pub fn allows_banner(self, now_ms: i64, cooldown_ms: i64) -> bool {
        match self {
            DismissalMarker::Never => true,
            DismissalMarker::At(dismissed_at) => now_ms.saturating_sub(dismissed_at) > cooldown_ms,
            DismissalMarker::Unreadable => false,
        }
    }
}

/// 先頭の空白を読み飛ばし、符号と数字の並びだけを解釈する。
/// 桁あふれは飽和させる。
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let digit = i64::from(byte - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::absent(None, DismissalMarker::Never)]
    #[case::empty(Some(""), DismissalMarker::Never)]
    #[case::plain(Some("1700000000000"), DismissalMarker::At(1_700_000_000_000))]
    #[case::leading_whitespace(Some("  15"), DismissalMarker::At(15))]
    #[case::trailing_garbage(Some("123abc"), DismissalMarker::At(123))]
    #[case::signed(Some("-5"), DismissalMarker::At(-5))]
    #[case::zero(Some("0"), DismissalMarker::At(0))]
    #[case::garbage(Some("abc"), DismissalMarker::Unreadable)]
    #[case::sign_only(Some("-"), DismissalMarker::Unreadable)]
    fn parses_stored_value(#[case] stored: Option<&str>, #[case] expected: DismissalMarker) {
        assert_eq!(DismissalMarker::parse(stored), expected);
    }

    #[test]
    fn overflowing_value_saturates() {
        assert_eq!(
            DismissalMarker::parse(Some("99999999999999999999999")),
            DismissalMarker::At(i64::MAX)
        );
    }

    #[rstest]
    #[case::just_dismissed(0, false)]
    #[case::six_days(6 * DAY_MS, false)]
    #[case::exactly_seven_days(7 * DAY_MS, false)]
    #[case::one_ms_past(7 * DAY_MS + 1, true)]
    #[case::eight_days(8 * DAY_MS, true)]
    fn cooldown_is_strictly_greater(#[case] elapsed: i64, #[case] shown: bool) {
        let dismissed_at = 1_000_000;
        let marker = DismissalMarker::At(dismissed_at);
        assert_eq!(
            marker.allows_banner(dismissed_at + elapsed, DEFAULT_COOLDOWN_MS),
            shown
        );
    }

    #[test]
    fn never_dismissed_always_allows() {
        assert!(DismissalMarker::Never.allows_banner(0, DEFAULT_COOLDOWN_MS));
    }

    #[test]
    fn unreadable_never_allows() {
        assert!(!DismissalMarker::Unreadable.allows_banner(i64::MAX, DEFAULT_COOLDOWN_MS));
    }

    #[test]
    fn cooldown_constant_matches_seven_days() {
        assert_eq!(DEFAULT_COOLDOWN_MS, 604_800_000);
    }
}
