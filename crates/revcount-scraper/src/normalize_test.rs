use super::*;

fn canonical(raw: &str) -> Option<String> {
    normalize_date(raw).map(|d| d.to_string())
}

// -----------------------------------------------------------------------
// accepted shapes
// -----------------------------------------------------------------------

#[test]
fn weekday_suffix_is_stripped() {
    assert_eq!(canonical("8.8.금").as_deref(), Some("8.8"));
    assert_eq!(canonical("12.31.화").as_deref(), Some("12.31"));
}

#[test]
fn korean_month_day_units() {
    assert_eq!(canonical("8월 8일").as_deref(), Some("8.8"));
    assert_eq!(canonical("8월8일").as_deref(), Some("8.8"));
    assert_eq!(canonical("11월  3일").as_deref(), Some("11.3"));
}

#[test]
fn bare_month_day() {
    assert_eq!(canonical("9.1").as_deref(), Some("9.1"));
    assert_eq!(canonical("1.31").as_deref(), Some("1.31"));
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(canonical("  8.8.금\n").as_deref(), Some("8.8"));
}

#[test]
fn zero_padded_forms_share_a_key() {
    assert_eq!(normalize_date("08.08"), normalize_date("8.8"));
    assert_eq!(normalize_date("08월 08일"), normalize_date("8.8.금"));
}

#[test]
fn all_shapes_agree_for_every_valid_day() {
    let weekdays = ["월", "화", "수", "목", "금", "토", "일"];
    for month in 1..=12u32 {
        for day in 1..=31u32 {
            let expected = format!("{month}.{day}");
            let glyph = weekdays[((month + day) % 7) as usize];
            assert_eq!(canonical(&format!("{month}.{day}")), Some(expected.clone()));
            assert_eq!(
                canonical(&format!("{month}월 {day}일")),
                Some(expected.clone())
            );
            assert_eq!(
                canonical(&format!("{month}.{day}.{glyph}")),
                Some(expected)
            );
        }
    }
}

// -----------------------------------------------------------------------
// rejected input
// -----------------------------------------------------------------------

#[test]
fn out_of_range_is_rejected() {
    assert_eq!(canonical("13.1"), None);
    assert_eq!(canonical("0.5"), None);
    assert_eq!(canonical("8.32"), None);
    assert_eq!(canonical("13.1.금"), None);
    assert_eq!(canonical("0월 1일"), None);
}

#[test]
fn unknown_shapes_are_rejected() {
    for raw in [
        "garbage",
        "",
        "not-a-date",
        "2024-08-08",
        "2024.8.8",
        "8.8.",
        "8.8.Fri",
        "8.8.금요일",
        "8월",
        "방금 전",
    ] {
        assert_eq!(canonical(raw), None, "expected {raw:?} to be rejected");
    }
}
