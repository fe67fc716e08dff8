//! Rank (san) and nationality code normalization

/// Ordered: longer stems that contain shorter ones come first
/// (`протод` before `прот`, `протоиерей` is caught by `прот` before `иерей`).
const RANK_TABLE: &[(&str, &str)] = &[
    ("протод", "Протодиакон"),
    ("прот", "Протоиерей"),
    ("свящ", "Иерей"),
    ("иерей", "Иерей"),
    ("диак", "Диакон"),
    ("дьяк", "Диакон"),
];

const NATIONALITY_TABLE: &[(&str, &str)] = &[
    ("укр", "Украинец"),
    ("рус", "Русский"),
    ("молд", "Молдаванин"),
];

/// Map a rank abbreviation ("свящ.", "прот.", "иерей") to its canonical
/// label by substring. Unknown text is returned trimmed but otherwise as is.
pub fn normalize_rank(raw: &str) -> String {
    let key: String = raw.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
    if key.is_empty() {
        return String::new();
    }

    RANK_TABLE
        .iter()
        .find(|(stem, _)| key.contains(stem))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Map a nationality abbreviation ("укр.", "рус") to its canonical label
/// by prefix. Unknown text is returned trimmed but otherwise as is.
pub fn normalize_nationality(raw: &str) -> String {
    let key = raw
        .trim()
        .to_lowercase()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string();
    if key.is_empty() {
        return String::new();
    }

    NATIONALITY_TABLE
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Strip spaces, hyphens and parentheses from a phone number. A purely
/// numeric value that went through a float cell (`380501234567.0`) loses
/// its decimal tail.
pub fn normalize_phone(raw: &str) -> String {
    let phone: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    let digits_only = phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '.');
    if digits_only && phone.contains('.') {
        return phone.split('.').next().unwrap_or_default().to_string();
    }
    phone
}

/// Whether a status names a deacon rank (diaconate or protodiaconate)
pub fn is_deacon_rank(status: &str) -> bool {
    status.to_lowercase().contains("диакон")
}
