//! Full-name segmentation

use serde::{Deserialize, Serialize};

use super::cells::segment;

/// Rank and position words that precede names in contact lists
const RANK_WORDS: &[&str] = &[
    "настоятель",
    "протоиерей",
    "иерей",
    "священник",
    "свящ",
    "прот",
    "диакон",
    "дьякон",
    "протодиакон",
    "протодьякон",
    "диак",
    "дьяк",
    "протод",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameParts {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
}

/// Split "Surname Name Patronymic". The patronymic takes every word after the
/// second; a single word is a surname. `None` when there are no words at all.
pub fn split_full_name(full_name: &str) -> Option<NameParts> {
    let words: Vec<&str> = full_name.split_whitespace().collect();

    match words.as_slice() {
        [] => None,
        [surname] => Some(NameParts {
            surname: surname.to_string(),
            ..Default::default()
        }),
        [surname, name] => Some(NameParts {
            surname: surname.to_string(),
            name: name.to_string(),
            patronymic: String::new(),
        }),
        [surname, name, rest @ ..] => Some(NameParts {
            surname: surname.to_string(),
            name: name.to_string(),
            patronymic: rest.join(" "),
        }),
    }
}

/// Parse a contact-list cell such as
/// `"Настоятель, прот. Иоанн Петрович\nИванов"` (name first, surname last,
/// possibly wrapped onto its own line). Rank and position words and
/// one-letter tokens are dropped.
pub fn split_directory_name(cell: &str) -> Option<NameParts> {
    let joined = segment(cell).join(" ");
    let words: Vec<&str> = joined
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|w| w.trim_end_matches('.'))
        .filter(|w| w.chars().count() > 1)
        .filter(|w| !RANK_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();

    match words.as_slice() {
        [] => None,
        [surname] => Some(NameParts {
            surname: surname.to_string(),
            ..Default::default()
        }),
        [name, surname] => Some(NameParts {
            surname: surname.to_string(),
            name: name.to_string(),
            patronymic: String::new(),
        }),
        [name, patronymic, rest @ ..] => Some(NameParts {
            surname: rest.join(" "),
            name: name.to_string(),
            patronymic: patronymic.to_string(),
        }),
    }
}
