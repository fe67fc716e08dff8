//! Column layouts for known spreadsheet formats

use serde::{Deserialize, Serialize};

/// Known source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Diocesan register, columns A–K with multi-line date cells
    Odessa,
    /// One value per column, resolved from the header row
    Flat,
}

impl LayoutKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "odessa" | "legacy" | "a-k" => Some(LayoutKind::Odessa),
            "flat" | "headers" => Some(LayoutKind::Flat),
            _ => None,
        }
    }
}

/// Record field a column can feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutField {
    FullName,
    Surname,
    Name,
    Patronymic,
    Status,
    Nationality,
    BirthCell,
    BirthDate,
    BirthPlace,
    OrdinationCell,
    OrdinationDate,
    ServicePlace,
    SpiritualEducation,
    SecularEducation,
    LastReward,
    Phone,
}

/// Header synonyms, matched after lower-casing and trimming
const HEADER_SYNONYMS: &[(LayoutField, &[&str])] = &[
    (LayoutField::FullName, &["фио", "full name", "full_name"]),
    (LayoutField::Name, &["имя", "name", "имя священника", "имя_священника"]),
    (LayoutField::Surname, &["фамилия", "surname", "фамилия священника", "фамилия_священника"]),
    (LayoutField::Patronymic, &["отчество", "patronymic"]),
    (LayoutField::BirthDate, &["дата рождения", "birth date", "др", "дата_рождения", "birth_date"]),
    (LayoutField::BirthPlace, &["место рождения", "birth place", "место_рождения", "birth_place"]),
    (LayoutField::Status, &["статус", "status", "сан", "звание"]),
    (LayoutField::Nationality, &["национальность", "nationality"]),
    (
        LayoutField::OrdinationDate,
        &["дата рукоположения", "ordination date", "дата_рукоположения", "ordination_date", "рукоположение"],
    ),
    (
        LayoutField::ServicePlace,
        &["место служения", "service place", "место_служения", "service_place", "храм", "приход"],
    ),
    (
        LayoutField::SpiritualEducation,
        &["образование", "education", "духовное образование", "учебное заведение", "учебное_заведение"],
    ),
    (LayoutField::SecularEducation, &["светское образование", "secular education", "secular_education"]),
    (
        LayoutField::LastReward,
        &["последняя награда", "last reward", "последняя_награда", "last_reward", "награда", "reward"],
    ),
    (LayoutField::Phone, &["телефон", "phone"]),
];

/// Zero-based column position for every field a layout provides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    pub full_name: Option<usize>,
    pub surname: Option<usize>,
    pub name: Option<usize>,
    pub patronymic: Option<usize>,
    pub status: Option<usize>,
    pub nationality: Option<usize>,
    /// Year + day.month lines, optionally a name-day line
    pub birth_cell: Option<usize>,
    /// Complete date (`DD.MM.YYYY` or `YYYY-MM-DD`)
    pub birth_date: Option<usize>,
    pub birth_place: Option<usize>,
    /// Year and day.month lines for diaconate and priesthood
    pub ordination_cell: Option<usize>,
    pub ordination_date: Option<usize>,
    pub service_place: Option<usize>,
    pub spiritual_education: Option<usize>,
    pub secular_education: Option<usize>,
    pub last_reward: Option<usize>,
    pub phone: Option<usize>,
}

impl ColumnLayout {
    /// A – number, B – full name, C – rank, D – nationality,
    /// E – birth/name-day, F – ordinations, G – birth place,
    /// H – spiritual education, I – secular education,
    /// J – service place, K – last reward
    pub fn odessa() -> Self {
        Self {
            full_name: Some(1),
            status: Some(2),
            nationality: Some(3),
            birth_cell: Some(4),
            ordination_cell: Some(5),
            birth_place: Some(6),
            spiritual_education: Some(7),
            secular_education: Some(8),
            service_place: Some(9),
            last_reward: Some(10),
            ..Default::default()
        }
    }

    /// Resolve columns from a header row using the synonym table.
    /// Unknown headers are ignored; the first column claiming a field wins.
    pub fn from_headers(headers: &[String]) -> Self {
        let mut layout = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = header_field(header) {
                if layout.get(field).is_none() {
                    layout.set(field, idx);
                }
            }
        }
        layout
    }

    /// Whether the layout can produce an identity at all
    pub fn has_identity(&self) -> bool {
        self.full_name.is_some() || (self.surname.is_some() && self.name.is_some())
    }

    pub fn get(&self, field: LayoutField) -> Option<usize> {
        match field {
            LayoutField::FullName => self.full_name,
            LayoutField::Surname => self.surname,
            LayoutField::Name => self.name,
            LayoutField::Patronymic => self.patronymic,
            LayoutField::Status => self.status,
            LayoutField::Nationality => self.nationality,
            LayoutField::BirthCell => self.birth_cell,
            LayoutField::BirthDate => self.birth_date,
            LayoutField::BirthPlace => self.birth_place,
            LayoutField::OrdinationCell => self.ordination_cell,
            LayoutField::OrdinationDate => self.ordination_date,
            LayoutField::ServicePlace => self.service_place,
            LayoutField::SpiritualEducation => self.spiritual_education,
            LayoutField::SecularEducation => self.secular_education,
            LayoutField::LastReward => self.last_reward,
            LayoutField::Phone => self.phone,
        }
    }

    pub fn set(&mut self, field: LayoutField, idx: usize) {
        let slot = match field {
            LayoutField::FullName => &mut self.full_name,
            LayoutField::Surname => &mut self.surname,
            LayoutField::Name => &mut self.name,
            LayoutField::Patronymic => &mut self.patronymic,
            LayoutField::Status => &mut self.status,
            LayoutField::Nationality => &mut self.nationality,
            LayoutField::BirthCell => &mut self.birth_cell,
            LayoutField::BirthDate => &mut self.birth_date,
            LayoutField::BirthPlace => &mut self.birth_place,
            LayoutField::OrdinationCell => &mut self.ordination_cell,
            LayoutField::OrdinationDate => &mut self.ordination_date,
            LayoutField::ServicePlace => &mut self.service_place,
            LayoutField::SpiritualEducation => &mut self.spiritual_education,
            LayoutField::SecularEducation => &mut self.secular_education,
            LayoutField::LastReward => &mut self.last_reward,
            LayoutField::Phone => &mut self.phone,
        };
        *slot = Some(idx);
    }
}

fn header_field(header: &str) -> Option<LayoutField> {
    let normalized = header.trim().to_lowercase();
    HEADER_SYNONYMS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&normalized.as_str()))
        .map(|(field, _)| *field)
}
