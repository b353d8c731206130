use serde::{Deserialize, Serialize};

/// Field vocabulary of the recommendation markup. This is a private
/// convention with the model backend, fixed so test fixtures stay stable;
/// unknown tags inside a block are ignored.
pub const FIELD_NAMES: [&str; 19] = [
    "name",
    "country",
    "city",
    "program",
    "tuition_annual",
    "living_cost_annual",
    "total_cost_annual",
    "duration",
    "language",
    "ranking",
    "gre_required",
    "ielts_minimum",
    "toefl_minimum",
    "application_deadline",
    "intake_seasons",
    "industry_connections",
    "scholarships_available",
    "why_good_fit",
    "official_link",
];

/// One structured college recommendation extracted from assistant text.
/// Immutable once extracted; it is a derived view over the message content.
/// `name` is the only required field and doubles as the identity key for the
/// selection sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationBlock {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuition_annual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub living_cost_annual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost_annual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gre_required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ielts_minimum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toefl_minimum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake_seasons: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_connections: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarships_available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why_good_fit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_link: Option<String>,
}

impl RecommendationBlock {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn set_field(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = value,
            "country" => self.country = Some(value),
            "city" => self.city = Some(value),
            "program" => self.program = Some(value),
            "tuition_annual" => self.tuition_annual = Some(value),
            "living_cost_annual" => self.living_cost_annual = Some(value),
            "total_cost_annual" => self.total_cost_annual = Some(value),
            "duration" => self.duration = Some(value),
            "language" => self.language = Some(value),
            "ranking" => self.ranking = Some(value),
            "gre_required" => self.gre_required = Some(value),
            "ielts_minimum" => self.ielts_minimum = Some(value),
            "toefl_minimum" => self.toefl_minimum = Some(value),
            "application_deadline" => self.application_deadline = Some(value),
            "intake_seasons" => self.intake_seasons = Some(value),
            "industry_connections" => self.industry_connections = Some(value),
            "scholarships_available" => self.scholarships_available = Some(value),
            "why_good_fit" => self.why_good_fit = Some(value),
            "official_link" => self.official_link = Some(value),
            _ => {}
        }
    }
}
