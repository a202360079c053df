use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of trip a plan describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelType {
    Solo,
    Family,
    Friends,
    Couple,
    Group,
}

impl TravelType {
    pub const ALL: [TravelType; 5] = [
        TravelType::Solo,
        TravelType::Family,
        TravelType::Friends,
        TravelType::Couple,
        TravelType::Group,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelType::Solo => "SOLO",
            TravelType::Family => "FAMILY",
            TravelType::Friends => "FRIENDS",
            TravelType::Couple => "COUPLE",
            TravelType::Group => "GROUP",
        }
    }
}

impl fmt::Display for TravelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TravelType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "Unknown travel type '{}', expected one of: SOLO, FAMILY, FRIENDS, COUPLE, GROUP",
                    wanted
                )
            })
    }
}

/// Who may see a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Visibility::Public),
            "PRIVATE" => Ok(Visibility::Private),
            other => Err(format!("Unknown visibility '{}'", other)),
        }
    }
}

/// Hosting user as embedded in plan documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    #[serde(rename = "profileImage", default)]
    pub profile_image: Option<String>,
    #[serde(rename = "isVerifiedBadge", default)]
    pub is_verified_badge: bool,
    #[serde(rename = "isPremium", default)]
    pub is_premium: bool,
}

impl Host {
    /// Host with nothing known but the id
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: None,
            profile_image: None,
            is_verified_badge: false,
            is_premium: false,
        }
    }
}

/// A travel plan as stored by the plan repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPlan {
    pub id: String,
    #[serde(rename = "ownerId", alias = "hostId", default)]
    pub owner_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub destination: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        rename = "startDate",
        default,
        deserialize_with = "plan_date::deserialize"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", default, deserialize_with = "plan_date::deserialize")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "travelType")]
    pub travel_type: TravelType,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(rename = "budgetMin", default)]
    pub budget_min: Option<f64>,
    #[serde(rename = "budgetMax", default)]
    pub budget_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Host>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TravelPlan {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Host details, falling back to the owner id when the repository sent none
    pub fn host_or_owner(&self) -> Host {
        self.host
            .clone()
            .unwrap_or_else(|| Host::bare(self.owner_id.clone()))
    }

    /// Fill `owner_id` from the embedded host when only the host was sent
    pub fn with_owner_from_host(mut self) -> Self {
        if self.owner_id.is_empty() {
            if let Some(host) = &self.host {
                self.owner_id = host.id.clone();
            }
        }
        self
    }

    /// Budget bounds must be non-negative, with min not above max
    pub fn check_budget(&self) -> Result<(), String> {
        for (name, value) in [("budgetMin", self.budget_min), ("budgetMax", self.budget_max)] {
            if let Some(value) = value {
                if value.is_nan() || value < 0.0 {
                    return Err(format!("{} must be non-negative, got {}", name, value));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            if min > max {
                return Err(format!("budgetMin {} exceeds budgetMax {}", min, max));
            }
        }
        Ok(())
    }
}

/// A candidate plan that matched a reference plan.
///
/// Derived per query and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub reference_plan_id: String,
    pub candidate_plan: TravelPlan,
}

/// Travel type constraint of an ad hoc query; "all" or absent means any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelTypeFilter {
    #[default]
    Any,
    Only(TravelType),
}

impl TravelTypeFilter {
    #[inline]
    pub fn accepts(&self, travel_type: TravelType) -> bool {
        match self {
            TravelTypeFilter::Any => true,
            TravelTypeFilter::Only(wanted) => *wanted == travel_type,
        }
    }
}

impl FromStr for TravelTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(TravelTypeFilter::Any);
        }
        s.parse().map(TravelTypeFilter::Only)
    }
}

impl<'de> Deserialize<'de> for TravelTypeFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl From<TravelType> for TravelTypeFilter {
    fn from(value: TravelType) -> Self {
        TravelTypeFilter::Only(value)
    }
}

/// Ad hoc "explore" filter set.
///
/// `requester_id` excludes the requester's own plans when known.
/// `not_before` drops candidates whose trip has already ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub travel_type: TravelTypeFilter,
    pub requester_id: Option<String>,
    pub not_before: Option<NaiveDate>,
}

/// Plan dates arrive either as `YYYY-MM-DD` or as full RFC 3339 timestamps
mod plan_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.date_naive()))
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", raw, e)))
    }
}
