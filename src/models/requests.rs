use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{FilterCriteria, TravelType, TravelTypeFilter};

/// Ad hoc explore query
///
/// GET /api/v1/travel-plans/match?destination=&startDate=&endDate=&travelType=
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ExploreQuery {
    #[validate(length(max = 200))]
    pub destination: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "travelType", default)]
    pub travel_type: TravelTypeFilter,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
}

impl ExploreQuery {
    /// Filter set for the engine; `today` drops trips that already ended
    pub fn to_criteria(&self, requester_id: Option<&str>, today: NaiveDate) -> FilterCriteria {
        FilterCriteria {
            destination: self
                .destination
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            start_date: self.start_date,
            end_date: self.end_date,
            travel_type: self.travel_type,
            requester_id: requester_id.map(str::to_string),
            not_before: Some(today),
        }
    }

    /// Travel type to push down to the repository, if any
    pub fn travel_type(&self) -> Option<TravelType> {
        match self.travel_type {
            TravelTypeFilter::Any => None,
            TravelTypeFilter::Only(travel_type) => Some(travel_type),
        }
    }
}

/// Paginated plan listing
///
/// GET /api/v1/travel-plans?page=&limit=&destination=&travelType=
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlanListQuery {
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
    #[validate(length(max = 200))]
    pub destination: Option<String>,
    #[serde(rename = "travelType")]
    pub travel_type: Option<String>,
}

impl PlanListQuery {
    pub fn travel_type(&self) -> Result<Option<TravelType>, String> {
        match self.travel_type.as_deref().map(str::parse::<TravelTypeFilter>) {
            None => Ok(None),
            Some(Ok(TravelTypeFilter::Any)) => Ok(None),
            Some(Ok(TravelTypeFilter::Only(travel_type))) => Ok(Some(travel_type)),
            Some(Err(e)) => Err(e),
        }
    }
}

/// Suggested buddies query
///
/// GET /api/v1/matches/suggested?limit=
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SuggestedQuery {
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}
