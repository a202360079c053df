use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use crate::core::{dates::is_upcoming, matcher::{MatchError, Matcher}};
use crate::models::{MatchResult, TravelPlan};

/// Match lists keyed by reference plan id, in reference order.
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchesByPlan<T = MatchResult> {
    entries: Vec<(String, Vec<T>)>,
}

impl<T> MatchesByPlan<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Set the list for `plan_id`; an existing key keeps its position
    pub fn insert(&mut self, plan_id: String, matches: Vec<T>) {
        match self.entries.iter_mut().find(|(id, _)| *id == plan_id) {
            Some((_, existing)) => *existing = matches,
            None => self.entries.push((plan_id, matches)),
        }
    }

    pub fn get(&self, plan_id: &str) -> Option<&[T]> {
        self.entries
            .iter()
            .find(|(id, _)| id == plan_id)
            .map(|(_, matches)| matches.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(id, matches)| (id.as_str(), matches.as_slice()))
    }

    /// Total number of matches across all plans
    pub fn total_matches(&self) -> usize {
        self.entries.iter().map(|(_, matches)| matches.len()).sum()
    }

    /// Convert every match, keeping keys and order
    pub fn map<U, F>(&self, mut f: F) -> MatchesByPlan<U>
    where
        F: FnMut(&T) -> U,
    {
        MatchesByPlan {
            entries: self
                .entries
                .iter()
                .map(|(id, matches)| (id.clone(), matches.iter().map(&mut f).collect()))
                .collect(),
        }
    }
}

impl<T> Default for MatchesByPlan<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for MatchesByPlan<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (plan_id, matches) in &self.entries {
            map.serialize_entry(plan_id, matches)?;
        }
        map.end()
    }
}

/// The requester's plans that have not yet ended, in input order
pub fn upcoming_plans(plans: &[TravelPlan], today: NaiveDate) -> Vec<TravelPlan> {
    plans
        .iter()
        .filter(|plan| is_upcoming(plan, today))
        .cloned()
        .collect()
}

/// Run the engine once per reference plan.
///
/// Every reference plan gets a key, with an empty list when nothing
/// matched. Fails on the first invalid reference plan.
pub fn group_by_plan(
    matcher: &Matcher,
    reference_plans: &[TravelPlan],
    pool: &[TravelPlan],
) -> Result<MatchesByPlan, MatchError> {
    let mut grouped = MatchesByPlan::new();

    for reference in reference_plans {
        let matches = matcher
            .find_matches(reference, pool)?
            .into_iter()
            .map(|candidate_plan| MatchResult {
                reference_plan_id: reference.id.clone(),
                candidate_plan,
            })
            .collect();

        grouped.insert(reference.id.clone(), matches);
    }

    tracing::debug!(
        "Grouped {} matches across {} reference plans",
        grouped.total_matches(),
        grouped.len()
    );

    Ok(grouped)
}

/// Flatten the groups and keep the first match per host, up to `limit`.
///
/// Earlier reference plans take priority.
pub fn dedupe_by_counterpart(grouped: &MatchesByPlan, limit: usize) -> Vec<MatchResult> {
    let mut seen_hosts: HashSet<&str> = HashSet::new();

    grouped
        .iter()
        .flat_map(|(_, matches)| matches.iter())
        .filter(|result| seen_hosts.insert(result.candidate_plan.owner_id.as_str()))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TravelType, Visibility};

    fn create_plan(id: &str, owner: &str, destination: &str, start: u32, end: u32) -> TravelPlan {
        TravelPlan {
            id: id.to_string(),
            owner_id: owner.to_string(),
            title: None,
            destination: destination.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 6, start),
            end_date: NaiveDate::from_ymd_opt(2025, 6, end),
            travel_type: TravelType::Solo,
            visibility: Visibility::Public,
            budget_min: None,
            budget_max: None,
            host: None,
            created_at: None,
        }
    }

    #[test]
    fn test_group_keeps_empty_references() {
        let matcher = Matcher::new();
        let references = vec![
            create_plan("r1", "me", "Sajek", 1, 5),
            create_plan("r2", "me", "Sylhet", 1, 5),
        ];
        let pool = vec![create_plan("c1", "u2", "Sajek", 3, 7)];

        let grouped = group_by_plan(&matcher, &references, &pool).unwrap();

        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["r1", "r2"]);
        assert_eq!(grouped.get("r1").unwrap().len(), 1);
        assert!(grouped.get("r2").unwrap().is_empty());
    }

    #[test]
    fn test_dedupe_first_occurrence_wins() {
        let matcher = Matcher::new();
        let references = vec![
            create_plan("r1", "me", "Sajek", 1, 5),
            create_plan("r2", "me", "Sylhet", 1, 5),
        ];
        let pool = vec![
            create_plan("c1", "u2", "Sajek", 3, 7),
            create_plan("c2", "u2", "Sylhet", 2, 3),
            create_plan("c3", "u3", "Sylhet", 2, 3),
        ];

        let grouped = group_by_plan(&matcher, &references, &pool).unwrap();
        let deduped = dedupe_by_counterpart(&grouped, 10);
        let ids: Vec<&str> = deduped.iter().map(|m| m.candidate_plan.id.as_str()).collect();

        assert_eq!(ids, vec!["c1", "c3"]);
        assert_eq!(deduped[0].reference_plan_id, "r1");
    }

    #[test]
    fn test_dedupe_truncates() {
        let mut grouped = MatchesByPlan::new();
        let matches = (0..5)
            .map(|i| MatchResult {
                reference_plan_id: "r1".to_string(),
                candidate_plan: create_plan(&format!("c{}", i), &format!("u{}", i), "Sajek", 1, 2),
            })
            .collect();
        grouped.insert("r1".to_string(), matches);

        assert_eq!(dedupe_by_counterpart(&grouped, 3).len(), 3);
        assert!(dedupe_by_counterpart(&grouped, 0).is_empty());
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let mut grouped: MatchesByPlan<u8> = MatchesByPlan::new();
        grouped.insert("zeta".to_string(), vec![1]);
        grouped.insert("alpha".to_string(), vec![]);
        grouped.insert("zeta".to_string(), vec![2, 3]);

        let json = serde_json::to_string(&grouped).unwrap();

        assert_eq!(json, r#"{"zeta":[2,3],"alpha":[]}"#);
    }

    #[test]
    fn test_upcoming_plans_filters_expired() {
        let plans = vec![
            create_plan("past", "me", "Sajek", 1, 5),
            create_plan("current", "me", "Sajek", 8, 12),
        ];

        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let upcoming = upcoming_plans(&plans, today);

        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, "current");
    }
}
