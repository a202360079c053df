// Unit tests for TripMate Match

use chrono::NaiveDate;
use tripmate_match::core::{
    dates::{effective_end, is_upcoming, plan_window, DateWindow},
    filters::{
        destination_contains, destination_equals, is_foreign_owner, is_matchable, is_visible_to,
        normalize_destination, overlaps_window, travel_type_matches,
    },
};
use tripmate_match::models::{TravelPlan, TravelType, TravelTypeFilter, Visibility};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn create_test_plan() -> TravelPlan {
    TravelPlan {
        id: "p1".to_string(),
        owner_id: "u2".to_string(),
        title: Some("Hill tracts".to_string()),
        destination: "Bandarban".to_string(),
        description: None,
        start_date: Some(d(2025, 6, 3)),
        end_date: Some(d(2025, 6, 7)),
        travel_type: TravelType::Group,
        visibility: Visibility::Public,
        budget_min: Some(5000.0),
        budget_max: Some(12000.0),
        host: None,
        created_at: None,
    }
}

#[test]
fn test_window_overlap_is_symmetric() {
    let a = DateWindow::new(d(2025, 6, 1), d(2025, 6, 5)).unwrap();
    let b = DateWindow::new(d(2025, 6, 3), d(2025, 6, 7)).unwrap();

    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn test_window_containment_overlaps() {
    let outer = DateWindow::new(d(2025, 6, 1), d(2025, 6, 30)).unwrap();
    let inner = DateWindow::point(d(2025, 6, 15));

    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
}

#[test]
fn test_plan_window_inverted_dates() {
    let mut plan = create_test_plan();
    plan.start_date = Some(d(2025, 6, 9));

    assert!(plan_window(&plan).is_none());
    assert!(!overlaps_window(&plan, &DateWindow::point(d(2025, 6, 8))));
}

#[test]
fn test_plan_window_point_in_time() {
    let mut plan = create_test_plan();
    plan.end_date = None;

    assert_eq!(plan_window(&plan), Some(DateWindow::point(d(2025, 6, 3))));
    assert_eq!(effective_end(d(2025, 6, 3), plan.end_date), d(2025, 6, 3));
}

#[test]
fn test_is_upcoming_boundaries() {
    let plan = create_test_plan();

    assert!(is_upcoming(&plan, d(2025, 6, 7)));
    assert!(!is_upcoming(&plan, d(2025, 6, 8)));

    let mut undated = create_test_plan();
    undated.start_date = None;
    undated.end_date = None;
    assert!(!is_upcoming(&undated, d(2000, 1, 1)));
}

#[test]
fn test_owner_and_visibility_filters() {
    let mut plan = create_test_plan();

    assert!(is_foreign_owner(&plan, "u1"));
    assert!(!is_foreign_owner(&plan, "u2"));
    assert!(is_matchable(&plan));

    plan.visibility = Visibility::Private;
    assert!(!is_matchable(&plan));
    assert!(is_visible_to(&plan, Some("u2")));
    assert!(!is_visible_to(&plan, Some("u1")));
}

#[test]
fn test_destination_rules() {
    let plan = create_test_plan();

    assert_eq!(normalize_destination("  BandarBAN "), "bandarban");
    assert!(destination_equals(&plan, &normalize_destination(" bandarban")));
    assert!(!destination_equals(&plan, "bandar"));
    assert!(destination_contains(&plan, "bandar"));
}

#[test]
fn test_travel_type_filter() {
    let plan = create_test_plan();

    assert!(travel_type_matches(&plan, &TravelTypeFilter::Any));
    assert!(travel_type_matches(&plan, &TravelTypeFilter::Only(TravelType::Group)));
    assert!(!travel_type_matches(&plan, &TravelTypeFilter::Only(TravelType::Solo)));
}

#[test]
fn test_budget_is_not_a_match_criterion() {
    use tripmate_match::core::Matcher;

    let reference = TravelPlan {
        id: "ref".to_string(),
        owner_id: "u1".to_string(),
        budget_min: Some(100.0),
        budget_max: Some(200.0),
        ..create_test_plan()
    };

    let matcher = Matcher::new();
    let result = matcher.find_matches(&reference, &[create_test_plan()]).unwrap();

    assert_eq!(result.len(), 1);
}
