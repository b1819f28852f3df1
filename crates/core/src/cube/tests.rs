use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use timebill_shared::AppError;
use timebill_shared::config::CubeConfig;

use super::*;

#[derive(Debug, Clone)]
struct Row {
    contractor: &'static str,
    project: &'static str,
    day: u32,
    hours: Decimal,
}

fn row(contractor: &'static str, project: &'static str, day: u32, hours: Decimal) -> Row {
    Row {
        contractor,
        project,
        day,
        hours,
    }
}

fn rows() -> Vec<Row> {
    vec![
        row("Bo", "Apollo", 2, dec!(3)),
        row("Ann", "Apollo", 2, dec!(4)),
        row("Ann", "Gemini", 3, dec!(1.5)),
        row("Bo", "Gemini", 3, dec!(2)),
        row("Ann", "Apollo", 4, dec!(2.5)),
    ]
}

fn definition(items: Vec<Row>) -> CubeDefinition<Row> {
    CubeDefinition {
        items,
        dimensions: vec![
            DimensionDescriptor::new("contractor", "Contractor", |r: &Row| r.contractor.into()),
            DimensionDescriptor::new("project", "Project", |r: &Row| r.project.into()),
            DimensionDescriptor::new("day", "Day", |r: &Row| {
                NaiveDate::from_ymd_opt(2024, 5, r.day).into()
            }),
        ],
        measures: vec![
            MeasureDescriptor::aggregated("hours", "Hours", Aggregation::Sum, |r: &Row| {
                r.hours.into()
            }),
            MeasureDescriptor::aggregated("entries", "Entries", Aggregation::Count, |_: &Row| {
                CubeValue::Null
            }),
        ],
    }
}

fn options(rules: &[(&str, Option<&str>)]) -> CubeOptions {
    CubeOptions {
        filters: Vec::new(),
        breakdown_map: rules
            .iter()
            .map(|(path, dim)| ((*path).to_string(), dim.map(str::to_string)))
            .collect(),
        max_depth: 10,
        measures: Vec::new(),
        include_items: false,
    }
}

fn hours(group: &CubeGroup) -> CubeValue {
    group.measures["hours"].clone()
}

fn keys(groups: &[CubeGroup]) -> Vec<String> {
    groups.iter().map(|g| g.value.to_string()).collect()
}

#[test]
fn test_groups_in_first_appearance_order() {
    let result = calculate_cube(&definition(rows()), &options(&[("", Some("contractor"))])).unwrap();

    assert_eq!(keys(&result.groups), vec!["Bo", "Ann"]);
    assert_eq!(hours(&result.groups[0]), CubeValue::from(dec!(5)));
    assert_eq!(hours(&result.groups[1]), CubeValue::from(dec!(8)));
    assert_eq!(result.groups[1].item_count, 3);
    assert_eq!(result.groups[1].path, "contractor:Ann");
    assert!(result.groups[1].children.is_empty());
    assert_eq!(result.grand_totals["hours"], CubeValue::from(dec!(13)));
    assert_eq!(result.grand_totals["entries"], CubeValue::from(dec!(5)));
}

#[test]
fn test_wildcard_rule_applies_below_every_node() {
    let result = calculate_cube(
        &definition(rows()),
        &options(&[("", Some("contractor")), ("contractor:*", Some("project"))]),
    )
    .unwrap();

    let ann = &result.groups[1];
    assert_eq!(ann.child_dimension.as_deref(), Some("project"));
    assert_eq!(keys(&ann.children), vec!["Apollo", "Gemini"]);
    assert_eq!(ann.children[0].path, "contractor:Ann|project:Apollo");
    assert_eq!(hours(&ann.children[0]), CubeValue::from(dec!(6.5)));
    assert_eq!(keys(&result.groups[0].children), vec!["Apollo", "Gemini"]);
}

#[test]
fn test_wildcard_rule_applies_to_keys_containing_separator() {
    let items = vec![
        row("Ann|Lee", "Apollo", 2, dec!(1)),
        row("Ann|Lee", "Gemini", 3, dec!(2)),
    ];
    let result = calculate_cube(
        &definition(items),
        &options(&[("", Some("contractor")), ("contractor:*", Some("project"))]),
    )
    .unwrap();

    let pair = &result.groups[0];
    assert_eq!(pair.path, "contractor:Ann|Lee");
    assert_eq!(pair.child_dimension.as_deref(), Some("project"));
    assert_eq!(keys(&pair.children), vec!["Apollo", "Gemini"]);
    assert_eq!(pair.children[1].path, "contractor:Ann|Lee|project:Gemini");
}

#[test]
fn test_exact_rule_overrides_wildcard() {
    let result = calculate_cube(
        &definition(rows()),
        &options(&[
            ("", Some("contractor")),
            ("contractor:*", Some("project")),
            ("contractor:Bo", None),
            ("contractor:Ann|project:Apollo", Some("day")),
        ]),
    )
    .unwrap();

    let bo = &result.groups[0];
    assert!(bo.children.is_empty());
    assert_eq!(bo.child_dimension, None);

    let apollo = &result.groups[1].children[0];
    assert_eq!(keys(&apollo.children), vec!["2024-05-02", "2024-05-04"]);
    assert!(result.groups[1].children[1].children.is_empty());
}

#[test]
fn test_dimension_used_above_is_leaf() {
    let result = calculate_cube(
        &definition(rows()),
        &options(&[("", Some("contractor")), ("contractor:*", Some("contractor"))]),
    )
    .unwrap();

    assert!(result.groups.iter().all(|g| g.children.is_empty()));
    assert!(result.groups.iter().all(|g| g.child_dimension.is_none()));
}

#[test]
fn test_max_depth_stops_breakdown() {
    let mut opts = options(&[
        ("", Some("contractor")),
        ("contractor:*", Some("project")),
        ("contractor:*|project:*", Some("day")),
    ]);
    opts.max_depth = 2;

    let result = calculate_cube(&definition(rows()), &opts).unwrap();

    let apollo = &result.groups[1].children[0];
    assert!(apollo.children.is_empty());
    assert_eq!(apollo.child_dimension, None);
}

#[test]
fn test_zero_max_depth_is_rejected() {
    let mut opts = options(&[]);
    opts.max_depth = 0;
    assert_eq!(
        calculate_cube(&definition(rows()), &opts),
        Err(CubeError::InvalidMaxDepth(0))
    );
}

#[test]
fn test_without_root_rule_only_totals() {
    let result = calculate_cube(&definition(rows()), &options(&[])).unwrap();
    assert!(result.groups.is_empty());
    assert_eq!(result.grand_totals["hours"], CubeValue::from(dec!(13)));
}

#[test]
fn test_filters_narrow_groups_and_totals() {
    let mut opts = options(&[("", Some("project"))]);
    opts.filters = vec![
        DimensionFilter::new("contractor", FilterCondition::Equals("Ann".into())),
        DimensionFilter::new(
            "day",
            FilterCondition::LessThan(NaiveDate::from_ymd_opt(2024, 5, 4).into()),
        ),
    ];

    let result = calculate_cube(&definition(rows()), &opts).unwrap();

    assert_eq!(result.total_items, 5);
    assert_eq!(result.filtered_items, 2);
    assert_eq!(keys(&result.groups), vec!["Apollo", "Gemini"]);
    assert_eq!(result.grand_totals["hours"], CubeValue::from(dec!(5.5)));
}

#[test]
fn test_include_items_lists_positions() {
    let mut opts = options(&[("", Some("contractor"))]);
    opts.include_items = true;

    let result = calculate_cube(&definition(rows()), &opts).unwrap();

    assert_eq!(result.groups[0].items, Some(vec![0, 3]));
    assert_eq!(result.groups[1].items, Some(vec![1, 2, 4]));
}

#[test]
fn test_selected_measures_only() {
    let mut opts = options(&[("", Some("contractor"))]);
    opts.measures = vec!["entries".to_string()];

    let result = calculate_cube(&definition(rows()), &opts).unwrap();

    assert_eq!(result.grand_totals.len(), 1);
    assert!(result.groups[0].measures.contains_key("entries"));
}

#[test]
fn test_unknown_references_are_rejected() {
    let def = definition(rows());

    let mut opts = options(&[]);
    opts.filters = vec![DimensionFilter::new("client", FilterCondition::Equals(CubeValue::Null))];
    assert_eq!(
        calculate_cube(&def, &opts),
        Err(CubeError::UnknownDimension("client".to_string()))
    );

    assert_eq!(
        calculate_cube(&def, &options(&[("", Some("client"))])),
        Err(CubeError::UnknownDimension("client".to_string()))
    );

    let mut opts = options(&[]);
    opts.measures = vec!["revenue".to_string()];
    assert_eq!(
        calculate_cube(&def, &opts),
        Err(CubeError::UnknownMeasure("revenue".to_string()))
    );
}

#[test]
fn test_cube_error_is_validation() {
    let error: AppError = CubeError::InvalidMaxDepth(0).into();
    assert_eq!(error.error_code(), "VALIDATION_ERROR");
}

#[test]
fn test_custom_aggregate_closure() {
    let mut def = definition(rows());
    def.measures.push(MeasureDescriptor::new("longest", "Longest entry", |items: &[&Row]| {
        items
            .iter()
            .map(|r| r.hours)
            .max()
            .map_or(CubeValue::Null, CubeValue::Number)
    }));

    let result = calculate_cube(&def, &options(&[("", Some("contractor"))])).unwrap();

    assert_eq!(result.groups[1].measures["longest"], CubeValue::from(dec!(4)));
}

fn counting_state(calls: &Arc<AtomicUsize>) -> CubeState<Row> {
    let mut def = definition(rows());
    let counter = Arc::clone(calls);
    def.measures.push(MeasureDescriptor::new("calls", "Calls", move |_: &[&Row]| {
        counter.fetch_add(1, Ordering::SeqCst);
        CubeValue::Null
    }));
    CubeState::from_config(def, "contractor", &CubeConfig::default())
}

#[test]
fn test_state_caches_until_mutated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut state = counting_state(&calls);

    state.calculate().unwrap();
    let after_first = calls.load(Ordering::SeqCst);
    state.calculate().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), after_first);

    state.add_filter(DimensionFilter::new("project", FilterCondition::Equals("Apollo".into())));
    let result = state.calculate().unwrap();
    assert_eq!(result.filtered_items, 3);
    assert!(calls.load(Ordering::SeqCst) > after_first);
}

#[test]
fn test_state_filter_editing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut state = counting_state(&calls);
    state.add_filter(DimensionFilter::new("project", FilterCondition::Equals("Apollo".into())));
    state.add_filter(DimensionFilter::new("project", FilterCondition::NotEquals("Gemini".into())));
    state.add_filter(DimensionFilter::new("contractor", FilterCondition::Equals("Ann".into())));

    state.remove_filters("project");
    assert_eq!(state.options().filters.len(), 1);
    assert_eq!(state.calculate().unwrap().filtered_items, 3);

    state.clear_filters();
    assert_eq!(state.calculate().unwrap().filtered_items, 5);
}

#[test]
fn test_state_breakdown_editing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut state = counting_state(&calls);

    state.set_node_child_dimension("contractor:*", "project");
    state.set_node_leaf("contractor:Bo");
    let result = state.calculate().unwrap();
    assert!(result.groups[0].children.is_empty());
    assert_eq!(result.groups[1].children.len(), 2);

    state.set_max_depth(1);
    assert!(state.calculate().unwrap().groups[1].children.is_empty());

    state.set_max_depth(10);
    state.reset_breakdown();
    assert_eq!(
        state.options().breakdown_map,
        BTreeMap::from([(String::new(), Some("contractor".to_string()))])
    );
    assert!(state.calculate().unwrap().groups[1].children.is_empty());
}

#[test]
fn test_state_errors_are_not_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut state = counting_state(&calls);

    state.set_max_depth(0);
    assert_eq!(state.calculate().err(), Some(CubeError::InvalidMaxDepth(0)));

    state.set_max_depth(3);
    assert!(state.calculate().is_ok());
}

#[test]
fn test_state_set_items() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut state = counting_state(&calls);
    assert_eq!(state.calculate().unwrap().total_items, 5);

    state.set_items(vec![row("Cy", "Apollo", 5, dec!(1))]);
    let result = state.calculate().unwrap();
    assert_eq!(keys(&result.groups), vec!["Cy"]);
    assert_eq!(state.definition().items.len(), 1);
}
