use chrono::NaiveDate;
use cpi_chart::core::primitives::date_to_unix_seconds;
use cpi_chart::core::{ContinuousScale, IndexScale, LinearScale, TimeScale};

fn date(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid date")
}

#[test]
fn linear_scale_round_trip_within_tolerance() {
    let scale = LinearScale::new((10.0, 110.0), (0.0, 1000.0)).expect("valid scale");

    let original = 42.5;
    let px = scale.map(original);
    let recovered = scale.invert(px);

    assert!((px - 325.0).abs() <= 1e-9);
    assert!((recovered - original).abs() <= 1e-9);
}

#[test]
fn linear_scale_extrapolates_unless_clamped() {
    let scale = LinearScale::new((0.0, 100.0), (0.0, 500.0)).expect("valid scale");
    assert!((scale.map(150.0) - 750.0).abs() <= 1e-9);
    assert!((scale.map(-20.0) + 100.0).abs() <= 1e-9);

    let clamped = scale.with_clamp(true);
    assert!(clamped.is_clamped());
    assert_eq!(clamped.map(150.0), 500.0);
    assert_eq!(clamped.invert(-50.0), 0.0);
}

#[test]
fn reversed_range_maps_upward_axis() {
    let scale = LinearScale::new((0.0, 100.0), (400.0, 0.0)).expect("valid scale");
    assert!((scale.map(25.0) - 300.0).abs() <= 1e-9);
    assert!((scale.invert(100.0) - 75.0).abs() <= 1e-9);
    assert!((scale.range_extent() - 400.0).abs() <= 1e-9);
}

#[test]
fn degenerate_domain_maps_to_range_midpoint() {
    let scale = LinearScale::new((5.0, 5.0), (0.0, 500.0)).expect("degenerate domain is allowed");
    assert_eq!(scale.map(5.0), 250.0);
    assert_eq!(scale.map(-1_000.0), 250.0);
}

#[test]
fn invalid_linear_scale_inputs_are_rejected() {
    assert!(LinearScale::new((10.0, 0.0), (0.0, 100.0)).is_err());
    assert!(LinearScale::new((0.0, 1.0), (50.0, 50.0)).is_err());
    assert!(LinearScale::new((f64::NAN, 1.0), (0.0, 100.0)).is_err());
    assert!(LinearScale::new((0.0, f64::INFINITY), (0.0, 100.0)).is_err());
}

#[test]
fn zero_based_scale_spans_zero_to_max() {
    let scale = LinearScale::zero_based([3.0, 7.0, f64::NAN, 12.0], (300.0, 0.0))
        .expect("valid scale");
    assert_eq!(scale.domain(), (0.0, 12.0));

    let empty = LinearScale::zero_based(std::iter::empty(), (300.0, 0.0)).expect("fallback");
    assert_eq!(empty.domain(), (0.0, 1.0));
}

#[test]
fn from_extent_pads_single_value_and_falls_back_when_empty() {
    let single = LinearScale::from_extent([5.0, 5.0], (0.0, 100.0)).expect("valid scale");
    assert_eq!(single.domain(), (4.5, 5.5));

    let empty = LinearScale::from_extent(std::iter::empty(), (0.0, 100.0)).expect("fallback");
    assert_eq!(empty.domain(), (0.0, 1.0));
}

#[test]
fn nice_rounds_domain_to_tick_boundaries() {
    let scale = LinearScale::zero_based([97.3, 12.0], (300.0, 0.0))
        .expect("valid scale")
        .nice(10);
    assert_eq!(scale.domain(), (0.0, 100.0));

    let ticks = scale.ticks(10);
    assert_eq!(ticks.len(), 11);
    assert_eq!(ticks.first().copied(), Some(0.0));
    assert_eq!(ticks.last().copied(), Some(100.0));
}

#[test]
fn ticks_are_exact_for_fractional_steps() {
    let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0)).expect("valid scale");
    let ticks = scale.ticks(10);
    assert_eq!(ticks.len(), 11);
    assert_eq!(ticks[3], 0.3);
}

#[test]
fn index_scale_slots_respect_padding() {
    let scale = IndexScale::new(4, (0.0, 400.0), 0.2).expect("valid index scale");

    assert!((scale.bandwidth() - 60.0).abs() <= 1e-9);
    let (start, end) = scale.slot_extent(1).expect("slot exists");
    assert!((start - 120.0).abs() <= 1e-9);
    assert!((end - 180.0).abs() <= 1e-9);
    assert_eq!(scale.slot_center(1), Some(150.0));
    assert_eq!(scale.slot_extent(4), None);

    assert_eq!(scale.slot_at(150.0), Some(1));
    assert_eq!(scale.slot_at(370.0), Some(3));
    assert_eq!(scale.slot_at(105.0), None);
    assert_eq!(scale.slot_at(-1.0), None);
    assert_eq!(scale.slot_at(450.0), None);
}

#[test]
fn index_scale_rejects_padding_outside_half_open_unit_half() {
    assert!(IndexScale::new(3, (0.0, 100.0), 0.5).is_err());
    assert!(IndexScale::new(3, (0.0, 100.0), -0.1).is_err());
    assert!(IndexScale::new(3, (0.0, 100.0), 0.0).is_ok());
}

#[test]
fn empty_index_scale_has_no_slots() {
    let scale = IndexScale::new(0, (0.0, 100.0), 0.2).expect("empty index scale");
    assert_eq!(scale.count(), 0);
    assert_eq!(scale.slot_at(50.0), None);
    assert_eq!(scale.slot_center(0), None);
}

#[test]
fn time_scale_maps_elapsed_time_linearly() {
    let scale = TimeScale::from_dates([date(2024, 1), date(2020, 1)], (0.0, 800.0))
        .expect("valid time scale");

    assert_eq!(scale.map_date(date(2020, 1)), 0.0);
    assert!((scale.map_date(date(2024, 1)) - 800.0).abs() <= 1e-9);

    // 2020 is a leap year: 731 of 1461 days have elapsed by 2022-01-01.
    let expected = 731.0 / 1461.0 * 800.0;
    let px = scale.map_date(date(2022, 1));
    assert!((px - expected).abs() <= 1e-9);

    let recovered = scale.invert(px);
    assert!((recovered - date_to_unix_seconds(date(2022, 1))).abs() <= 1e-3);
}

#[test]
fn time_scale_widens_a_single_month() {
    let scale = TimeScale::from_dates([date(2024, 5)], (0.0, 100.0)).expect("valid time scale");
    let (start, end) = scale.domain();
    let center = date_to_unix_seconds(date(2024, 5));

    assert!((end - start - 30.0 * 86_400.0).abs() <= 1e-6);
    assert!(((start + end) / 2.0 - center).abs() <= 1e-6);
    assert!((scale.map_date(date(2024, 5)) - 50.0).abs() <= 1e-9);
}

#[test]
fn time_scale_ticks_pick_round_year_steps() {
    let scale = TimeScale::new(date(1970, 1), date(2024, 1), (0.0, 1000.0)).expect("valid scale");
    let ticks = scale.ticks(10);

    let years: Vec<i32> = ticks.iter().map(chrono::Datelike::year).collect();
    assert_eq!(years, vec![1970, 1980, 1990, 2000, 2010, 2020]);
}

#[test]
fn time_scale_ticks_use_months_on_short_spans() {
    let scale = TimeScale::new(date(2024, 1), date(2024, 7), (0.0, 600.0)).expect("valid scale");
    let ticks = scale.ticks(12);

    assert_eq!(ticks.len(), 7);
    assert_eq!(ticks.first().copied(), Some(date(2024, 1)));
    assert_eq!(ticks.last().copied(), Some(date(2024, 7)));
}
