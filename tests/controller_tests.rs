use chrono::NaiveDate;
use cpi_chart::api::{
    ChartConfig, ChartController, ChartEvent, ChartKind, FilterSelection, SceneData, SceneScales,
    StateChange, ViewMode,
};
use cpi_chart::core::{
    ContinuousScale, DomainKind, LinearScale, Record, RecordFilter, TimeScale, Viewport,
    WheelDeltaMode, ZoomTransform,
};
use cpi_chart::interaction::{InteractionMode, TooltipMode};
use cpi_chart::render::NullRenderer;

fn date(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid date")
}

fn records() -> Vec<Record> {
    let mut records = Vec::new();
    for (month, eggs, meat) in [
        (1, Some(100.0), Some(50.0)),
        (2, Some(110.0), Some(55.0)),
        (3, Some(120.0), None),
        (4, Some(130.0), Some(60.0)),
    ] {
        records.push(Record::new("Canada", "Eggs", date(2024, month), eggs));
        records.push(Record::new("Canada", "Meat", date(2024, month), meat));
        records.push(Record::new("Ontario", "Eggs", date(2024, month), Some(999.0)));
    }
    records
}

fn canada() -> FilterSelection {
    FilterSelection::new(RecordFilter::new().with_geography("Canada"))
}

fn controller(kind: ChartKind) -> ChartController<NullRenderer> {
    let config = ChartConfig::new(Viewport::new(800, 400), kind);
    ChartController::new(NullRenderer::default(), config, records(), canada())
        .expect("controller init")
}

fn line_scales(controller: &ChartController<NullRenderer>) -> (TimeScale, LinearScale) {
    match controller.effective_scales().expect("scales") {
        SceneScales::Line { x, y } => (x, y),
        other => panic!("expected line scales, got {other:?}"),
    }
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let config = ChartConfig::new(Viewport::new(0, 400), ChartKind::Line);
    assert!(ChartController::new(NullRenderer::default(), config, records(), canada()).is_err());

    let config = ChartConfig::new(Viewport::new(800, 400), ChartKind::Bar).with_band_padding(0.6);
    assert!(ChartController::new(NullRenderer::default(), config, records(), canada()).is_err());
}

#[test]
fn line_scene_fits_selected_records() {
    let controller = controller(ChartKind::Line);
    let (x, y) = line_scales(&controller);

    assert_eq!(x.map_date(date(2024, 1)), 0.0);
    assert!((x.map_date(date(2024, 4)) - 800.0).abs() <= 1e-9);
    assert_eq!(y.domain(), (0.0, 130.0));
    assert_eq!(controller.scene().palette.len(), 2);

    match &controller.scene().data {
        SceneData::Line { series, indexes } => {
            assert_eq!(series.len(), 2);
            assert_eq!(indexes[0].len(), 4);
            assert_eq!(indexes[1].len(), 3);
        }
        other => panic!("expected line data, got {other:?}"),
    }
}

#[test]
fn pointer_move_snaps_tooltip_to_nearest_sample() {
    let mut controller = controller(ChartKind::Line);
    let (x, y) = line_scales(&controller);
    let feb_x = x.map_date(date(2024, 2));
    let eggs_y = y.map(110.0);

    let change = controller
        .dispatch(ChartEvent::PointerMove {
            x: feb_x + 3.0,
            y: eggs_y + 2.0,
        })
        .expect("pointer move");
    assert_eq!(change, StateChange::Pointer);

    let tooltip = controller.tooltip();
    assert!(tooltip.visible);
    let target = tooltip.target.as_ref().expect("snapped target");
    assert_eq!(target.category, "Eggs");
    assert_eq!(target.date, Some(date(2024, 2)));
    assert_eq!(target.value, 110.0);
    assert!((target.x - feb_x).abs() <= 1e-9);

    controller
        .dispatch(ChartEvent::PointerMove {
            x: feb_x,
            y: y.map(56.0),
        })
        .expect("pointer move");
    let target = controller.tooltip().target.as_ref().expect("snapped target");
    assert_eq!(target.category, "Meat");
    assert_eq!(target.value, 55.0);

    controller
        .dispatch(ChartEvent::PointerLeave)
        .expect("pointer leave");
    assert!(!controller.tooltip().visible);
    assert!(controller.tooltip().target.is_none());
}

#[test]
fn hidden_and_follow_modes_do_not_snap() {
    let mut controller = controller(ChartKind::Line);

    controller
        .dispatch(ChartEvent::SetTooltipMode(TooltipMode::Follow))
        .expect("set mode");
    controller
        .dispatch(ChartEvent::PointerMove { x: 10.0, y: 10.0 })
        .expect("pointer move");
    assert!(controller.tooltip().visible);
    assert!(controller.tooltip().target.is_none());

    controller
        .dispatch(ChartEvent::SetTooltipMode(TooltipMode::Hidden))
        .expect("set mode");
    controller
        .dispatch(ChartEvent::PointerMove { x: 20.0, y: 20.0 })
        .expect("pointer move");
    assert!(!controller.tooltip().visible);
}

#[test]
fn zoom_by_rescales_x_axis_about_anchor() {
    let mut controller = controller(ChartKind::Line);
    let (base_x, base_y) = line_scales(&controller);

    let change = controller
        .dispatch(ChartEvent::ZoomBy {
            factor: 2.0,
            x: 400.0,
            y: 200.0,
        })
        .expect("zoom");
    assert_eq!(change, StateChange::Zoom);
    assert_eq!(controller.zoom().k(), 2.0);

    let (x, y) = line_scales(&controller);
    assert!((x.domain().0 - base_x.invert(200.0)).abs() <= 1e-3);
    assert!((x.domain().1 - base_x.invert(600.0)).abs() <= 1e-3);
    // Only the x axis follows the zoom by default.
    assert_eq!(y, base_y);

    // The anchor column keeps showing the same instant.
    assert!((x.invert(400.0) - base_x.invert(400.0)).abs() <= 1e-3);
}

#[test]
fn wheel_zoom_is_clamped_and_reset_restores_identity() {
    let mut controller = controller(ChartKind::Line);
    for _ in 0..10 {
        controller
            .dispatch(ChartEvent::Wheel {
                delta_y: -500.0,
                delta_mode: WheelDeltaMode::Pixel,
                x: 123.0,
                y: 45.0,
            })
            .expect("wheel");
    }
    assert_eq!(controller.zoom().k(), 8.0);

    controller.dispatch(ChartEvent::ResetZoom).expect("reset");
    assert!(controller.zoom().is_identity());
    assert_eq!(
        controller.effective_scales().expect("scales"),
        controller.scene().base
    );
}

#[test]
fn huge_wheel_deltas_clamp_to_the_scale_extent() {
    let mut controller = controller(ChartKind::Line);
    let wheel = |delta_y: f64| ChartEvent::Wheel {
        delta_y,
        delta_mode: WheelDeltaMode::Pixel,
        x: 400.0,
        y: 200.0,
    };

    controller.dispatch(wheel(-1e6)).expect("huge zoom in");
    assert_eq!(controller.zoom().k(), 8.0);

    controller.dispatch(wheel(1e6)).expect("huge zoom out");
    assert_eq!(controller.zoom().k(), 1.0);
    assert!(controller.zoom().x().abs() <= 1e-9);
    assert!(controller.zoom().y().abs() <= 1e-9);
}

#[test]
fn drag_pans_only_between_start_and_end() {
    let mut controller = controller(ChartKind::Line);
    controller
        .dispatch(ChartEvent::ZoomBy {
            factor: 2.0,
            x: 400.0,
            y: 200.0,
        })
        .expect("zoom");
    let zoomed = controller.zoom();

    let change = controller
        .dispatch(ChartEvent::Drag { dx: 50.0, dy: 0.0 })
        .expect("stray drag");
    assert_eq!(change, StateChange::None);
    assert_eq!(controller.zoom(), zoomed);

    controller.dispatch(ChartEvent::DragStart).expect("drag start");
    assert_eq!(
        controller.state().interaction.mode(),
        InteractionMode::Panning
    );
    controller
        .dispatch(ChartEvent::Drag { dx: 50.0, dy: 0.0 })
        .expect("drag");
    assert_eq!(controller.zoom().x(), zoomed.x() + 50.0);

    // Dragging far right stops at the left content edge.
    controller
        .dispatch(ChartEvent::Drag {
            dx: 5_000.0,
            dy: 0.0,
        })
        .expect("drag");
    assert_eq!(controller.zoom().x(), 0.0);

    controller.dispatch(ChartEvent::DragEnd).expect("drag end");
    assert_eq!(controller.state().interaction.mode(), InteractionMode::Idle);
}

#[test]
fn selection_change_rebuilds_scene_and_keeps_zoom() {
    let mut controller = controller(ChartKind::Line);
    controller
        .dispatch(ChartEvent::ZoomBy {
            factor: 3.0,
            x: 100.0,
            y: 100.0,
        })
        .expect("zoom");
    let zoom = controller.zoom();

    let selection = FilterSelection::new(
        RecordFilter::new()
            .with_geography("Canada")
            .with_categories(["Eggs"]),
    );
    let change = controller
        .dispatch(ChartEvent::SetSelection(selection.clone()))
        .expect("set selection");

    assert_eq!(change, StateChange::Selection);
    assert_eq!(controller.selection(), &selection);
    assert_eq!(controller.scene().palette.len(), 1);
    assert_eq!(controller.zoom(), zoom);
}

#[test]
fn failed_events_leave_state_untouched() {
    let mut controller = controller(ChartKind::Line);
    let before = controller.state().clone();

    assert!(
        controller
            .dispatch(ChartEvent::ZoomBy {
                factor: -1.0,
                x: 0.0,
                y: 0.0,
            })
            .is_err()
    );
    let inverted = FilterSelection::new(
        RecordFilter::new().with_date_range(date(2024, 4), date(2024, 1)),
    );
    assert!(controller.dispatch(ChartEvent::SetSelection(inverted)).is_err());

    assert_eq!(controller.state(), &before);
}

#[test]
fn non_finite_pointer_is_rejected_and_render_still_works() {
    let mut controller = controller(ChartKind::Line);
    controller
        .dispatch(ChartEvent::PointerMove { x: 200.0, y: 100.0 })
        .expect("pointer move");
    let before = controller.state().clone();

    assert!(
        controller
            .dispatch(ChartEvent::PointerMove {
                x: f64::NAN,
                y: 10.0,
            })
            .is_err()
    );
    assert!(
        controller
            .dispatch(ChartEvent::PointerMove {
                x: 10.0,
                y: f64::INFINITY,
            })
            .is_err()
    );

    assert_eq!(controller.state(), &before);
    controller.render().expect("render after rejected pointer");
}

#[test]
fn changes_view_uses_diverging_color_domain() {
    let mut controller = controller(ChartKind::Line);
    controller
        .dispatch(ChartEvent::SetSelection(
            canada().with_view_mode(ViewMode::Changes),
        ))
        .expect("set selection");

    let color = controller.scene().color;
    assert_eq!(color.domain.kind, DomainKind::Diverging);
    assert_eq!(color.domain.bounds.0, -color.domain.bounds.1);
    assert!(color.domain.bounds.0 >= 11.0);

    let (_, y) = line_scales(&controller);
    assert!(y.domain().0 <= 0.0);
}

#[test]
fn line_render_splits_paths_on_missing_values() {
    let mut controller = controller(ChartKind::Line);
    controller.render().expect("render");

    let renderer = controller.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    // Eggs is one run; Meat breaks at its missing March value.
    assert_eq!(renderer.last_polyline_count(), 3);
    let frame = renderer.last_frame.as_ref().expect("frame rendered");
    assert!(!frame.is_empty());
    assert!(frame.validate().is_ok());
}

#[test]
fn bar_chart_resolves_tooltip_by_slot() {
    let mut controller = controller(ChartKind::Bar);
    let x = match controller.effective_scales().expect("scales") {
        SceneScales::Bar { x, .. } => x,
        other => panic!("expected bar scales, got {other:?}"),
    };

    let center = x.slot_center(0).expect("first slot");
    controller
        .dispatch(ChartEvent::PointerMove { x: center, y: 10.0 })
        .expect("pointer move");
    let target = controller.tooltip().target.as_ref().expect("bar target");
    assert_eq!(target.category, "Eggs");
    assert_eq!(target.date, None);
    assert_eq!(target.value, 115.0);

    // Padding between bars resolves to nothing.
    let (_, end) = x.slot_extent(0).expect("first slot");
    controller
        .dispatch(ChartEvent::PointerMove { x: end + 1.0, y: 10.0 })
        .expect("pointer move");
    assert!(controller.tooltip().target.is_none());
}

#[test]
fn bar_without_data_gets_a_marker() {
    let mut records = records();
    records.push(Record::new("Canada", "Bread", date(2024, 1), None));
    let config = ChartConfig::new(Viewport::new(800, 400), ChartKind::Bar);
    let mut controller = ChartController::new(NullRenderer::default(), config, records, canada())
        .expect("controller init");

    controller.render().expect("render");
    let frame = controller
        .renderer()
        .last_frame
        .as_ref()
        .expect("rendered frame");
    assert!(frame.texts.iter().any(|text| text.text == "no data"));
    // Two bars plus one legend swatch per category.
    assert_eq!(frame.rects.len(), 2 + 3);
    assert_eq!(controller.renderer().last_rect_count(), 5);
    assert_eq!(controller.renderer().last_text_count(), frame.texts.len());
}

#[test]
fn heatmap_cells_hold_monthly_means() {
    let mut controller = controller(ChartKind::Heatmap);
    let (x, y) = match controller.effective_scales().expect("scales") {
        SceneScales::Heatmap { x, y } => (x, y),
        other => panic!("expected heatmap scales, got {other:?}"),
    };
    match &controller.scene().data {
        SceneData::Heatmap { years, cells } => {
            assert_eq!(years, &vec![2024]);
            assert_eq!(cells.len(), 12);
            assert_eq!(cells[0].value, Some(75.0));
            assert_eq!(cells[2].value, Some(120.0));
            assert_eq!(cells[11].value, None);
        }
        other => panic!("expected heatmap data, got {other:?}"),
    }

    controller
        .dispatch(ChartEvent::PointerMove {
            x: x.slot_center(1).expect("february column"),
            y: y.slot_center(0).expect("2024 row"),
        })
        .expect("pointer move");
    let target = controller.tooltip().target.as_ref().expect("cell target");
    assert_eq!(target.date, Some(date(2024, 2)));
    assert_eq!(target.value, 82.5);

    controller.render().expect("render");
    // Twelve cells plus the default nine legend stops.
    assert_eq!(controller.renderer().last_rect_count(), 12 + 9);
}

#[test]
fn zoom_survives_into_tooltip_resolution() {
    let mut controller = controller(ChartKind::Line);
    controller
        .dispatch(ChartEvent::ZoomBy {
            factor: 2.0,
            x: 0.0,
            y: 0.0,
        })
        .expect("zoom");
    assert_eq!(controller.zoom(), ZoomTransform::new(2.0, 0.0, 0.0).expect("expected"));

    let (x, y) = line_scales(&controller);
    let feb_x = x.map_date(date(2024, 2));
    controller
        .dispatch(ChartEvent::PointerMove {
            x: feb_x,
            y: y.map(110.0),
        })
        .expect("pointer move");
    let target = controller.tooltip().target.as_ref().expect("snapped target");
    assert_eq!(target.date, Some(date(2024, 2)));
    assert!((target.x - feb_x).abs() <= 1e-9);
}
