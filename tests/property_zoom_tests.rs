use cpi_chart::core::{Viewport, ZoomBehavior, ZoomTransform};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Zoom { factor: f64, x: f64, y: f64 },
    Pan { dx: f64, dy: f64 },
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        (0.1f64..10.0, 0.0f64..640.0, 0.0f64..480.0)
            .prop_map(|(factor, x, y)| Gesture::Zoom { factor, x, y }),
        (-800.0f64..800.0, -800.0f64..800.0).prop_map(|(dx, dy)| Gesture::Pan { dx, dy }),
    ]
}

fn transform() -> impl Strategy<Value = ZoomTransform> {
    (0.1f64..10.0, -500.0f64..500.0, -500.0f64..500.0)
        .prop_map(|(k, x, y)| ZoomTransform::new(k, x, y).expect("valid transform"))
}

proptest! {
    #[test]
    fn gesture_sequences_respect_scale_and_translate_bounds(
        gestures in prop::collection::vec(gesture(), 1..40)
    ) {
        let viewport = Viewport::new(640, 480);
        let behavior = ZoomBehavior::default();
        let mut current = ZoomTransform::IDENTITY;

        for gesture in gestures {
            current = match gesture {
                Gesture::Zoom { factor, x, y } => behavior
                    .scale_by(current, factor, (x, y), viewport)
                    .expect("zoom"),
                Gesture::Pan { dx, dy } => behavior
                    .translate_by(current, dx, dy, viewport)
                    .expect("pan"),
            };

            prop_assert!(current.k() >= 1.0 && current.k() <= 8.0);
            // Content always covers the whole viewport.
            prop_assert!(current.invert_x(0.0) >= -1e-6);
            prop_assert!(current.invert_x(640.0) <= 640.0 + 1e-6);
            prop_assert!(current.invert_y(0.0) >= -1e-6);
            prop_assert!(current.invert_y(480.0) <= 480.0 + 1e-6);
        }
    }

    #[test]
    fn composition_is_associative(a in transform(), b in transform(), c in transform()) {
        let left = a.then(b).then(c);
        let right = a.then(b.then(c));

        let tolerance = 1e-9 * (1.0 + left.x().abs().max(left.y().abs()));
        prop_assert!((left.k() - right.k()).abs() <= 1e-9 * left.k());
        prop_assert!((left.x() - right.x()).abs() <= tolerance);
        prop_assert!((left.y() - right.y()).abs() <= tolerance);
    }
}
