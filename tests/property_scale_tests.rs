use cpi_chart::core::{ContinuousScale, IndexScale, LinearScale, ZoomTransform};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_round_trip_is_stable(
        domain_start in -10_000.0f64..10_000.0,
        domain_span in 0.001f64..50_000.0,
        range_end in 10.0f64..4_000.0,
        reversed in any::<bool>(),
        fraction in -0.5f64..1.5
    ) {
        let range = if reversed { (range_end, 0.0) } else { (0.0, range_end) };
        let scale = LinearScale::new((domain_start, domain_start + domain_span), range)
            .expect("valid scale");

        let value = domain_start + domain_span * fraction;
        let recovered = scale.invert(scale.map(value));
        let tolerance = 1e-9 * (1.0 + value.abs().max(domain_span));
        prop_assert!((recovered - value).abs() <= tolerance);
    }

    #[test]
    fn index_slot_lookup_matches_slot_centers(
        count in 1usize..40,
        width in 50.0f64..2_000.0,
        padding in 0.0f64..0.45
    ) {
        let scale = IndexScale::new(count, (0.0, width), padding).expect("valid index scale");
        for slot in 0..count {
            let center = scale.slot_center(slot).expect("slot center");
            prop_assert_eq!(scale.slot_at(center), Some(slot));
        }
    }

    #[test]
    fn rescaled_scale_equals_transformed_base(
        k in 0.5f64..10.0,
        tx in -2_000.0f64..2_000.0,
        value in 0.0f64..100.0
    ) {
        let base = LinearScale::new((0.0, 100.0), (0.0, 800.0)).expect("valid scale");
        let transform = ZoomTransform::new(k, tx, 0.0).expect("valid transform");
        let rescaled = transform.rescale_x(&base).expect("rescaled scale");

        let expected = k * base.map(value) + tx;
        prop_assert!((rescaled.map(value) - expected).abs() <= 1e-6);
    }
}
