use lumen_geom::{Vec3, color_normalize, grayscale, lat_long_to_norm};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
fn vapprox(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps) && approx(a.z, b.z, eps)
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_color() -> impl Strategy<Value = Vec3> {
    (0.0f32..8.0, 0.0f32..8.0, 0.0f32..8.0).prop_map(|(r, g, b)| Vec3::new(r, g, b))
}

proptest! {
    // Addition commutativity: a + b == b + a (element-wise)
    #[test]
    fn vec3_add_commutative(a in arb_vec3(), b in arb_vec3()) {
        prop_assert!(vapprox(a + b, b + a, 1e-5));
    }

    // Negation is an additive inverse
    #[test]
    fn vec3_neg_inverse(a in arb_vec3()) {
        prop_assert!(vapprox(a + (-a), Vec3::ZERO, 1e-6));
    }

    // Every quantized direction decodes to a unit vector
    #[test]
    fn lat_long_is_unit(lat in any::<u8>(), lng in any::<u8>()) {
        let n = lat_long_to_norm([lat, lng]);
        prop_assert!(approx(n.length(), 1.0, 1e-5));
    }

    // Normalized colors never exceed 1.0 and keep their hue
    #[test]
    fn color_normalize_bounded(c in arb_color()) {
        let n = color_normalize(c);
        prop_assert!(n.max_element() <= 1.0 + 1e-6);
        let m = c.max_element();
        if m > 1.0 {
            prop_assert!(vapprox(n * m, c, 1e-4));
        } else {
            prop_assert_eq!(n, c);
        }
    }

    // Luma of a gray is that gray
    #[test]
    fn grayscale_of_gray(v in 0.0f32..255.0) {
        prop_assert!(approx(grayscale(Vec3::splat(v)), v, 1e-3 * v.max(1.0)));
    }
}
