// Appearance vocabulary and the single place where untrusted appearance
// requests are resolved to concrete values.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Square,
    Circle,
    Triangle,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "square" => Some(Shape::Square),
            "circle" => Some(Shape::Circle),
            "triangle" => Some(Shape::Triangle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeClass {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "small" => Some(SizeClass::Small),
            "medium" => Some(SizeClass::Medium),
            "large" => Some(SizeClass::Large),
            _ => None,
        }
    }
}

/// Maps a size class to the rendered bounding dimension.
///
/// Total over the enumeration; `base_size` is the medium footprint.
pub fn resolve_footprint(size: SizeClass, base_size: f32) -> f32 {
    match size {
        SizeClass::Small => base_size * 0.75,
        SizeClass::Medium => base_size,
        SizeClass::Large => base_size * 1.5,
    }
}

// Requested-field resolution. `None` means "field omitted, keep the current value".
// Empty strings count as omitted.

/// Resolves a requested size name. Unknown names fall back to medium.
pub fn resolve_size(requested: Option<&str>) -> Option<SizeClass> {
    let name = non_empty(requested)?;
    Some(SizeClass::from_name(name).unwrap_or(SizeClass::Medium))
}

/// Resolves a requested shape name. Unknown names fall back to the default shape.
pub fn resolve_shape(requested: Option<&str>) -> Option<Shape> {
    let name = non_empty(requested)?;
    Some(Shape::from_name(name).unwrap_or_default())
}

/// Resolves a requested color. Any non-empty text is accepted as-is.
pub fn resolve_color(requested: Option<&str>) -> Option<String> {
    non_empty(requested).map(str::to_string)
}

/// Uniformly random `#rrggbb` color.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let rgb: u32 = rng.random_range(0..=0xFF_FFFF);
    format!("#{rgb:06x}")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BASE: f32 = 20.0;

    #[test]
    fn when_size_class_is_known_then_footprint_scales_from_base() {
        assert_eq!(resolve_footprint(SizeClass::Small, BASE), 15.0);
        assert_eq!(resolve_footprint(SizeClass::Medium, BASE), 20.0);
        assert_eq!(resolve_footprint(SizeClass::Large, BASE), 30.0);
    }

    #[test]
    fn when_size_name_is_unknown_then_footprint_equals_medium() {
        for name in ["small", "medium", "large", "unknown"] {
            let size = resolve_size(Some(name)).expect("non-empty name should resolve");
            assert!(resolve_footprint(size, BASE) > 0.0);
        }

        let unknown = resolve_size(Some("unknown")).expect("unknown should resolve");
        assert_eq!(unknown, SizeClass::Medium);
        assert_eq!(
            resolve_footprint(unknown, BASE),
            resolve_footprint(SizeClass::Medium, BASE)
        );
    }

    #[test]
    fn when_field_is_missing_or_empty_then_it_is_treated_as_omitted() {
        assert_eq!(resolve_size(None), None);
        assert_eq!(resolve_size(Some("")), None);
        assert_eq!(resolve_shape(Some("  ")), None);
        assert_eq!(resolve_color(Some("")), None);
    }

    #[test]
    fn when_shape_name_is_unknown_then_falls_back_to_square() {
        assert_eq!(resolve_shape(Some("circle")), Some(Shape::Circle));
        assert_eq!(resolve_shape(Some("hexagon")), Some(Shape::Square));
    }

    #[test]
    fn when_color_is_provided_then_it_is_kept_verbatim() {
        assert_eq!(resolve_color(Some("#ff0000")), Some("#ff0000".to_string()));
        assert_eq!(resolve_color(Some("tomato")), Some("tomato".to_string()));
    }

    #[test]
    fn when_random_color_is_generated_then_it_is_a_hex_triplet() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let color = random_color(&mut rng);
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
