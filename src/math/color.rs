/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Creates an opaque color from red, green and blue components.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Converts hue, saturation and value (all in `[0, 1]`) into an opaque
    /// RGB color.
    ///
    /// Hue wraps, so `1.0` is the same red as `0.0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        if saturation <= 0.0 {
            return Self::rgb(value, value, value);
        }

        let h6 = hue.rem_euclid(1.0) * 6.0;
        let sector = h6.floor();
        let f = h6 - sector;

        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * f);
        let t = value * (1.0 - saturation * (1.0 - f));

        // rem_euclid may round up to exactly 1.0, which lands on sector 6
        let (r, g, b) = match (sector as u8) % 6 {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };
        Self::rgb(r, g, b)
    }

    /// Returns the same color with its alpha replaced.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_rgb(c: Color, r: f32, g: f32, b: f32) {
        assert_relative_eq!(c.r, r, epsilon = 1e-5);
        assert_relative_eq!(c.g, g, epsilon = 1e-5);
        assert_relative_eq!(c.b, b, epsilon = 1e-5);
    }

    #[test]
    fn primary_hues() {
        assert_rgb(Color::from_hsv(0.0, 1.0, 1.0), 1.0, 0.0, 0.0);
        assert_rgb(Color::from_hsv(1.0 / 3.0, 1.0, 1.0), 0.0, 1.0, 0.0);
        assert_rgb(Color::from_hsv(2.0 / 3.0, 1.0, 1.0), 0.0, 0.0, 1.0);
    }

    #[test]
    fn secondary_hues() {
        assert_rgb(Color::from_hsv(1.0 / 6.0, 1.0, 1.0), 1.0, 1.0, 0.0);
        assert_rgb(Color::from_hsv(0.5, 1.0, 1.0), 0.0, 1.0, 1.0);
        assert_rgb(Color::from_hsv(5.0 / 6.0, 1.0, 1.0), 1.0, 0.0, 1.0);
    }

    #[test]
    fn hue_wraps_at_one() {
        assert_rgb(Color::from_hsv(1.0, 1.0, 1.0), 1.0, 0.0, 0.0);
        assert_rgb(Color::from_hsv(-0.5, 1.0, 1.0), 0.0, 1.0, 1.0);
    }

    #[test]
    fn zero_saturation_is_gray() {
        assert_rgb(Color::from_hsv(0.3, 0.0, 0.4), 0.4, 0.4, 0.4);
    }

    #[test]
    fn hsv_colors_are_opaque() {
        assert_relative_eq!(Color::from_hsv(0.7, 1.0, 1.0).a, 1.0);
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::rgb(0.1, 0.2, 0.3).with_alpha(0.8);
        assert_rgb(c, 0.1, 0.2, 0.3);
        assert_relative_eq!(c.a, 0.8);
    }
}
