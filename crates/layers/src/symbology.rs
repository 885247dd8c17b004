use serde::{Deserialize, Serialize};

/// Linear RGBA, each channel in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const YELLOW: Color = Color::rgba(1.0, 1.0, 0.0, 1.0);
    pub const CYAN: Color = Color::rgba(0.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    /// CSS `green` (#008000), not full-intensity green.
    pub const GREEN: Color = Color::rgba(0.0, 128.0 / 255.0, 0.0, 1.0);

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `rgba(r, g, b, a)` with 0-255 channels, which the engine's
    /// `Color.fromCssColorString` accepts.
    pub fn to_css(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;
pub const STATIC_LAYER_ALPHA: f32 = 0.4;
pub const ION_LAYER_ALPHA: f32 = 0.3;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    pub stroke: Color,
    pub fill: Color,
    pub stroke_width: f32,
    pub clamp_to_ground: bool,
}

impl LayerStyle {
    /// Stroke and fill share one colour.
    pub const fn uniform(color: Color) -> Self {
        Self {
            stroke: color,
            fill: color,
            stroke_width: DEFAULT_STROKE_WIDTH,
            clamp_to_ground: true,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::uniform(Color::rgba(1.0, 1.0, 1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, LayerStyle};

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::CYAN.with_alpha(0.4);
        assert_eq!(c, Color::rgba(0.0, 1.0, 1.0, 0.4));
    }

    #[test]
    fn css_string_uses_byte_channels() {
        assert_eq!(Color::GREEN.with_alpha(0.3).to_css(), "rgba(0, 128, 0, 0.3)");
        assert_eq!(Color::rgba(2.0, -1.0, 0.5, 1.0).to_css(), "rgba(255, 0, 128, 1)");
    }

    #[test]
    fn uniform_style_clamps_to_ground() {
        let style = LayerStyle::uniform(Color::RED);
        assert_eq!(style.stroke, style.fill);
        assert_eq!(style.stroke_width, 2.0);
        assert!(style.clamp_to_ground);
    }

    #[test]
    fn partial_style_deserializes_with_defaults() {
        let style: LayerStyle = serde_json::from_str(r#"{"stroke_width": 4.0}"#).unwrap();
        assert_eq!(style.stroke_width, 4.0);
        assert!(style.clamp_to_ground);
    }
}
