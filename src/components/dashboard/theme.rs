//! Highlight colors for the dashboard.
//!
//! Turns a highlight mode and intensity into a CSS color: binary highlights
//! use a single accent color, gradient highlights interpolate between a low
//! and a high color.

use crate::highlight::HighlightMode;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |from: u8, to: u8| (from as f64 * (1.0 - t) + to as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors used to shade highlighted graph entities.
#[derive(Clone, Debug)]
pub struct HighlightTheme {
	pub name: &'static str,
	/// Color of entities absent from the highlight map.
	pub idle: Color,
	/// Color of entities in a binary highlight.
	pub binary: Color,
	/// Gradient start (intensity 0).
	pub low: Color,
	/// Gradient end (intensity `max_intensity` and above).
	pub high: Color,
	/// Intensity mapped to `high`. Provision shares are percentages.
	pub max_intensity: f64,
}

impl HighlightTheme {
	/// Muted blues with an amber accent (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			idle: Color::rgba(140, 160, 180, 0.35),
			binary: Color::rgb(230, 160, 60),
			low: Color::rgb(222, 235, 247),
			high: Color::rgb(8, 69, 148),
			max_intensity: 100.0,
		}
	}

	/// Color for an entity with `intensity` (None = not highlighted).
	pub fn color_for(&self, mode: HighlightMode, intensity: Option<f64>) -> Color {
		match (mode, intensity) {
			(_, None) => self.idle,
			(HighlightMode::Binary, Some(_)) => self.binary,
			(HighlightMode::Gradient, Some(i)) => {
				let t = if self.max_intensity > 0.0 {
					i / self.max_intensity
				} else {
					1.0
				};
				self.low.lerp(self.high, t)
			}
		}
	}
}

impl Default for HighlightTheme {
	fn default() -> Self {
		Self::default_theme()
	}
}
