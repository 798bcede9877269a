//! Color helpers shared by the panel and the diagram surface.
//!
//! Department colors and the canvas background are plain hex strings. The
//! helpers here shade them per channel and derive the background gradient and
//! the dot-grid color from a single base color.

use log::warn;
use thiserror::Error;

/// Background color used when no (valid) base color is available.
pub const DEFAULT_BACKGROUND: &str = "#cbd5f5";

/// Fixed light center of the background gradient.
const GRADIENT_CENTER: &str = "#f8fafc";

/// Rejected color input.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ColorError {
	/// Not a 3- or up-to-6-digit hex string.
	#[error("invalid hex color {0:?}")]
	InvalidHex(String),
}

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

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Parses `#rgb`, `#rrggbb` or a short malformed form (right-padded with
	/// `0` up to six digits). The leading `#` is optional.
	pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
		let digits = hex.strip_prefix('#').unwrap_or(hex);
		if digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(ColorError::InvalidHex(hex.to_string()));
		}

		let normalized = if digits.len() == 3 {
			digits.chars().flat_map(|c| [c, c]).collect::<String>()
		} else {
			format!("{digits:0<6}")
		};

		let numeric = u32::from_str_radix(&normalized, 16)
			.map_err(|_| ColorError::InvalidHex(hex.to_string()))?;

		Ok(Self::rgb(
			(numeric >> 16) as u8,
			((numeric >> 8) & 0xff) as u8,
			(numeric & 0xff) as u8,
		))
	}

	/// Adds `amount` to each channel independently, saturating at 0 and 255.
	pub fn shift(self, amount: i32) -> Self {
		let channel = |c: u8| {
			clamp(f64::from(i32::from(c).saturating_add(amount)), 0.0, 255.0) as u8
		};
		Self {
			r: channel(self.r),
			g: channel(self.g),
			b: channel(self.b),
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			self.to_css_rgb()
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Restricts `value` to `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
	value.max(min).min(max)
}

/// Lightens (positive `amount`) or darkens (negative) a hex color per channel.
pub fn adjust_hex_color(hex: &str, amount: i32) -> Result<String, ColorError> {
	Ok(Color::from_hex(hex)?.shift(amount).to_css_rgb())
}

/// CSS radial gradient for the canvas background derived from `base`.
pub fn background_gradient(base: &str) -> String {
	let (brighter, darker) = match (adjust_hex_color(base, 25), adjust_hex_color(base, -35)) {
		(Ok(brighter), Ok(darker)) => (brighter, darker),
		(Err(e), _) | (_, Err(e)) => {
			warn!("org-flow: {e}, falling back to {DEFAULT_BACKGROUND}");
			return background_gradient(DEFAULT_BACKGROUND);
		}
	};
	format!("radial-gradient(circle at top, {GRADIENT_CENTER} 0, {brighter} 45%, {darker} 100%)")
}

/// Dot-grid color for a background `base` color.
pub fn grid_color(base: &str) -> String {
	adjust_hex_color(base, -80).unwrap_or_else(|e| {
		warn!("org-flow: {e}, falling back to {DEFAULT_BACKGROUND}");
		grid_color(DEFAULT_BACKGROUND)
	})
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn channels(hex: &str) -> [i32; 3] {
		let value = u32::from_str_radix(&hex[1..], 16).unwrap();
		[16, 8, 0].map(|shift| ((value >> shift) & 0xff) as i32)
	}

	#[test]
	fn clamp_restricts_to_bounds() {
		assert_eq!(clamp(-4.0, 0.0, 255.0), 0.0);
		assert_eq!(clamp(300.0, 0.0, 255.0), 255.0);
		assert_eq!(clamp(12.5, 0.0, 255.0), 12.5);
	}

	#[test]
	fn short_form_expands() {
		assert_eq!(adjust_hex_color("#fff", 0).unwrap(), "#ffffff");
		assert_eq!(adjust_hex_color("0af", 0).unwrap(), "#00aaff");
	}

	#[test]
	fn channels_saturate() {
		assert_eq!(adjust_hex_color("#000000", 300).unwrap(), "#ffffff");
		assert_eq!(adjust_hex_color("#ffffff", -300).unwrap(), "#000000");
		assert_eq!(adjust_hex_color("#10b981", 25).unwrap(), "#29d29a");
	}

	#[test]
	fn malformed_short_input_is_padded() {
		assert_eq!(adjust_hex_color("#12", 0).unwrap(), "#120000");
		assert_eq!(adjust_hex_color("#abcd", 0).unwrap(), "#abcd00");
	}

	#[test]
	fn non_hex_input_is_rejected() {
		assert_eq!(
			adjust_hex_color("#zz0000", 10),
			Err(ColorError::InvalidHex("#zz0000".into()))
		);
		assert!(adjust_hex_color("#1234567", 0).is_err());
	}

	#[test]
	fn shifted_colors_stay_valid() {
		for amount in [-400, -80, -35, -1, 0, 1, 25, 80, 400] {
			for base in ["#000000", "#cbd5f5", "#ffffff", "#6366f1"] {
				let out = adjust_hex_color(base, amount).unwrap();
				let back = adjust_hex_color(&out, -amount).unwrap();
				for s in [&out, &back] {
					assert_eq!(s.len(), 7);
					assert!(s[1..].chars().all(|c| c.is_ascii_hexdigit()));
				}
			}
		}
	}

	#[test]
	fn gradient_uses_shaded_stops() {
		assert_eq!(
			background_gradient("#cbd5f5"),
			"radial-gradient(circle at top, #f8fafc 0, #e4eeff 45%, #a8b2d2 100%)"
		);
		assert_eq!(background_gradient("nope"), background_gradient(DEFAULT_BACKGROUND));
	}

	#[test]
	fn grid_color_darkens() {
		assert_eq!(grid_color("#cbd5f5"), "#7b85a5");
	}

	#[test]
	fn alpha_is_rendered_only_when_translucent() {
		assert_eq!(Color::rgb(15, 23, 42).to_css(), "#0f172a");
		assert_eq!(
			Color::rgb(15, 23, 42).with_alpha(0.5).to_css(),
			"rgba(15, 23, 42, 0.5)"
		);
	}

	proptest! {
		#[test]
		fn shifted_hex_is_always_well_formed(rgb in 0u32..=0xff_ffff, amount in -600i32..=600) {
			let base = format!("#{rgb:06x}");
			let out = adjust_hex_color(&base, amount).unwrap();
			let back = adjust_hex_color(&out, -amount).unwrap();
			for hex in [&out, &back] {
				prop_assert_eq!(hex.len(), 7);
				prop_assert!(hex.starts_with('#'));
				let lower_hex = |c: char| c.is_ascii_digit() || ('a'..='f').contains(&c);
				prop_assert!(hex[1..].chars().all(lower_hex));
			}
		}

		#[test]
		fn each_channel_moves_by_the_clamped_amount(
			rgb in 0u32..=0xff_ffff,
			amount in any::<i32>(),
		) {
			let base = format!("#{rgb:06x}");
			let out = adjust_hex_color(&base, amount).unwrap();
			for (before, after) in channels(&base).into_iter().zip(channels(&out)) {
				prop_assert!((0..=255).contains(&after));
				prop_assert_eq!(after, before.saturating_add(amount).clamp(0, 255));
			}
		}

		#[test]
		fn zero_shift_is_identity(rgb in 0u32..=0xff_ffff) {
			let base = format!("#{rgb:06x}");
			prop_assert_eq!(adjust_hex_color(&base, 0).unwrap(), base);
		}

		#[test]
		fn arbitrary_text_is_shaded_or_rejected(text in "#?.{0,8}", amount in -300i32..=300) {
			match adjust_hex_color(&text, amount) {
				Ok(out) => {
					prop_assert_eq!(out.len(), 7);
				}
				Err(ColorError::InvalidHex(input)) => {
					prop_assert_eq!(input, text);
				}
			}
		}
	}
}
