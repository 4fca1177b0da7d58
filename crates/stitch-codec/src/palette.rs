// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Thread palette resolution.

use glam::Vec3;
use rand::Rng;

use crate::color::Color;

/// Draws a random color biased toward unit brightness.
///
/// Three uniform components are normalized as a vector, so every generated
/// color sits on the unit sphere in RGB space rather than being uniform in
/// hue or lightness. Channels are snapped to 8 bits so the color survives a
/// round-trip through its `#rrggbb` form unchanged.
pub fn random_unit_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let v = Vec3::new(rng.gen(), rng.gen(), rng.gen()).normalize_or_zero();
    Color::from_hex(Color::new(v.x, v.y, v.z).to_hex())
}

/// Ordered, never-empty list of colors for successive color-stop blocks.
///
/// Lookups wrap, so any index resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Resolves a palette covering `color_change_count + 1` blocks.
    ///
    /// User colors are kept in order (all of them, even past the required
    /// length); missing slots are filled from [`random_unit_color`].
    pub fn resolve<R: Rng + ?Sized>(user: &[Color], color_change_count: u32, rng: &mut R) -> Self {
        let required = color_change_count as usize + 1;
        let mut colors = user.to_vec();
        while colors.len() < required {
            colors.push(random_unit_color(rng));
        }
        Self { colors }
    }

    /// Wraps a fixed list of colors. Returns `None` for an empty list.
    pub fn from_colors(colors: Vec<Color>) -> Option<Self> {
        (!colors.is_empty()).then_some(Self { colors })
    }

    /// Color for block `index`, wrapping past the end.
    pub fn get(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// Number of entries (always at least 1).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entries in order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn length_covers_every_block() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in [0u32, 1, 5, 9999] {
            let p = Palette::resolve(&[], count, &mut rng);
            assert_eq!(p.len(), count as usize + 1);
            for i in 0..(count as usize * 2 + 3) {
                let _ = p.get(i);
            }
        }
    }

    #[test]
    fn user_colors_come_first_and_extras_are_kept() {
        let mut rng = StdRng::seed_from_u64(1);
        let user = [Color::BLACK, Color::WHITE, Color::new(1.0, 0.0, 0.0)];
        let p = Palette::resolve(&user, 0, &mut rng);
        assert_eq!(p.colors(), &user);
        assert_eq!(p.get(4), Color::WHITE);

        let p = Palette::resolve(&user[..1], 3, &mut rng);
        assert_eq!(p.len(), 4);
        assert_eq!(p.get(0), Color::BLACK);
    }

    #[test]
    fn generated_colors_are_unit_length() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..256 {
            let c = random_unit_color(&mut rng);
            let len = Vec3::new(c.r, c.g, c.b).length();
            assert!((len - 1.0).abs() < 0.01, "length {len}");
            assert!(c.r >= 0.0 && c.g >= 0.0 && c.b >= 0.0);
        }
    }

    #[test]
    fn generated_colors_survive_hex_round_trip() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..64 {
            let c = random_unit_color(&mut rng);
            assert_eq!(c.to_string().parse::<Color>(), Ok(c));
        }
    }

    #[test]
    fn same_seed_same_palette() {
        let a = Palette::resolve(&[], 4, &mut StdRng::seed_from_u64(3));
        let b = Palette::resolve(&[], 4, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_fixed_palette_is_rejected() {
        assert!(Palette::from_colors(Vec::new()).is_none());
    }
}
