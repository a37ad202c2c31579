// Simple color struct, created from an unsigned 32 representing RRGGBBAA
// or from a `#RRGGBB` hex string, and formatted back into CSS color strings

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

// Hues particles are drawn from, one picked per particle at spawn
pub const PALETTE: [u32; 10] = [
    0xFF6B6BFF, // red
    0x4ECDC4FF, // teal
    0x45B7D1FF, // blue
    0xFFA07AFF, // salmon
    0x98D8C8FF, // mint
    0xF7DC6FFF, // yellow
    0xBB8FCEFF, // purple
    0x85C1E2FF, // sky
    0xF8B500FF, // gold
    0xFF69B4FF, // pink
];

impl Color {
    pub const WHITE: Color = Color {
        r: 0xff,
        g: 0xff,
        b: 0xff,
        a: 0xff,
    };

    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    pub fn from_hex(hex: &str) -> Option<Color> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return None;
        }
        let rgb = u32::from_str_radix(digits, 16).ok()?;
        Some(Color::from_u32((rgb << 8) | 0xff))
    }

    pub fn random_from_palette<R: Rng + ?Sized>(rng: &mut R) -> Color {
        let num = PALETTE.choose(rng).copied().unwrap_or(0xFFFFFFFF);
        Color::from_u32(num)
    }

    pub fn css_rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    pub fn css_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parses_hex_with_and_without_hash() {
        let teal = Color::from_hex("#4ECDC4").unwrap();
        assert_eq!((teal.r, teal.g, teal.b, teal.a), (0x4e, 0xcd, 0xc4, 0xff));
        assert_eq!(Color::from_hex("4ecdc4"), Some(teal));
        assert_eq!(Color::from_hex("#4ECDC"), None);
        assert_eq!(Color::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn formats_css_strings() {
        let c = Color::from_u32(PALETTE[0]);
        assert_eq!(c.css_hex(), "#FF6B6B");
        assert_eq!(c.css_rgba(0.5), "rgba(255, 107, 107, 0.5)");
    }

    #[test]
    fn palette_picks_stay_in_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let c = Color::random_from_palette(&mut rng);
            let packed = (c.r as u32) << 24 | (c.g as u32) << 16 | (c.b as u32) << 8 | c.a as u32;
            assert!(PALETTE.contains(&packed));
        }
    }
}
