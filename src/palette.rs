//! Color palettes for agents and food.
//!
//! Palette identifiers are the strings accepted by the `palette` config
//! field; unknown names fall back to the default palette.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 8-bit RGB color value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

/// Food that did not inherit a dying snake's color renders green-500.
pub const FOOD_COLOR: Color = Color::from_rgb(0x22c55e);

/// A named palette: snake colors plus a suggested background.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub name: &'static str,
    pub colors: &'static [Color],
    pub background: Color,
}

impl Palette {
    /// Look up a palette by its config identifier, falling back to the
    /// default palette for unknown names.
    pub fn by_name(name: &str) -> &'static Palette {
        PALETTES
            .iter()
            .find(|p| p.name == name)
            .unwrap_or(&PALETTES[0])
    }

    /// Uniformly random color from this palette.
    pub fn random_color<R: Rng>(&self, rng: &mut R) -> Color {
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

pub const PALETTES: &[Palette] = &[
    Palette {
        name: "default",
        colors: &[
            Color::from_rgb(0xef4444),
            Color::from_rgb(0x3b82f6),
            Color::from_rgb(0xa855f7),
            Color::from_rgb(0xec4899),
            Color::from_rgb(0xeab308),
            Color::from_rgb(0xf97316),
            Color::from_rgb(0xd946ef),
            Color::from_rgb(0xf43f5e),
            Color::from_rgb(0x0ea5e9),
            Color::from_rgb(0xf59e0b),
            Color::from_rgb(0x64748b),
            Color::from_rgb(0x71717a),
            Color::from_rgb(0x78716c),
        ],
        background: Color::from_rgb(0x0f172a),
    },
    Palette {
        name: "miro",
        colors: &[
            Color::from_rgb(0xe63946),
            Color::from_rgb(0xf4d03f),
            Color::from_rgb(0x2274a5),
            Color::from_rgb(0x000000),
            Color::from_rgb(0xe8e8e8),
        ],
        background: Color::from_rgb(0x1e293b),
    },
    Palette {
        name: "soviet",
        colors: &[
            Color::from_rgb(0xcc0000),
            Color::from_rgb(0xffd700),
            Color::from_rgb(0x000000),
            Color::from_rgb(0xffffff),
            Color::from_rgb(0xb8860b),
        ],
        background: Color::from_rgb(0x7f1d1d),
    },
    Palette {
        name: "mondrian",
        colors: &[
            Color::from_rgb(0xff0000),
            Color::from_rgb(0xffd700),
            Color::from_rgb(0x0000ff),
            Color::from_rgb(0xffffff),
            Color::from_rgb(0x000000),
        ],
        background: Color::from_rgb(0xf3f4f6),
    },
    Palette {
        name: "cyberpunk",
        colors: &[
            Color::from_rgb(0x06b6d4),
            Color::from_rgb(0xec4899),
            Color::from_rgb(0xf43f5e),
            Color::from_rgb(0xf59e0b),
            Color::from_rgb(0x8b5cf6),
        ],
        background: Color::from_rgb(0x1e293b),
    },
    Palette {
        name: "vaporwave",
        colors: &[
            Color::from_rgb(0xf472b6),
            Color::from_rgb(0xa78bfa),
            Color::from_rgb(0xf87171),
            Color::from_rgb(0xfbbf24),
            Color::from_rgb(0x60a5fa),
        ],
        background: Color::from_rgb(0xfce7f3),
    },
    Palette {
        name: "pastelDream",
        colors: &[
            Color::from_rgb(0xfde68a),
            Color::from_rgb(0xbfdbfe),
            Color::from_rgb(0xfbcfe8),
            Color::from_rgb(0xe9d5ff),
            Color::from_rgb(0xfda4af),
        ],
        background: Color::from_rgb(0xfef9c3),
    },
    Palette {
        name: "kandinsky",
        colors: &[
            Color::from_rgb(0xff9800),
            Color::from_rgb(0x4a90e2),
            Color::from_rgb(0x9b59b6),
            Color::from_rgb(0xf1c40f),
            Color::from_rgb(0xd946ef),
        ],
        background: Color::from_rgb(0x1f2937),
    },
    Palette {
        name: "synthwave",
        colors: &[
            Color::from_rgb(0x6366f1),
            Color::from_rgb(0x8b5cf6),
            Color::from_rgb(0xec4899),
            Color::from_rgb(0x60a5fa),
            Color::from_rgb(0xf59e0b),
        ],
        background: Color::from_rgb(0x1e3a8a),
    },
    Palette {
        name: "baroque",
        colors: &[
            Color::from_rgb(0x7f1d1d),
            Color::from_rgb(0xfbbf24),
            Color::from_rgb(0x1e3a8a),
            Color::from_rgb(0x4b5563),
            Color::from_rgb(0xf9fafb),
        ],
        background: Color::from_rgb(0x1f2937),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_from_rgb() {
        let c = Color::from_rgb(0xef4444);
        assert_eq!(c, Color::new(0xef, 0x44, 0x44));
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        assert_eq!(Palette::by_name("miro").colors.len(), 5);
        assert_eq!(Palette::by_name("default").colors.len(), 13);
        // Unknown names fall back to default
        assert_eq!(Palette::by_name("nope").name, "default");
    }

    #[test]
    fn test_random_color_comes_from_palette() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let palette = Palette::by_name("cyberpunk");
        for _ in 0..20 {
            let c = palette.random_color(&mut rng);
            assert!(palette.colors.contains(&c));
        }
    }
}
