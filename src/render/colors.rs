use image::Rgb;
use palette::{FromColor, Lch, Srgb};

pub const BAR: Rgb<u8> = Rgb([135, 206, 235]);

const KNOWN: [(&str, [u8; 3]); 5] = [
    ("scikit-learn", [0x28, 0x36, 0x18]),
    ("pandas", [0x27, 0x4c, 0x77]),
    ("matplotlib", [0xd6, 0x28, 0x28]),
    ("plotly", [0xf7, 0x7f, 0x00]),
    ("numpy", [0xfc, 0xbf, 0x49]),
];

// Golden-angle hue step keeps neighbouring fallback colours apart.
const HUE_STEP: f32 = 137.508;

pub fn known_color(package: &str) -> Option<Rgb<u8>> {
    KNOWN
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, rgb)| Rgb(*rgb))
}

/// Colour for every package of a chart, in the given order. Packages without
/// a fixed colour take the next hue of the fallback cycle.
pub fn assign_colors<'a, I>(packages: I) -> Vec<(String, Rgb<u8>)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut unknown = 0usize;
    packages
        .into_iter()
        .map(|package| {
            let color = known_color(package).unwrap_or_else(|| {
                let color = fallback_color(unknown);
                unknown += 1;
                color
            });
            (package.to_string(), color)
        })
        .collect()
}

pub fn fallback_color(index: usize) -> Rgb<u8> {
    let hue = (index as f32 * HUE_STEP) % 360.0;
    let lch: Lch = Lch::new(55.0f32, 70.0f32, hue);
    let srgb: Srgb<f32> = Srgb::from_color(lch);
    let rgb: Srgb<u8> = srgb.into_format();
    let (r, g, b) = rgb.into_components();
    Rgb([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_packages_keep_their_colour() {
        assert_eq!(known_color("pandas"), Some(Rgb([0x27, 0x4c, 0x77])));
        assert_eq!(known_color("Pandas"), None);
    }

    #[test]
    fn unknown_packages_cycle_deterministically() {
        let first = assign_colors(["numpy", "polars", "scipy"]);
        let second = assign_colors(["numpy", "polars", "scipy"]);
        assert_eq!(first, second);
        assert_eq!(first[0].1, Rgb([0xfc, 0xbf, 0x49]));
        assert_eq!(first[1].1, fallback_color(0));
        assert_eq!(first[2].1, fallback_color(1));
        assert_ne!(first[1].1, first[2].1);
    }
}
