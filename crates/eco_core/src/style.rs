//! Per-category presentation theme.

use crate::category::WasteCategory;

/// Plain sRGB color, converted by the GUI into its own color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

/// Colors and icon used to render a classification report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    /// Strong fill, used for the confidence dot and bar.
    pub accent: Rgb,
    /// Foreground for headings on a light background.
    pub text: Rgb,
    /// Light background behind the disposal guidance.
    pub light: Rgb,
    pub border: Rgb,
    pub icon: &'static str,
}

impl CategoryStyle {
    const fn palette(accent: u32, text: u32, light: u32, border: u32, icon: &'static str) -> Self {
        Self {
            accent: Rgb::hex(accent),
            text: Rgb::hex(text),
            light: Rgb::hex(light),
            border: Rgb::hex(border),
            icon,
        }
    }
}

/// Theme for a category. Total over every value: `Other` falls back to the
/// rose palette so unknown categories still render.
pub fn category_style(category: &WasteCategory) -> CategoryStyle {
    match category {
        WasteCategory::Organic => {
            CategoryStyle::palette(0x22c55e, 0x16a34a, 0xf0fdf4, 0xbbf7d0, "🍂")
        }
        WasteCategory::Plastic => {
            CategoryStyle::palette(0xf59e0b, 0xd97706, 0xfffbeb, 0xfde68a, "🧴")
        }
        WasteCategory::Paper => CategoryStyle::palette(0x0ea5e9, 0x0284c7, 0xf0f9ff, 0xbae6fd, "📄"),
        WasteCategory::Metal => CategoryStyle::palette(0x71717a, 0x52525b, 0xfafafa, 0xe4e4e7, "🔩"),
        WasteCategory::Glass => CategoryStyle::palette(0x10b981, 0x059669, 0xecfdf5, 0xa7f3d0, "🍾"),
        WasteCategory::EWaste => {
            CategoryStyle::palette(0x6366f1, 0x4f46e5, 0xeef2ff, 0xc7d2fe, "🔌")
        }
        WasteCategory::Other(_) => {
            CategoryStyle::palette(0xf43f5e, 0xe11d48, 0xfff1f2, 0xfecdd3, "🗑")
        }
    }
}
