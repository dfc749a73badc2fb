//! Color values for the foreground/background color commands.

/// An sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Unpack an RGBA u32 (packed as 0xRRGGBBAA).
    pub fn from_u32(color: u32) -> Self {
        Self {
            r: ((color >> 24) & 0xFF) as u8,
            g: ((color >> 16) & 0xFF) as u8,
            b: ((color >> 8) & 0xFF) as u8,
            a: (color & 0xFF) as f32 / 255.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// `rgba(r, g, b, a)`.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// `rgb(r, g, b)`, dropping alpha.
    pub fn to_css_rgb(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Lowercase `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb(...)`, `rgba(...)` or `transparent`.
    pub fn parse_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }

        let inner = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
        match parts.as_slice() {
            [r, g, b] => Some(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            [r, g, b, a] => Some(Self {
                r: channel(r)?,
                g: channel(g)?,
                b: channel(b)?,
                a: a.parse::<f32>().ok()?.clamp(0.0, 1.0),
            }),
            _ => None,
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let digit = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    match hex.len() {
        3 => {
            let expand = |i| digit(i, 1).map(|v| v * 17);
            Some(Rgba::rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some(Rgba::rgb(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?)),
        _ => None,
    }
}

/// Which color a color command changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Foreground,
    Background,
}

impl ColorRole {
    /// Document command for this role.
    pub fn command(self) -> &'static str {
        match self {
            ColorRole::Foreground => "ForeColor",
            ColorRole::Background => "BackColor",
        }
    }

    /// Format a custom picker color: hex for text, rgba (with opacity) for
    /// backgrounds.
    pub fn format_custom(self, color: Rgba) -> String {
        match self {
            ColorRole::Foreground => color.to_hex(),
            ColorRole::Background => color.to_css(),
        }
    }
}
