//! Color values
//!
//! Parses color literals (hex, `rgb()`/`rgba()`, `hsl()`/`hsla()` and named
//! colors) and serializes them back in the shortest equivalent spelling.

/// Color value (RGB channels plus alpha in `0..=1`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a: clamp_alpha(a) }
    }

    /// Build from float channels, clamping each to its legal range
    pub fn from_rgba_f64(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_alpha(a),
        }
    }

    /// Parse any supported color literal. Named colors are resolved first.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(color) = Self::from_name(text) {
            return Some(color);
        }
        if let Some(hex) = text.strip_prefix('#') {
            return Self::from_hex(hex);
        }

        let open = text.find('(')?;
        if !text.ends_with(')') {
            return None;
        }
        let function = text[..open].trim().to_ascii_lowercase();
        let args = split_args(&text[open + 1..text.len() - 1]);

        match function.as_str() {
            "rgb" | "rgba" => Self::from_rgb_args(&args),
            "hsl" | "hsla" => Self::from_hsl_args(&args),
            _ => None,
        }
    }

    /// Parse a hex color string (without #), 3 or 6 digits
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                // #RGB -> #RRGGBB
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Color::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            _ => None,
        }
    }

    fn from_rgb_args(args: &[&str]) -> Option<Self> {
        if args.len() != 3 && args.len() != 4 {
            return None;
        }
        let mut channels = [0.0; 3];
        for (slot, arg) in channels.iter_mut().zip(args) {
            *slot = match arg.strip_suffix('%') {
                Some(p) => parse_number(p)? * 255.0 / 100.0,
                None => parse_number(arg)?,
            };
        }
        let a = match args.get(3) {
            Some(arg) => parse_alpha(arg)?,
            None => 1.0,
        };
        Some(Self::from_rgba_f64(channels[0], channels[1], channels[2], a))
    }

    fn from_hsl_args(args: &[&str]) -> Option<Self> {
        if args.len() != 3 && args.len() != 4 {
            return None;
        }
        let hue = args[0].strip_suffix("deg").unwrap_or(args[0]);
        let h = parse_number(hue)?;
        let s = parse_number(args[1].strip_suffix('%').unwrap_or(args[1]))? / 100.0;
        let l = parse_number(args[2].strip_suffix('%').unwrap_or(args[2]))? / 100.0;
        let a = match args.get(3) {
            Some(arg) => parse_alpha(arg)?,
            None => 1.0,
        };

        let (r, g, b) = hsl_to_rgb(h, s, l);
        Some(Self::from_rgba_f64(r * 255.0, g * 255.0, b * 255.0, a))
    }

    /// Whether the color is fully opaque
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// `#rrggbb`, shortened to `#rgb` only for web-safe colors (every
    /// channel a multiple of `0x33`). Narrower than the repeated-digit rule,
    /// so `#aabbcc` and `#112233` both stay in long form. Alpha is ignored.
    pub fn to_hex(&self) -> String {
        if [self.r, self.g, self.b].iter().all(|c| c % 0x33 == 0) {
            format!("#{:x}{:x}{:x}", self.r / 17, self.g / 17, self.b / 17)
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }

    /// `rgb(r,g,b)` or `rgba(r,g,b,a)` depending on alpha
    pub fn to_rgb(&self) -> String {
        if self.is_opaque() {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, format_alpha(self.a))
        }
    }

    /// Shortest spelling of `original`, which is kept when it fails to parse
    /// or is already shortest. Ties go to hex, then `rgb()`.
    pub fn shortest(original: &str) -> String {
        let Some(color) = Self::parse(original) else {
            return original.to_string();
        };

        let mut best = original.trim().to_string();
        let mut candidates = Vec::with_capacity(2);
        if color.is_opaque() {
            candidates.push(color.to_hex());
        }
        candidates.push(color.to_rgb());

        for candidate in candidates.into_iter().rev() {
            if candidate.len() <= best.len() {
                best = candidate;
            }
        }
        best
    }

    /// Get a named color
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("transparent") {
            return Some(Color::rgba(0, 0, 0, 0.0));
        }
        named_rgb(&name.to_ascii_lowercase()).map(|(r, g, b)| Color::rgb(r, g, b))
    }

    /// Whether a word is one of the named colors
    pub fn is_named(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

fn clamp_alpha(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}

fn parse_alpha(text: &str) -> Option<f64> {
    match text.strip_suffix('%') {
        Some(p) => Some(parse_number(p)? / 100.0),
        None => parse_number(text),
    }
}

/// Alpha with up to three decimals and no leading zero (`.5`)
fn format_alpha(a: f64) -> String {
    let text = format!("{:.3}", a);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text.strip_prefix("0.") {
        Some(rest) => format!(".{}", rest),
        None => text.to_string(),
    }
}

/// Split function arguments on commas, or on whitespace and `/` for the
/// space-separated syntax
fn split_args(inner: &str) -> Vec<&str> {
    if inner.contains(',') {
        inner.split(',').map(str::trim).collect()
    } else {
        inner
            .split(|c: char| c.is_whitespace() || c == '/')
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Convert HSL to RGB
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    (r, g, b)
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 { t += 1.0; }
    if t > 1.0 { t -= 1.0; }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Named color dictionary (CSS Color Module Level 4 keywords)
fn named_rgb(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name {
        "aliceblue" => (240, 248, 255),
        "antiquewhite" => (250, 235, 215),
        "aqua" | "cyan" => (0, 255, 255),
        "aquamarine" => (127, 255, 212),
        "azure" => (240, 255, 255),
        "beige" => (245, 245, 220),
        "bisque" => (255, 228, 196),
        "black" => (0, 0, 0),
        "blanchedalmond" => (255, 235, 205),
        "blue" => (0, 0, 255),
        "blueviolet" => (138, 43, 226),
        "brown" => (165, 42, 42),
        "burlywood" => (222, 184, 135),
        "cadetblue" => (95, 158, 160),
        "chartreuse" => (127, 255, 0),
        "chocolate" => (210, 105, 30),
        "coral" => (255, 127, 80),
        "cornflowerblue" => (100, 149, 237),
        "cornsilk" => (255, 248, 220),
        "crimson" => (220, 20, 60),
        "darkblue" => (0, 0, 139),
        "darkcyan" => (0, 139, 139),
        "darkgoldenrod" => (184, 134, 11),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "darkgreen" => (0, 100, 0),
        "darkkhaki" => (189, 183, 107),
        "darkmagenta" => (139, 0, 139),
        "darkolivegreen" => (85, 107, 47),
        "darkorange" => (255, 140, 0),
        "darkorchid" => (153, 50, 204),
        "darkred" => (139, 0, 0),
        "darksalmon" => (233, 150, 122),
        "darkseagreen" => (143, 188, 143),
        "darkslateblue" => (72, 61, 139),
        "darkslategray" | "darkslategrey" => (47, 79, 79),
        "darkturquoise" => (0, 206, 209),
        "darkviolet" => (148, 0, 211),
        "deeppink" => (255, 20, 147),
        "deepskyblue" => (0, 191, 255),
        "dimgray" | "dimgrey" => (105, 105, 105),
        "dodgerblue" => (30, 144, 255),
        "firebrick" => (178, 34, 34),
        "floralwhite" => (255, 250, 240),
        "forestgreen" => (34, 139, 34),
        "fuchsia" | "magenta" => (255, 0, 255),
        "gainsboro" => (220, 220, 220),
        "ghostwhite" => (248, 248, 255),
        "gold" => (255, 215, 0),
        "goldenrod" => (218, 165, 32),
        "gray" | "grey" => (128, 128, 128),
        "green" => (0, 128, 0),
        "greenyellow" => (173, 255, 47),
        "honeydew" => (240, 255, 240),
        "hotpink" => (255, 105, 180),
        "indianred" => (205, 92, 92),
        "indigo" => (75, 0, 130),
        "ivory" => (255, 255, 240),
        "khaki" => (240, 230, 140),
        "lavender" => (230, 230, 250),
        "lavenderblush" => (255, 240, 245),
        "lawngreen" => (124, 252, 0),
        "lemonchiffon" => (255, 250, 205),
        "lightblue" => (173, 216, 230),
        "lightcoral" => (240, 128, 128),
        "lightcyan" => (224, 255, 255),
        "lightgoldenrodyellow" => (250, 250, 210),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "lightgreen" => (144, 238, 144),
        "lightpink" => (255, 182, 193),
        "lightsalmon" => (255, 160, 122),
        "lightseagreen" => (32, 178, 170),
        "lightskyblue" => (135, 206, 250),
        "lightslategray" | "lightslategrey" => (119, 136, 153),
        "lightsteelblue" => (176, 196, 222),
        "lightyellow" => (255, 255, 224),
        "lime" => (0, 255, 0),
        "limegreen" => (50, 205, 50),
        "linen" => (250, 240, 230),
        "maroon" => (128, 0, 0),
        "mediumaquamarine" => (102, 205, 170),
        "mediumblue" => (0, 0, 205),
        "mediumorchid" => (186, 85, 211),
        "mediumpurple" => (147, 112, 219),
        "mediumseagreen" => (60, 179, 113),
        "mediumslateblue" => (123, 104, 238),
        "mediumspringgreen" => (0, 250, 154),
        "mediumturquoise" => (72, 209, 204),
        "mediumvioletred" => (199, 21, 133),
        "midnightblue" => (25, 25, 112),
        "mintcream" => (245, 255, 250),
        "mistyrose" => (255, 228, 225),
        "moccasin" => (255, 228, 181),
        "navajowhite" => (255, 222, 173),
        "navy" => (0, 0, 128),
        "oldlace" => (253, 245, 230),
        "olive" => (128, 128, 0),
        "olivedrab" => (107, 142, 35),
        "orange" => (255, 165, 0),
        "orangered" => (255, 69, 0),
        "orchid" => (218, 112, 214),
        "palegoldenrod" => (238, 232, 170),
        "palegreen" => (152, 251, 152),
        "paleturquoise" => (175, 238, 238),
        "palevioletred" => (219, 112, 147),
        "papayawhip" => (255, 239, 213),
        "peachpuff" => (255, 218, 185),
        "peru" => (205, 133, 63),
        "pink" => (255, 192, 203),
        "plum" => (221, 160, 221),
        "powderblue" => (176, 224, 230),
        "purple" => (128, 0, 128),
        "rebeccapurple" => (102, 51, 153),
        "red" => (255, 0, 0),
        "rosybrown" => (188, 143, 143),
        "royalblue" => (65, 105, 225),
        "saddlebrown" => (139, 69, 19),
        "salmon" => (250, 128, 114),
        "sandybrown" => (244, 164, 96),
        "seagreen" => (46, 139, 87),
        "seashell" => (255, 245, 238),
        "sienna" => (160, 82, 45),
        "silver" => (192, 192, 192),
        "skyblue" => (135, 206, 235),
        "slateblue" => (106, 90, 205),
        "slategray" | "slategrey" => (112, 128, 144),
        "snow" => (255, 250, 250),
        "springgreen" => (0, 255, 127),
        "steelblue" => (70, 130, 180),
        "tan" => (210, 180, 140),
        "teal" => (0, 128, 128),
        "thistle" => (216, 191, 216),
        "tomato" => (255, 99, 71),
        "turquoise" => (64, 224, 208),
        "violet" => (238, 130, 238),
        "wheat" => (245, 222, 179),
        "white" => (255, 255, 255),
        "whitesmoke" => (245, 245, 245),
        "yellow" => (255, 255, 0),
        "yellowgreen" => (154, 205, 50),
        _ => return None,
    };
    Some(rgb)
}
