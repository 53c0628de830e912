//! Named colors and color strings
//!
//! Names are the standard web color set plus `transparent`. The table is
//! sorted so lookups are a binary search over lowercase names.

/// An 8-bit-per-channel color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a `0xAARRGGBB` value
    pub const fn from_argb(argb: u32) -> Self {
        Self::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8, (argb >> 24) as u8)
    }
}

static NAMED_COLORS: &[(&str, Rgba8)] = &[
    ("aliceblue", Rgba8::new(240, 248, 255, 255)),
    ("antiquewhite", Rgba8::new(250, 235, 215, 255)),
    ("aqua", Rgba8::new(0, 255, 255, 255)),
    ("aquamarine", Rgba8::new(127, 255, 212, 255)),
    ("azure", Rgba8::new(240, 255, 255, 255)),
    ("beige", Rgba8::new(245, 245, 220, 255)),
    ("bisque", Rgba8::new(255, 228, 196, 255)),
    ("black", Rgba8::new(0, 0, 0, 255)),
    ("blanchedalmond", Rgba8::new(255, 235, 205, 255)),
    ("blue", Rgba8::new(0, 0, 255, 255)),
    ("blueviolet", Rgba8::new(138, 43, 226, 255)),
    ("brown", Rgba8::new(165, 42, 42, 255)),
    ("burlywood", Rgba8::new(222, 184, 135, 255)),
    ("cadetblue", Rgba8::new(95, 158, 160, 255)),
    ("chartreuse", Rgba8::new(127, 255, 0, 255)),
    ("chocolate", Rgba8::new(210, 105, 30, 255)),
    ("coral", Rgba8::new(255, 127, 80, 255)),
    ("cornflowerblue", Rgba8::new(100, 149, 237, 255)),
    ("cornsilk", Rgba8::new(255, 248, 220, 255)),
    ("crimson", Rgba8::new(220, 20, 60, 255)),
    ("cyan", Rgba8::new(0, 255, 255, 255)),
    ("darkblue", Rgba8::new(0, 0, 139, 255)),
    ("darkcyan", Rgba8::new(0, 139, 139, 255)),
    ("darkgoldenrod", Rgba8::new(184, 134, 11, 255)),
    ("darkgray", Rgba8::new(169, 169, 169, 255)),
    ("darkgreen", Rgba8::new(0, 100, 0, 255)),
    ("darkkhaki", Rgba8::new(189, 183, 107, 255)),
    ("darkmagenta", Rgba8::new(139, 0, 139, 255)),
    ("darkolivegreen", Rgba8::new(85, 107, 47, 255)),
    ("darkorange", Rgba8::new(255, 140, 0, 255)),
    ("darkorchid", Rgba8::new(153, 50, 204, 255)),
    ("darkred", Rgba8::new(139, 0, 0, 255)),
    ("darksalmon", Rgba8::new(233, 150, 122, 255)),
    ("darkseagreen", Rgba8::new(143, 188, 139, 255)),
    ("darkslateblue", Rgba8::new(72, 61, 139, 255)),
    ("darkslategray", Rgba8::new(47, 79, 79, 255)),
    ("darkturquoise", Rgba8::new(0, 206, 209, 255)),
    ("darkviolet", Rgba8::new(148, 0, 211, 255)),
    ("deeppink", Rgba8::new(255, 20, 147, 255)),
    ("deepskyblue", Rgba8::new(0, 191, 255, 255)),
    ("dimgray", Rgba8::new(105, 105, 105, 255)),
    ("dodgerblue", Rgba8::new(30, 144, 255, 255)),
    ("firebrick", Rgba8::new(178, 34, 34, 255)),
    ("floralwhite", Rgba8::new(255, 250, 240, 255)),
    ("forestgreen", Rgba8::new(34, 139, 34, 255)),
    ("fuchsia", Rgba8::new(255, 0, 255, 255)),
    ("gainsboro", Rgba8::new(220, 220, 220, 255)),
    ("ghostwhite", Rgba8::new(248, 248, 255, 255)),
    ("gold", Rgba8::new(255, 215, 0, 255)),
    ("goldenrod", Rgba8::new(218, 165, 32, 255)),
    ("gray", Rgba8::new(128, 128, 128, 255)),
    ("green", Rgba8::new(0, 128, 0, 255)),
    ("greenyellow", Rgba8::new(173, 255, 47, 255)),
    ("honeydew", Rgba8::new(240, 255, 240, 255)),
    ("hotpink", Rgba8::new(255, 105, 180, 255)),
    ("indianred", Rgba8::new(205, 92, 92, 255)),
    ("indigo", Rgba8::new(75, 0, 130, 255)),
    ("ivory", Rgba8::new(255, 255, 240, 255)),
    ("khaki", Rgba8::new(240, 230, 140, 255)),
    ("lavender", Rgba8::new(230, 230, 250, 255)),
    ("lavenderblush", Rgba8::new(255, 240, 245, 255)),
    ("lawngreen", Rgba8::new(124, 252, 0, 255)),
    ("lemonchiffon", Rgba8::new(255, 250, 205, 255)),
    ("lightblue", Rgba8::new(173, 216, 230, 255)),
    ("lightcoral", Rgba8::new(240, 128, 128, 255)),
    ("lightcyan", Rgba8::new(224, 255, 255, 255)),
    ("lightgoldenrodyellow", Rgba8::new(250, 250, 210, 255)),
    ("lightgray", Rgba8::new(211, 211, 211, 255)),
    ("lightgreen", Rgba8::new(144, 238, 144, 255)),
    ("lightpink", Rgba8::new(255, 182, 193, 255)),
    ("lightsalmon", Rgba8::new(255, 160, 122, 255)),
    ("lightseagreen", Rgba8::new(32, 178, 170, 255)),
    ("lightskyblue", Rgba8::new(135, 206, 250, 255)),
    ("lightslategray", Rgba8::new(119, 136, 153, 255)),
    ("lightsteelblue", Rgba8::new(176, 196, 222, 255)),
    ("lightyellow", Rgba8::new(255, 255, 224, 255)),
    ("lime", Rgba8::new(0, 255, 0, 255)),
    ("limegreen", Rgba8::new(50, 205, 50, 255)),
    ("linen", Rgba8::new(250, 240, 230, 255)),
    ("magenta", Rgba8::new(255, 0, 255, 255)),
    ("maroon", Rgba8::new(128, 0, 0, 255)),
    ("mediumaquamarine", Rgba8::new(102, 205, 170, 255)),
    ("mediumblue", Rgba8::new(0, 0, 205, 255)),
    ("mediumorchid", Rgba8::new(186, 85, 211, 255)),
    ("mediumpurple", Rgba8::new(147, 112, 219, 255)),
    ("mediumseagreen", Rgba8::new(60, 179, 113, 255)),
    ("mediumslateblue", Rgba8::new(123, 104, 238, 255)),
    ("mediumspringgreen", Rgba8::new(0, 250, 154, 255)),
    ("mediumturquoise", Rgba8::new(72, 209, 204, 255)),
    ("mediumvioletred", Rgba8::new(199, 21, 133, 255)),
    ("midnightblue", Rgba8::new(25, 25, 112, 255)),
    ("mintcream", Rgba8::new(245, 255, 250, 255)),
    ("mistyrose", Rgba8::new(255, 228, 225, 255)),
    ("moccasin", Rgba8::new(255, 228, 181, 255)),
    ("navajowhite", Rgba8::new(255, 222, 173, 255)),
    ("navy", Rgba8::new(0, 0, 128, 255)),
    ("oldlace", Rgba8::new(253, 245, 230, 255)),
    ("olive", Rgba8::new(128, 128, 0, 255)),
    ("olivedrab", Rgba8::new(107, 142, 35, 255)),
    ("orange", Rgba8::new(255, 165, 0, 255)),
    ("orangered", Rgba8::new(255, 69, 0, 255)),
    ("orchid", Rgba8::new(218, 112, 214, 255)),
    ("palegoldenrod", Rgba8::new(238, 232, 170, 255)),
    ("palegreen", Rgba8::new(152, 251, 152, 255)),
    ("paleturquoise", Rgba8::new(175, 238, 238, 255)),
    ("palevioletred", Rgba8::new(219, 112, 147, 255)),
    ("papayawhip", Rgba8::new(255, 239, 213, 255)),
    ("peachpuff", Rgba8::new(255, 218, 185, 255)),
    ("peru", Rgba8::new(205, 133, 63, 255)),
    ("pink", Rgba8::new(255, 192, 203, 255)),
    ("plum", Rgba8::new(221, 160, 221, 255)),
    ("powderblue", Rgba8::new(176, 224, 230, 255)),
    ("purple", Rgba8::new(128, 0, 128, 255)),
    ("rebeccapurple", Rgba8::new(102, 51, 153, 255)),
    ("red", Rgba8::new(255, 0, 0, 255)),
    ("rosybrown", Rgba8::new(188, 143, 143, 255)),
    ("royalblue", Rgba8::new(65, 105, 225, 255)),
    ("saddlebrown", Rgba8::new(139, 69, 19, 255)),
    ("salmon", Rgba8::new(250, 128, 114, 255)),
    ("sandybrown", Rgba8::new(244, 164, 96, 255)),
    ("seagreen", Rgba8::new(46, 139, 87, 255)),
    ("seashell", Rgba8::new(255, 245, 238, 255)),
    ("sienna", Rgba8::new(160, 82, 45, 255)),
    ("silver", Rgba8::new(192, 192, 192, 255)),
    ("skyblue", Rgba8::new(135, 206, 235, 255)),
    ("slateblue", Rgba8::new(106, 90, 205, 255)),
    ("slategray", Rgba8::new(112, 128, 144, 255)),
    ("snow", Rgba8::new(255, 250, 250, 255)),
    ("springgreen", Rgba8::new(0, 255, 127, 255)),
    ("steelblue", Rgba8::new(70, 130, 180, 255)),
    ("tan", Rgba8::new(210, 180, 140, 255)),
    ("teal", Rgba8::new(0, 128, 128, 255)),
    ("thistle", Rgba8::new(216, 191, 216, 255)),
    ("tomato", Rgba8::new(255, 99, 71, 255)),
    ("transparent", Rgba8::new(255, 255, 255, 0)),
    ("turquoise", Rgba8::new(64, 224, 208, 255)),
    ("violet", Rgba8::new(238, 130, 238, 255)),
    ("wheat", Rgba8::new(245, 222, 179, 255)),
    ("white", Rgba8::new(255, 255, 255, 255)),
    ("whitesmoke", Rgba8::new(245, 245, 245, 255)),
    ("yellow", Rgba8::new(255, 255, 0, 255)),
    ("yellowgreen", Rgba8::new(154, 205, 50, 255)),
];

/// Look up a named color, ignoring ASCII case
pub fn named_color(name: &str) -> Option<Rgba8> {
    let key = name.to_ascii_lowercase();
    NAMED_COLORS
        .binary_search_by(|(n, _)| (*n).cmp(key.as_str()))
        .ok()
        .map(|i| NAMED_COLORS[i].1)
}

/// Parse a color name, `RRGGBB` or `AARRGGBB` (with or without `#`)
pub fn parse_color(value: &str) -> Option<Rgba8> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(c) = named_color(value) {
        return Some(c);
    }

    let hex = value.strip_prefix('#').unwrap_or(value);
    if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let ival = u32::from_str_radix(hex, 16).ok()?;
    Some(Rgba8::from_argb(if hex.len() == 6 { 0xff00_0000 | ival } else { ival }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_named_lookup_ignores_case() {
        assert_eq!(parse_color("CornflowerBlue"), Some(Rgba8::new(100, 149, 237, 255)));
        assert_eq!(parse_color("WHITE"), Some(Rgba8::new(255, 255, 255, 255)));
        assert_eq!(parse_color("transparent").map(|c| c.a), Some(0));
    }

    #[test]
    fn test_hex() {
        assert_eq!(parse_color("#ff8000"), Some(Rgba8::new(255, 128, 0, 255)));
        assert_eq!(parse_color("80ff8000"), Some(Rgba8::new(255, 128, 0, 128)));
    }

    #[test]
    fn test_rejects() {
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#+12345"), None);
        assert_eq!(parse_color("notacolor"), None);
    }
}
