//! HTML entity decoding for product titles
//!
//! Stored titles are HTML-escaped (`Tee &amp; Cap`); the export CSV carries
//! the plain text. Every HTML 4.01 named entity is recognised, as are both
//! quote styles and numeric references. Unknown entities are kept verbatim.

/// Longest entity name we look for between `&` and `;`
const MAX_ENTITY_LEN: usize = 10;

/// Latin-1 supplement names, `&nbsp;` (U+00A0) through `&yuml;` (U+00FF) in code point order
const LATIN1: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect",
    "uml", "copy", "ordf", "laquo", "not", "shy", "reg", "macr",
    "deg", "plusmn", "sup2", "sup3", "acute", "micro", "para", "middot",
    "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil",
    "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml",
    "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times",
    "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig",
    "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml",
    "eth", "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide",
    "oslash", "ugrave", "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml",
];

/// The remaining HTML 4.01 entities (special characters and symbols), plus `&apos;`
const NAMED: &[(&str, u32)] = &[
    // markup-significant and special
    ("quot", 34), ("amp", 38), ("apos", 39), ("lt", 60), ("gt", 62),
    ("OElig", 338), ("oelig", 339), ("Scaron", 352), ("scaron", 353), ("Yuml", 376),
    ("circ", 710), ("tilde", 732), ("ensp", 8194), ("emsp", 8195), ("thinsp", 8201),
    ("zwnj", 8204), ("zwj", 8205), ("lrm", 8206), ("rlm", 8207), ("ndash", 8211),
    ("mdash", 8212), ("lsquo", 8216), ("rsquo", 8217), ("sbquo", 8218), ("ldquo", 8220),
    ("rdquo", 8221), ("bdquo", 8222), ("dagger", 8224), ("Dagger", 8225), ("permil", 8240),
    ("lsaquo", 8249), ("rsaquo", 8250), ("euro", 8364),
    // greek
    ("fnof", 402),
    ("Alpha", 913), ("Beta", 914), ("Gamma", 915), ("Delta", 916), ("Epsilon", 917),
    ("Zeta", 918), ("Eta", 919), ("Theta", 920), ("Iota", 921), ("Kappa", 922),
    ("Lambda", 923), ("Mu", 924), ("Nu", 925), ("Xi", 926), ("Omicron", 927),
    ("Pi", 928), ("Rho", 929), ("Sigma", 931), ("Tau", 932), ("Upsilon", 933),
    ("Phi", 934), ("Chi", 935), ("Psi", 936), ("Omega", 937),
    ("alpha", 945), ("beta", 946), ("gamma", 947), ("delta", 948), ("epsilon", 949),
    ("zeta", 950), ("eta", 951), ("theta", 952), ("iota", 953), ("kappa", 954),
    ("lambda", 955), ("mu", 956), ("nu", 957), ("xi", 958), ("omicron", 959),
    ("pi", 960), ("rho", 961), ("sigmaf", 962), ("sigma", 963), ("tau", 964),
    ("upsilon", 965), ("phi", 966), ("chi", 967), ("psi", 968), ("omega", 969),
    ("thetasym", 977), ("upsih", 978), ("piv", 982),
    // punctuation, letterlike, arrows
    ("bull", 8226), ("hellip", 8230), ("prime", 8242), ("Prime", 8243), ("oline", 8254),
    ("frasl", 8260), ("weierp", 8472), ("image", 8465), ("real", 8476), ("trade", 8482),
    ("alefsym", 8501), ("larr", 8592), ("uarr", 8593), ("rarr", 8594), ("darr", 8595),
    ("harr", 8596), ("crarr", 8629), ("lArr", 8656), ("uArr", 8657), ("rArr", 8658),
    ("dArr", 8659), ("hArr", 8660),
    // math
    ("forall", 8704), ("part", 8706), ("exist", 8707), ("empty", 8709), ("nabla", 8711),
    ("isin", 8712), ("notin", 8713), ("ni", 8715), ("prod", 8719), ("sum", 8721),
    ("minus", 8722), ("lowast", 8727), ("radic", 8730), ("prop", 8733), ("infin", 8734),
    ("ang", 8736), ("and", 8743), ("or", 8744), ("cap", 8745), ("cup", 8746),
    ("int", 8747), ("there4", 8756), ("sim", 8764), ("cong", 8773), ("asymp", 8776),
    ("ne", 8800), ("equiv", 8801), ("le", 8804), ("ge", 8805), ("sub", 8834),
    ("sup", 8835), ("nsub", 8836), ("sube", 8838), ("supe", 8839), ("oplus", 8853),
    ("otimes", 8855), ("perp", 8869), ("sdot", 8901), ("lceil", 8968), ("rceil", 8969),
    ("lfloor", 8970), ("rfloor", 8971), ("lang", 9001), ("rang", 9002), ("loz", 9674),
    // suits
    ("spades", 9824), ("clubs", 9827), ("hearts", 9829), ("diams", 9830),
];

fn named_entity(name: &str) -> Option<char> {
    if let Some(offset) = LATIN1.iter().position(|&n| n == name) {
        return char::from_u32(0xA0 + offset as u32);
    }
    NAMED
        .iter()
        .find(|(n, _)| *n == name)
        .and_then(|&(_, code)| char::from_u32(code))
}

fn numeric_entity(body: &str) -> Option<char> {
    let code = if let Some(hex) = body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<u32>().ok()?
    };
    char::from_u32(code).filter(|c| *c != '\0')
}

/// Decode HTML entities in `input`
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let decoded = after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_ENTITY_LEN)
            .and_then(|end| {
                let body = &after[..end];
                let c = match body.strip_prefix('#') {
                    Some(num) => numeric_entity(num),
                    None => named_entity(body),
                };
                c.map(|c| (c, end))
            });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(decode_entities("Classic Tee"), "Classic Tee");
    }

    #[test]
    fn test_named_and_quote_entities() {
        assert_eq!(decode_entities("Tee &amp; Cap"), "Tee & Cap");
        assert_eq!(
            decode_entities("&quot;Night&quot; &#039;24"),
            "\"Night\" '24"
        );
        assert_eq!(decode_entities("a &lt;b&gt;"), "a <b>");
    }

    #[test]
    fn test_accented_currency_and_fraction_entities() {
        assert_eq!(
            decode_entities("Caf&eacute; &euro;5 &frac12; Gr&ouml;&szlig;e"),
            "Café €5 ½ Größe"
        );
        assert_eq!(decode_entities("&pound;&yen;&cent;"), "£¥¢");
        assert_eq!(decode_entities("&Aring;ngstr&ouml;m &AElig;"), "Ångström Æ");
    }

    #[test]
    fn test_latin1_range_bounds() {
        assert_eq!(decode_entities("&nbsp;"), "\u{a0}");
        assert_eq!(decode_entities("&yuml;"), "ÿ");
        assert_eq!(decode_entities("&Yuml;"), "Ÿ");
        assert_eq!(LATIN1.len(), 96);
    }

    #[test]
    fn test_symbol_and_greek_entities() {
        assert_eq!(decode_entities("&Omega; &mu;m &hearts; &trade;"), "Ω μm ♥ ™");
        assert_eq!(decode_entities("&thetasym; &le; &infin;"), "ϑ ≤ ∞");
        assert_eq!(decode_entities("&bdquo;Gut&ldquo;"), "„Gut“");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_entities("&#8211; &#x2019; &#X41;"), "\u{2013} \u{2019} A");
    }

    #[test]
    fn test_unknown_or_broken_entities_kept() {
        assert_eq!(decode_entities("R&D"), "R&D");
        assert_eq!(decode_entities("&bogus; &"), "&bogus; &");
        assert_eq!(decode_entities("&#0;"), "&#0;");
        assert_eq!(decode_entities("&&amp;"), "&&");
    }
}
