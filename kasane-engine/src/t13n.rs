//! Transliteration primitives: script conversion between hiragana, katakana,
//! half-width katakana and the ASCII width/case variants.
//!
//! Two enums live here. [`TransliterationType`] is the public, user-facing
//! selection (eleven entries, stable order). [`Transliterator`] is the
//! internal per-chunk view selector; several `TransliterationType`s share one
//! `Transliterator` and differ only in a final case transform.

/// User-facing transliteration selection.
///
/// The order of the variants is part of the public contract: the
/// transliteration vector returned for a composition enumerates all eleven
/// entries in exactly this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransliterationType {
    /// "ひらがな"
    Hiragana,
    /// "カタカナ"
    FullKatakana,
    /// "ascII"
    HalfAscii,
    /// "ASCII"
    HalfAsciiUpper,
    /// "ascii"
    HalfAsciiLower,
    /// "Ascii"
    HalfAsciiCapitalized,
    /// "ａｓｃＩＩ"
    FullAscii,
    /// "ＡＳＣＩＩ"
    FullAsciiUpper,
    /// "ａｓｃｉｉ"
    FullAsciiLower,
    /// "Ａｓｃｉｉ"
    FullAsciiCapitalized,
    /// "ｶﾀｶﾅ"
    HalfKatakana,
}

impl TransliterationType {
    /// All transliteration types in the stable enumeration order.
    pub const ALL: [TransliterationType; 11] = [
        TransliterationType::Hiragana,
        TransliterationType::FullKatakana,
        TransliterationType::HalfAscii,
        TransliterationType::HalfAsciiUpper,
        TransliterationType::HalfAsciiLower,
        TransliterationType::HalfAsciiCapitalized,
        TransliterationType::FullAscii,
        TransliterationType::FullAsciiUpper,
        TransliterationType::FullAsciiLower,
        TransliterationType::FullAsciiCapitalized,
        TransliterationType::HalfKatakana,
    ];

    /// True for all four half-width ASCII variants.
    pub fn is_half_ascii(self) -> bool {
        matches!(
            self,
            TransliterationType::HalfAscii
                | TransliterationType::HalfAsciiUpper
                | TransliterationType::HalfAsciiLower
                | TransliterationType::HalfAsciiCapitalized
        )
    }

    /// True for all four full-width ASCII variants.
    pub fn is_full_ascii(self) -> bool {
        matches!(
            self,
            TransliterationType::FullAscii
                | TransliterationType::FullAsciiUpper
                | TransliterationType::FullAsciiLower
                | TransliterationType::FullAsciiCapitalized
        )
    }
}

/// Internal per-chunk view selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transliterator {
    /// Each chunk displays under its own selector.
    Local,
    /// The already-converted text, pending kept verbatim.
    Conversion,
    /// The user's raw typing.
    Raw,
    /// Converted text as hiragana (identity for kana tables).
    Hiragana,
    /// Converted text as full-width katakana.
    FullKatakana,
    /// Converted text as half-width katakana.
    HalfKatakana,
    /// Raw typing as half-width ASCII.
    HalfAscii,
    /// Raw typing as full-width ASCII.
    FullAscii,
}

impl Transliterator {
    /// The chunk-level view backing a user-facing transliteration type.
    /// Case variants collapse onto their base width view.
    pub fn from_type(mode: TransliterationType) -> Transliterator {
        match mode {
            TransliterationType::Hiragana => Transliterator::Hiragana,
            TransliterationType::FullKatakana => Transliterator::FullKatakana,
            TransliterationType::HalfKatakana => Transliterator::HalfKatakana,
            m if m.is_half_ascii() => Transliterator::HalfAscii,
            _ => Transliterator::FullAscii,
        }
    }

    /// Inverse of [`Transliterator::from_type`] for the base views; selectors
    /// without a user-facing equivalent report `default_type`.
    pub fn to_type(self, default_type: TransliterationType) -> TransliterationType {
        match self {
            Transliterator::Hiragana => TransliterationType::Hiragana,
            Transliterator::FullKatakana => TransliterationType::FullKatakana,
            Transliterator::HalfKatakana => TransliterationType::HalfKatakana,
            Transliterator::HalfAscii => TransliterationType::HalfAscii,
            Transliterator::FullAscii => TransliterationType::FullAscii,
            _ => default_type,
        }
    }
}

/// The hiragana block ぁ..ゖ and the katakana block ァ..ヶ run in parallel,
/// this many code points apart.
const KANA_BLOCK_GAP: i32 = 0x60;

fn shift_kana_block(c: char, block: std::ops::RangeInclusive<char>, delta: i32) -> char {
    if !block.contains(&c) {
        return c;
    }
    char::from_u32((c as u32).wrapping_add_signed(delta)).unwrap_or(c)
}

/// Convert hiragana to katakana; anything outside the kana block passes
/// through.
pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars()
        .map(|c| shift_kana_block(c, 'ぁ'..='ゖ', KANA_BLOCK_GAP))
        .collect()
}

/// Convert katakana to hiragana.
pub fn katakana_to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| shift_kana_block(c, 'ァ'..='ヶ', -KANA_BLOCK_GAP))
        .collect()
}

/// Convert full-width ASCII (U+FF01..=U+FF5E) and the ideographic space to
/// their half-width counterparts. Other characters pass through.
pub fn full_width_ascii_to_half_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect()
}

/// Convert half-width ASCII (U+0021..=U+007E) and the space to their
/// full-width counterparts. Other characters pass through.
pub fn half_width_ascii_to_full_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0021}'..='\u{007E}' => char::from_u32(c as u32 + 0xFEE0).unwrap_or(c),
            ' ' => '\u{3000}',
            _ => c,
        })
        .collect()
}

/// Half-width form of one full-width katakana character, if it has one.
/// Voiced and semi-voiced characters decompose into base + mark.
fn half_width_katakana(c: char) -> Option<&'static str> {
    let s = match c {
        'ア' => "ｱ", 'イ' => "ｲ", 'ウ' => "ｳ", 'エ' => "ｴ", 'オ' => "ｵ",
        'カ' => "ｶ", 'キ' => "ｷ", 'ク' => "ｸ", 'ケ' => "ｹ", 'コ' => "ｺ",
        'サ' => "ｻ", 'シ' => "ｼ", 'ス' => "ｽ", 'セ' => "ｾ", 'ソ' => "ｿ",
        'タ' => "ﾀ", 'チ' => "ﾁ", 'ツ' => "ﾂ", 'テ' => "ﾃ", 'ト' => "ﾄ",
        'ナ' => "ﾅ", 'ニ' => "ﾆ", 'ヌ' => "ﾇ", 'ネ' => "ﾈ", 'ノ' => "ﾉ",
        'ハ' => "ﾊ", 'ヒ' => "ﾋ", 'フ' => "ﾌ", 'ヘ' => "ﾍ", 'ホ' => "ﾎ",
        'マ' => "ﾏ", 'ミ' => "ﾐ", 'ム' => "ﾑ", 'メ' => "ﾒ", 'モ' => "ﾓ",
        'ヤ' => "ﾔ", 'ユ' => "ﾕ", 'ヨ' => "ﾖ",
        'ラ' => "ﾗ", 'リ' => "ﾘ", 'ル' => "ﾙ", 'レ' => "ﾚ", 'ロ' => "ﾛ",
        'ワ' => "ﾜ", 'ヲ' => "ｦ", 'ン' => "ﾝ",
        'ァ' => "ｧ", 'ィ' => "ｨ", 'ゥ' => "ｩ", 'ェ' => "ｪ", 'ォ' => "ｫ",
        'ャ' => "ｬ", 'ュ' => "ｭ", 'ョ' => "ｮ", 'ッ' => "ｯ",
        'ガ' => "ｶﾞ", 'ギ' => "ｷﾞ", 'グ' => "ｸﾞ", 'ゲ' => "ｹﾞ", 'ゴ' => "ｺﾞ",
        'ザ' => "ｻﾞ", 'ジ' => "ｼﾞ", 'ズ' => "ｽﾞ", 'ゼ' => "ｾﾞ", 'ゾ' => "ｿﾞ",
        'ダ' => "ﾀﾞ", 'ヂ' => "ﾁﾞ", 'ヅ' => "ﾂﾞ", 'デ' => "ﾃﾞ", 'ド' => "ﾄﾞ",
        'バ' => "ﾊﾞ", 'ビ' => "ﾋﾞ", 'ブ' => "ﾌﾞ", 'ベ' => "ﾍﾞ", 'ボ' => "ﾎﾞ",
        'パ' => "ﾊﾟ", 'ピ' => "ﾋﾟ", 'プ' => "ﾌﾟ", 'ペ' => "ﾍﾟ", 'ポ' => "ﾎﾟ",
        'ヴ' => "ｳﾞ",
        'ー' => "ｰ", '、' => "､", '。' => "｡", '「' => "｢", '」' => "｣",
        '・' => "･", '゛' => "ﾞ", '゜' => "ﾟ",
        _ => return None,
    };
    Some(s)
}

/// Convert full-width katakana (and Japanese punctuation) to half-width
/// katakana. Full-width ASCII is also narrowed so that mixed text stays
/// uniformly half width.
pub fn full_width_to_half_width(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in full_width_ascii_to_half_width(text).chars() {
        match half_width_katakana(c) {
            Some(h) => out.push_str(h),
            None => out.push(c),
        }
    }
    out
}

/// Convert hiragana to half-width katakana.
pub fn hiragana_to_half_width_katakana(text: &str) -> String {
    full_width_to_half_width(&hiragana_to_katakana(text))
}

fn upper_char(c: char) -> char {
    match c {
        'a'..='z' => c.to_ascii_uppercase(),
        'ａ'..='ｚ' => char::from_u32(c as u32 - 0x20).unwrap_or(c),
        _ => c,
    }
}

fn lower_char(c: char) -> char {
    match c {
        'A'..='Z' => c.to_ascii_lowercase(),
        'Ａ'..='Ｚ' => char::from_u32(c as u32 + 0x20).unwrap_or(c),
        _ => c,
    }
}

/// Uppercase ASCII letters of either width.
pub fn to_upper(text: &str) -> String {
    text.chars().map(upper_char).collect()
}

/// Lowercase ASCII letters of either width.
pub fn to_lower(text: &str) -> String {
    text.chars().map(lower_char).collect()
}

/// Uppercase the first character, lowercase the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(text.len());
            out.push(upper_char(first));
            out.extend(chars.map(lower_char));
            out
        }
        None => String::new(),
    }
}

/// Final per-type transform applied on top of the chunk-level view to produce
/// one entry of the transliteration vector.
pub fn transliterate(mode: TransliterationType, input: &str) -> String {
    match mode {
        // Full-width ASCII mixed into the text is narrowed together with
        // the katakana.
        TransliterationType::HalfKatakana => {
            full_width_to_half_width(&hiragana_to_katakana(input))
        }
        TransliterationType::HalfAscii => full_width_ascii_to_half_width(input),
        TransliterationType::HalfAsciiUpper => to_upper(&full_width_ascii_to_half_width(input)),
        TransliterationType::HalfAsciiLower => to_lower(&full_width_ascii_to_half_width(input)),
        TransliterationType::HalfAsciiCapitalized => {
            capitalize(&full_width_ascii_to_half_width(input))
        }
        TransliterationType::FullAscii => half_width_ascii_to_full_width(input),
        TransliterationType::FullAsciiUpper => to_upper(&half_width_ascii_to_full_width(input)),
        TransliterationType::FullAsciiLower => to_lower(&half_width_ascii_to_full_width(input)),
        TransliterationType::FullAsciiCapitalized => {
            capitalize(&half_width_ascii_to_full_width(input))
        }
        TransliterationType::FullKatakana => hiragana_to_katakana(input),
        TransliterationType::Hiragana => input.to_string(),
    }
}

/// True for ASCII and full-width ASCII letters.
pub fn is_alphabet_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, 'ａ'..='ｚ' | 'Ａ'..='Ｚ')
}

/// True for ASCII and full-width digits.
pub fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '０'..='９')
}

/// True when the string is non-empty and consists solely of alphabet
/// characters (either width).
pub fn is_alphabet_str(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_alphabet_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hiragana_to_katakana() {
        assert_eq!(hiragana_to_katakana("あいうえお"), "アイウエオ");
        assert_eq!(hiragana_to_katakana("きゃきゅきょ"), "キャキュキョ");
        assert_eq!(hiragana_to_katakana("ぱぴぷぺぽ"), "パピプペポ");

        // Mixed with non-hiragana should pass through
        assert_eq!(hiragana_to_katakana("abc123"), "abc123");
        assert_eq!(hiragana_to_katakana("あいうabc"), "アイウabc");
    }

    #[test]
    fn test_katakana_round_trip() {
        let original = "こんにちは";
        assert_eq!(katakana_to_hiragana(&hiragana_to_katakana(original)), original);
    }

    #[test]
    fn test_ascii_width() {
        assert_eq!(full_width_ascii_to_half_width("Ａｂｃ１２３！"), "Abc123!");
        assert_eq!(half_width_ascii_to_full_width("Abc123!"), "Ａｂｃ１２３！");
        // Kana is untouched by width conversion of ASCII
        assert_eq!(full_width_ascii_to_half_width("あア"), "あア");
    }

    #[test]
    fn test_half_width_katakana() {
        assert_eq!(hiragana_to_half_width_katakana("かたかな"), "ｶﾀｶﾅ");
        // Voiced characters decompose into two code points
        assert_eq!(hiragana_to_half_width_katakana("がぎぐ"), "ｶﾞｷﾞｸﾞ");
        assert_eq!(hiragana_to_half_width_katakana("ぱーく"), "ﾊﾟｰｸ");
    }

    #[test]
    fn test_case_transforms() {
        assert_eq!(to_upper("ascII"), "ASCII");
        assert_eq!(to_lower("ascII"), "ascii");
        assert_eq!(capitalize("ascII"), "Ascii");
        // Full-width letters are cased too
        assert_eq!(to_upper("ａｓｃＩＩ"), "ＡＳＣＩＩ");
        assert_eq!(capitalize("ａｓｃＩＩ"), "Ａｓｃｉｉ");
    }

    #[test]
    fn test_transliterate_vector_samples() {
        assert_eq!(transliterate(TransliterationType::FullKatakana, "かな"), "カナ");
        assert_eq!(transliterate(TransliterationType::HalfKatakana, "かな"), "ｶﾅ");
        assert_eq!(transliterate(TransliterationType::HalfAsciiUpper, "ka"), "KA");
        assert_eq!(transliterate(TransliterationType::FullAscii, "ka"), "ｋａ");
        assert_eq!(
            transliterate(TransliterationType::FullAsciiCapitalized, "ka"),
            "Ｋａ"
        );
        assert_eq!(transliterate(TransliterationType::Hiragana, "かな"), "かな");
    }

    #[test]
    fn test_script_helpers() {
        assert!(is_alphabet_str("abc"));
        assert!(is_alphabet_str("ａｂｃ"));
        assert!(!is_alphabet_str("ab1"));
        assert!(!is_alphabet_str(""));
        assert!(is_number_char('５'));
        assert!(!is_number_char('ー'));
    }
}
