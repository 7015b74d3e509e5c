//! Query functions shared by the live composer and its snapshots.
//!
//! Everything here reads a composition plus a few mode values; the composer
//! and `ComposerData` both delegate to these.

use std::collections::BTreeSet;

use kasane_engine::t13n;
use kasane_engine::{Composition, TransliterationType, Transliterator, TrimMode};

use super::InputFieldType;
use super::numbers::transform_characters_for_numbers;
use crate::config::settings::CharacterFormSettings;

/// Modified kana and the unmodified alternatives a modifier cycle reaches
/// from them. When the composition explicitly ends with the key, the values
/// are removed from the expanded prediction set: typing ざ with the modifier
/// key should not suggest words starting with さ.
const MODIFIER_REMOVAL: &[(&str, &[&str])] = &[
    ("ぁ", &["あ"]),
    ("ぃ", &["い"]),
    ("ぅ", &["う", "ゔ"]),
    ("ゔ", &["う", "ぅ"]),
    ("ぇ", &["え"]),
    ("ぉ", &["お"]),
    ("が", &["か"]),
    ("ぎ", &["き"]),
    ("ぐ", &["く"]),
    ("げ", &["け"]),
    ("ご", &["こ"]),
    ("ざ", &["さ"]),
    ("じ", &["し"]),
    ("ず", &["す"]),
    ("ぜ", &["せ"]),
    ("ぞ", &["そ"]),
    ("だ", &["た"]),
    ("ぢ", &["ち"]),
    ("づ", &["つ", "っ"]),
    ("っ", &["つ", "づ"]),
    ("で", &["て"]),
    ("ど", &["と"]),
    ("ば", &["は", "ぱ"]),
    ("ぱ", &["は", "ば"]),
    ("び", &["ひ", "ぴ"]),
    ("ぴ", &["ひ", "び"]),
    ("ぶ", &["ふ", "ぷ"]),
    ("ぷ", &["ふ", "ぶ"]),
    ("べ", &["へ", "ぺ"]),
    ("ぺ", &["へ", "べ"]),
    ("ぼ", &["ほ", "ぽ"]),
    ("ぽ", &["ほ", "ぼ"]),
    ("ゃ", &["や"]),
    ("ゅ", &["ゆ"]),
    ("ょ", &["よ"]),
    ("ゎ", &["わ"]),
];

fn remove_expanded_for_modifier(asis: &str, base: &str, expanded: &mut BTreeSet<String>) {
    let Some(trailing) = asis.strip_prefix(base) else {
        // An interior chunk resolved differently between the two renderings;
        // nothing to subtract then.
        tracing::warn!("expanded base is not a prefix of the as-is string");
        return;
    };
    for (key, removals) in MODIFIER_REMOVAL {
        if *key == trailing {
            for removal in *removals {
                expanded.remove(*removal);
            }
        }
    }
}

pub(crate) fn string_for_preedit(
    composition: &Composition,
    input_field_type: InputFieldType,
    forms: &CharacterFormSettings,
) -> String {
    let mut output = composition.get_string();
    if let Some(transformed) = transform_characters_for_numbers(&output, forms) {
        output = transformed;
    }
    // Number-like fields want half-width ASCII regardless of the view.
    if input_field_type.prefers_half_ascii() {
        output = t13n::full_width_ascii_to_half_width(&output);
    }
    output
}

pub(crate) fn query_for_conversion(
    composition: &Composition,
    forms: &CharacterFormSettings,
) -> String {
    let mut output = composition.get_string_with_trim_mode(TrimMode::Fix);
    if let Some(transformed) = transform_characters_for_numbers(&output, forms) {
        output = transformed;
    }
    t13n::full_width_ascii_to_half_width(&output)
}

/// Decide between the as-is and trimmed strings for a prediction query.
///
/// In romaji typing a dangling consonant is noise ("もz" predicts as "も"),
/// but a longer latin tail was probably intentional ("もzky" stays). In kana
/// typing the tail is kana and always kept.
fn base_query_for_prediction(asis: String, trimmed: String) -> String {
    let asis_len = asis.chars().count();
    let trimmed_len = trimmed.chars().count();
    if asis_len == trimmed_len {
        return asis;
    }

    let tail: String = asis.chars().skip(trimmed_len).collect();
    if !t13n::is_alphabet_str(&tail) {
        return asis;
    }

    if trimmed.is_empty() {
        return if t13n::is_alphabet_str(&asis) {
            asis
        } else {
            trimmed
        };
    }

    let last_trimmed = trimmed.chars().next_back().unwrap_or('\0');
    if t13n::is_alphabet_char(last_trimmed) {
        asis
    } else {
        trimmed
    }
}

pub(crate) fn query_for_prediction(
    composition: &Composition,
    input_mode: TransliterationType,
    forms: &CharacterFormSettings,
) -> String {
    let asis = composition.get_string_with_trim_mode(TrimMode::Asis);
    match input_mode {
        TransliterationType::HalfAscii => return asis,
        TransliterationType::FullAscii => {
            return t13n::full_width_ascii_to_half_width(&asis);
        }
        _ => {}
    }

    let trimmed = composition.get_string_with_trim_mode(TrimMode::Trim);
    let mut base = base_query_for_prediction(asis, trimmed);
    if let Some(transformed) = transform_characters_for_numbers(&base, forms) {
        base = transformed;
    }
    t13n::full_width_ascii_to_half_width(&base)
}

pub(crate) fn queries_for_prediction(
    composition: &Composition,
    input_mode: TransliterationType,
    forms: &CharacterFormSettings,
) -> (String, BTreeSet<String>) {
    // Latin input modes never expand.
    if matches!(
        input_mode,
        TransliterationType::HalfAscii | TransliterationType::FullAscii
    ) {
        return (
            query_for_prediction(composition, input_mode, forms),
            BTreeSet::new(),
        );
    }

    let (base, mut expanded) = composition.get_expanded_strings();
    // The expansion regenerates modifier-cycle mates; when the user typed
    // the modified character on purpose, those are unwanted.
    let asis = composition.get_string_with_trim_mode(TrimMode::Asis);
    remove_expanded_for_modifier(&asis, &base, &mut expanded);

    (t13n::full_width_ascii_to_half_width(&base), expanded)
}

pub(crate) fn string_for_type_correction(composition: &Composition) -> String {
    composition.get_string_with_trim_mode(TrimMode::Asis)
}

/// Substring of the composition under an internal view; `position` and
/// `size` are LOCAL characters, mapped through the position converter.
pub(crate) fn transliterated_text(
    composition: &Composition,
    view: Transliterator,
    position: usize,
    size: usize,
) -> String {
    let full = composition.get_string_with_transliterator(view);
    let start = composition.convert_position(position, Transliterator::Local, view);
    let end = composition.convert_position(position + size, Transliterator::Local, view);
    full.chars().skip(start).take(end.saturating_sub(start)).collect()
}

pub(crate) fn raw_string(composition: &Composition) -> String {
    raw_sub_string(composition, 0, composition.length())
}

pub(crate) fn raw_sub_string(composition: &Composition, position: usize, size: usize) -> String {
    transliterated_text(composition, Transliterator::Raw, position, size)
}

pub(crate) fn sub_transliteration(
    composition: &Composition,
    mode: TransliterationType,
    position: usize,
    size: usize,
) -> String {
    let view = Transliterator::from_type(mode);
    let text = transliterated_text(composition, view, position, size);
    t13n::transliterate(mode, &text)
}

/// All eleven transliterations of a LOCAL range, in the stable order.
pub(crate) fn sub_transliterations(
    composition: &Composition,
    position: usize,
    size: usize,
) -> Vec<String> {
    TransliterationType::ALL
        .iter()
        .map(|&mode| sub_transliteration(composition, mode, position, size))
        .collect()
}

pub(crate) fn transliterations(composition: &Composition) -> Vec<String> {
    sub_transliterations(composition, 0, composition.length())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasane_engine::{CompositionInput, Table};
    use std::sync::Arc;

    fn typed(keys: &str) -> Composition {
        let mut composition = Composition::new(Arc::clone(Table::shared_default()));
        composition.set_input_transliterator(Transliterator::Hiragana);
        let mut pos = 0;
        for c in keys.chars() {
            pos = composition.insert_input(pos, CompositionInput::from_raw(c.to_string(), false));
        }
        composition
    }

    fn forms() -> CharacterFormSettings {
        CharacterFormSettings::default()
    }

    #[test]
    fn test_prediction_trims_dangling_consonant() {
        // "もz" -> "も": the romaji tail is noise.
        let composition = typed("moz");
        assert_eq!(
            query_for_prediction(&composition, TransliterationType::Hiragana, &forms()),
            "も"
        );
    }

    #[test]
    fn test_prediction_keeps_longer_latin_tail() {
        // "もzq" -> "もzq": probably intentional latin typing.
        let composition = typed("mozq");
        assert_eq!(
            query_for_prediction(&composition, TransliterationType::Hiragana, &forms()),
            "もzq"
        );
    }

    #[test]
    fn test_prediction_keeps_pure_latin() {
        // "z" -> "z"
        let composition = typed("z");
        assert_eq!(
            query_for_prediction(&composition, TransliterationType::Hiragana, &forms()),
            "z"
        );
    }

    #[test]
    fn test_prediction_trims_single_n() {
        let composition = typed("kan");
        assert_eq!(
            query_for_prediction(&composition, TransliterationType::Hiragana, &forms()),
            "か"
        );
        assert_eq!(query_for_conversion(&composition, &forms()), "かん");
    }

    #[test]
    fn test_queries_for_prediction_roman_expansion() {
        let composition = typed("us");
        let (base, expanded) =
            queries_for_prediction(&composition, TransliterationType::Hiragana, &forms());
        assert_eq!(base, "う");
        assert!(expanded.contains("s"));
        assert!(expanded.contains("さ"));
        assert!(expanded.contains("っ"));
    }

    #[test]
    fn test_modifier_removal_on_toggle_table() {
        // A flick-style table where the modifier key cycles さ and ざ.
        let mut table = Table::new();
        table.add_rule("3", "", "さ");
        table.add_rule("さ*", "", "ざ");
        table.add_rule("ざ*", "", "さ");
        let mut composition = Composition::new(Arc::new(table));
        composition.set_input_transliterator(Transliterator::Hiragana);
        let mut pos = 0;
        for key in ["3", "*"] {
            pos = composition.insert_input(pos, CompositionInput::from_raw(key, false));
        }
        assert_eq!(composition.get_string(), "ざ");

        let (base, expanded) =
            queries_for_prediction(&composition, TransliterationType::Hiragana, &forms());
        assert_eq!(base, "");
        assert!(expanded.contains("ざ"));
        // The cycle mate さ was expanded but must be subtracted: ざ was an
        // explicit modifier press.
        assert!(!expanded.contains("さ"));
    }

    #[test]
    fn test_transliterations_vector() {
        let composition = typed("kan");
        let t13ns = transliterations(&composition);
        assert_eq!(t13ns.len(), 11);
        assert_eq!(t13ns[0], "かん"); // hiragana
        assert_eq!(t13ns[1], "カン"); // full katakana
        assert_eq!(t13ns[2], "kan"); // half ascii
        assert_eq!(t13ns[3], "KAN"); // half ascii upper
        assert_eq!(t13ns[4], "kan"); // half ascii lower
        assert_eq!(t13ns[5], "Kan"); // half ascii capitalized
        assert_eq!(t13ns[6], "ｋａｎ"); // full ascii
        assert_eq!(t13ns[7], "ＫＡＮ"); // full ascii upper
        assert_eq!(t13ns[8], "ｋａｎ"); // full ascii lower
        assert_eq!(t13ns[9], "Ｋａｎ"); // full ascii capitalized
        assert_eq!(t13ns[10], "ｶﾝ"); // half katakana
    }

    #[test]
    fn test_raw_sub_string() {
        // [さ|sa][し|shi][み|mi]
        let composition = typed("sashimi");
        assert_eq!(raw_string(&composition), "sashimi");
        assert_eq!(raw_sub_string(&composition, 0, 2), "sashi");
        assert_eq!(raw_sub_string(&composition, 1, 2), "shimi");
    }
}
