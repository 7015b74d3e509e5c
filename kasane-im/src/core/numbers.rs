//! Number-context canonicalisation of Japanese punctuation.
//!
//! In text that mixes alphanumerics with `ー`, `、` or `。`, those symbols
//! were almost certainly meant as minus, comma and period. The transform
//! rewrites them in place, one character for one character.

use kasane_engine::t13n;

use crate::config::settings::{CharacterForm, CharacterFormSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    /// Alphabet characters or math-like symbols
    Alphabet,
    /// 0-9 and ０-９
    Number,
    /// ー
    JaHyphen,
    /// 、
    JaComma,
    /// 。
    JaPeriod,
    Other,
}

fn classify(c: char) -> Script {
    match c {
        'ー' => Script::JaHyphen,
        '、' => Script::JaComma,
        '。' => Script::JaPeriod,
        '+' | '*' | '/' | '=' | '(' | ')' | '<' | '>' | '＋' | '＊' | '／' | '＝' | '（'
        | '）' | '＜' | '＞' => Script::Alphabet,
        _ if t13n::is_number_char(c) => Script::Number,
        _ if t13n::is_alphabet_char(c) => Script::Alphabet,
        _ => Script::Other,
    }
}

fn is_alphanumeric(script: Script) -> bool {
    matches!(script, Script::Alphabet | Script::Number)
}

/// Render a canonical symbol in the preferred width.
fn preferred_form(symbol: char, forms: &CharacterFormSettings) -> char {
    match forms.symbols {
        CharacterForm::FullWidth => symbol,
        CharacterForm::HalfWidth => match symbol {
            '−' => '-',
            '，' => ',',
            '．' => '.',
            _ => symbol,
        },
    }
}

/// Rewrite number-context punctuation. Returns the transformed string, or
/// `None` when nothing changed. The character count is always preserved.
pub fn transform_characters_for_numbers(
    query: &str,
    forms: &CharacterFormSettings,
) -> Option<String> {
    let chars: Vec<char> = query.chars().collect();
    let scripts: Vec<Script> = chars.iter().map(|&c| classify(c)).collect();

    let has_symbols = scripts
        .iter()
        .any(|s| matches!(s, Script::JaHyphen | Script::JaComma | Script::JaPeriod));
    let has_alphanumerics = scripts.iter().any(|s| is_alphanumeric(*s));
    if !has_symbols || !has_alphanumerics {
        return None;
    }

    let mut transformed = String::with_capacity(query.len());
    let mut changed = false;
    for (i, &c) in chars.iter().enumerate() {
        let replacement = match scripts[i] {
            Script::JaHyphen => {
                // A run of ー becomes minus signs when anchored by an
                // alphanumeric on the left, or when a single leading ー is
                // followed by a number.
                let anchored = if i == 0 {
                    chars.len() > 1 && scripts[1] == Script::Number
                } else {
                    let mut j = i;
                    loop {
                        if j == 0 {
                            break false;
                        }
                        if scripts[j - 1] == Script::JaHyphen {
                            j -= 1;
                            continue;
                        }
                        break is_alphanumeric(scripts[j - 1]);
                    }
                };
                anchored.then(|| preferred_form('−', forms))
            }
            Script::JaComma => (i > 0 && is_alphanumeric(scripts[i - 1]))
                .then(|| preferred_form('，', forms)),
            Script::JaPeriod => (i > 0 && is_alphanumeric(scripts[i - 1]))
                .then(|| preferred_form('．', forms)),
            _ => None,
        };
        match replacement {
            Some(r) => {
                transformed.push(r);
                changed = true;
            }
            None => transformed.push(c),
        }
    }

    if changed {
        debug_assert_eq!(query.chars().count(), transformed.chars().count());
        Some(transformed)
    } else {
        None
    }
}
