// Text normalization for registry fields
// Folds Norwegian letters to the 7-bit repertoire radio displays can show,
// title-cases names, and canonicalizes callsigns for use as join keys.

/// A word character for boundary purposes (mirrors the registries' own
/// convention: letters, digits and underscore; Norwegian letters count).
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Normalize a free-text field from either registry.
///
/// Three steps, applied in order:
/// 1. `Ø` at the start of a word folds to the digit `0` (the official
///    county list writes Østfold as "0stfold"); any other `Ø` folds to `o`.
/// 2. `Æ/æ → A/a`, `Å/å → A/a`, `ø → o`.
/// 3. Every word token is title-cased. Hyphens are token boundaries, so
///    both halves of "ole-jan" come out as "Ole-Jan".
///
/// Idempotent: running the output through again changes nothing.
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Fold pass. The word-start decision looks at the character *before*
    // folding, since Norwegian letters are themselves word characters.
    let mut folded = String::with_capacity(text.len());
    let mut prev_is_word = false;
    for c in text.chars() {
        let mapped = match c {
            'Æ' => 'A',
            'æ' => 'a',
            'Å' => 'A',
            'å' => 'a',
            'ø' => 'o',
            'Ø' => {
                if prev_is_word {
                    'o'
                } else {
                    '0'
                }
            }
            other => other,
        };
        folded.push(mapped);
        prev_is_word = is_word_char(c);
    }

    // Capitalization pass: first character of each word token uppercased,
    // the rest lowercased.
    let mut out = String::with_capacity(folded.len());
    let mut at_word_start = true;
    for c in folded.chars() {
        if is_word_char(c) {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

/// Canonical callsign form: uppercase, with everything outside `[A-Z0-9]`
/// stripped. This is the sole join key between the two registries.
/// Always succeeds, possibly to an empty string.
pub fn format_callsign(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_normalize_title_cases_words() {
        assert_eq!(normalize_text("OSLO"), "Oslo");
        assert_eq!(normalize_text("per olav"), "Per Olav");
        assert_eq!(normalize_text("NORWAY"), "Norway");
    }

    #[test]
    fn test_normalize_hyphenated_names() {
        assert_eq!(normalize_text("ole-jan"), "Ole-Jan");
        assert_eq!(normalize_text("HANSEN-LUND"), "Hansen-Lund");
    }

    #[test]
    fn test_normalize_ae_aa() {
        assert_eq!(normalize_text("blåbær"), "Blabar");
        assert_eq!(normalize_text("ÆRFUGL"), "Arfugl");
        assert_eq!(normalize_text("Håkon"), "Hakon");
    }

    #[test]
    fn test_normalize_o_slash_at_word_start_becomes_zero() {
        assert_eq!(normalize_text("ØSTFOLD"), "0stfold");
        assert_eq!(normalize_text("Ø"), "0");
        // After a hyphen counts as word start too
        assert_eq!(normalize_text("SØR-ØSTERDAL"), "Sor-0sterdal");
    }

    #[test]
    fn test_normalize_o_slash_mid_word_becomes_o() {
        assert_eq!(normalize_text("BØ"), "Bo");
        assert_eq!(normalize_text("bjørn"), "Bjorn");
        assert_eq!(normalize_text("SØRUM"), "Sorum");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "ole-jan",
            "ØSTFOLD",
            "blåbær syltetøy",
            "Per Olav",
            "SØR-ØSTERDAL",
            "already Normal Text",
        ];
        for s in samples {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_format_callsign_strips_and_uppercases() {
        assert_eq!(format_callsign("la1abc-2"), "LA1ABC2");
        assert_eq!(format_callsign(" LB2 xy "), "LB2XY");
        assert_eq!(format_callsign("la1ø"), "LA1");
    }

    #[test]
    fn test_format_callsign_empty() {
        assert_eq!(format_callsign(""), "");
        assert_eq!(format_callsign("-/ ."), "");
    }
}
