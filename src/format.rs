// Display-field formatting for radio screens
//
// Radio firmware shows at most 16 characters of name and 15 of city.
// Names are composed from first/middle/last with fallback tiers rather
// than clipped blindly; cities are clipped blindly.

/// Display width available for the contact name.
pub const NAME_MAX_LEN: usize = 16;

/// Display width available for the city.
pub const CITY_MAX_LEN: usize = 15;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Compose a display name within `max_length` characters.
///
/// The first name is split on whitespace and hyphens into a primary token
/// plus an optional middle token. The primary token is always kept whole.
/// The middle token is included in full if the whole composition fits,
/// else as a single initial if that fits, else dropped. The last name then
/// takes whatever room is left and may be cut mid-word.
///
/// The assembled prefix is never clipped, so a first name longer than
/// `max_length` comes through whole; only the last-name slice shrinks.
/// Lengths are counted in characters, not bytes.
pub fn format_name(first_name: &str, last_name: &str, max_length: usize) -> String {
    let parts: Vec<&str> = first_name
        .split(|c: char| c.is_whitespace() || c == '-')
        .collect();
    let primary = parts.first().map(|p| p.trim()).unwrap_or("");
    let middle = parts.get(1).copied().unwrap_or("");

    let last_len = char_len(last_name);
    let mut name = primary.to_string();

    if !middle.is_empty() {
        let middle_len = char_len(middle);
        let initial: String = middle.chars().take(1).collect();

        if char_len(&name) + 1 + middle_len + last_len + 1 <= max_length {
            // Full middle token fits alongside the full last name
            name.push(' ');
            name.push_str(middle);
        } else if char_len(&name) + 2 + last_len + 1 <= max_length {
            // Fall back to the middle initial
            name.push(' ');
            name.push_str(&initial);
        }
        // Otherwise no middle element at all
    }

    // As much of the last name as the remaining room allows
    let remaining = max_length as isize - char_len(&name) as isize - 1;
    if remaining > 0 {
        name.push(' ');
        name.extend(last_name.chars().take(remaining as usize));
    }

    name.trim().to_string()
}

/// Hard character-count truncation, no word-boundary awareness.
pub fn format_city(city: &str, max_length: usize) -> String {
    city.chars().take(max_length).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_middle_falls_back_to_initial() {
        // "Ole Kristian Bjornstad" is 22 chars; the initial tier fits
        let name = format_name("Ole Kristian", "Bjornstad", 16);
        assert_eq!(name, "Ole K Bjornstad");
        assert!(char_len(&name) <= 16);
    }

    #[test]
    fn test_name_full_middle_when_it_fits() {
        assert_eq!(format_name("Ole Kristian", "Bo", 16), "Ole Kristian Bo");
    }

    #[test]
    fn test_name_single_char_middle_token() {
        assert_eq!(format_name("Ole K", "Bjornstad", 16), "Ole K Bjornstad");
    }

    #[test]
    fn test_name_last_name_cut_mid_word() {
        assert_eq!(format_name("Per", "Kristoffersen", 16), "Per Kristofferse");
    }

    #[test]
    fn test_name_hyphenated_first_name_splits() {
        assert_eq!(format_name("Ole-Jan", "Hansen", 16), "Ole Jan Hansen");
    }

    #[test]
    fn test_name_middle_dropped_when_even_initial_does_not_fit() {
        // primary (11) + initial (2) + last (4) + 1 = 18 > 16
        let name = format_name("Maximiliane Theodora", "Berg", 16);
        assert_eq!(name, "Maximiliane Berg");
    }

    #[test]
    fn test_name_oversized_first_name_passes_through() {
        // The prefix is never clipped; no last-name slice is appended
        let name = format_name("Maximiliantheodor", "Olsen", 16);
        assert_eq!(name, "Maximiliantheodor");
        assert!(char_len(&name) > 16);
        assert!(!name.contains("Olsen"));
    }

    #[test]
    fn test_name_empty_inputs() {
        assert_eq!(format_name("", "Hansen", 16), "Hansen");
        assert_eq!(format_name("Ole Kristian", "", 16), "Ole Kristian");
        assert_eq!(format_name("", "", 16), "");
    }

    #[test]
    fn test_city_hard_truncation() {
        assert_eq!(format_city("Kristiansand", CITY_MAX_LEN), "Kristiansand");
        assert_eq!(
            format_city("Longyearbyen Spitsbergen", CITY_MAX_LEN),
            "Longyearbyen Sp"
        );
        assert_eq!(format_city("", CITY_MAX_LEN), "");
    }
}
