// ⚖️ Reconciliation - merge the Norwegian registry into the global one
//
// The Norwegian registry is the better source for names and cities, so its
// values win unconditionally on a callsign match. The county is always
// re-derived from the Norwegian postal code; it is never copied from either
// source's own state field. Country only backfills an empty primary value.

use crate::regions::county_for_postal_code;
use crate::registry::{CallsignMap, PrimaryRecord, RegionalRecord};

/// Merge regional records into the primary map in place.
///
/// For every regional record whose canonical callsign exists in `primary`:
/// - `first_name`, `last_name`, `city` are overwritten unconditionally,
///   even with empty values;
/// - `state` is set to the county derived from the regional postal code
///   (empty when the code is absent or unresolvable, clearing any prior
///   value);
/// - `country` is backfilled from the regional record only when the
///   primary value is empty.
///
/// Regional records with no primary match are dropped; they never create
/// new entries. Primary iteration order is unaffected.
///
/// Returns the number of primary records that were enriched.
pub fn merge(
    primary: &mut CallsignMap<PrimaryRecord>,
    regional: &CallsignMap<RegionalRecord>,
) -> usize {
    let mut matched = 0;

    for (callsign, regional_rec) in regional.iter() {
        if let Some(rec) = primary.get_mut(callsign) {
            rec.first_name = regional_rec.first_name.clone();
            rec.last_name = regional_rec.last_name.clone();
            rec.city = regional_rec.city.clone();

            let postal = regional_rec.postal_code.as_deref().unwrap_or("");
            rec.state = county_for_postal_code(postal).to_string();

            if rec.country.is_empty() {
                rec.country = regional_rec.country.clone();
            }

            matched += 1;
        }
    }

    matched
}

// ============================================================================
// TESTS
// ============================================================================
