// Language intake: glottocode backfill from the language catalog.

use crate::catalogs::Glottolog;
use crate::models::Language;

/// Fill a missing glottocode from the catalog's ISO 639-3 mapping.
///
/// Descriptors with an explicit glottocode pass through unchanged, and a
/// descriptor whose ISO code has no catalog entry keeps its empty glottocode.
pub fn with_glottocode_backfilled(mut language: Language, glottolog: &Glottolog) -> Language {
    if language.glottocode.is_none() {
        if let Some(iso) = language.iso639p3code.as_deref() {
            language.glottocode = glottolog.glottocode_for_iso(iso).map(str::to_string);
            if let Some(glottocode) = language.glottocode.as_deref() {
                tracing::debug!(iso, glottocode, "glottocode filled from catalog");
            }
        }
    }
    language
}
