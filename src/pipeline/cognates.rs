// Cognacy judgement intake: defaulting the form link and the identifier.

use crate::models::{Cognate, Lexeme, RawCognate};
use crate::store::IdSequence;

/// How a judgement was reached unless the caller says otherwise.
pub const DEFAULT_DETECTION_METHOD: &str = "expert";

/// Fill a judgement's defaults: the form link from the lexeme it is attached
/// to, the identifier from the counter, the detection method from
/// [`DEFAULT_DETECTION_METHOD`]. Explicit values always win, and an explicit
/// identifier does not advance the counter.
pub fn build_cognate(lexeme: Option<&Lexeme>, raw: RawCognate, ids: &mut IdSequence) -> Cognate {
    let form_id = raw
        .form_id
        .or_else(|| lexeme.map(|l| l.id.clone()));
    let form = raw.form.or_else(|| lexeme.map(|l| l.form.clone()));

    Cognate {
        id: raw.id.unwrap_or_else(|| ids.next_cognate_id()),
        form_id,
        form,
        cognateset_id: raw.cognateset_id,
        doubt: raw.doubt,
        detection_method: raw
            .detection_method
            .or_else(|| Some(DEFAULT_DETECTION_METHOD.to_string())),
        source: raw.source,
        alignment: raw.alignment,
        extra: raw.extra,
    }
}
