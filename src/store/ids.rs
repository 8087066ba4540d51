// Identifier minting for records created without a caller-supplied ID.

/// Monotonic counters backing automatic record identifiers.
///
/// Form identifiers are handed out as successive decimal strings, cognate
/// identifiers as native integers. Counters never reset or repeat within a
/// session; each session starts counting from one.
#[derive(Debug, Default)]
pub struct IdSequence {
    forms: u64,
    cognates: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next form identifier: `"1"`, `"2"`, ...
    pub fn next_form_id(&mut self) -> String {
        self.forms += 1;
        self.forms.to_string()
    }

    /// Next cognate identifier: `1`, `2`, ...
    pub fn next_cognate_id(&mut self) -> u64 {
        self.cognates += 1;
        self.cognates
    }
}
