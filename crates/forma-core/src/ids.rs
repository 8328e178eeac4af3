//! ID prefixes and generation.
//!
//! IDs look like `frm-1a2b3c4d`: a type prefix and 8 random hex characters.
//! Option ids come from the same generator, so an id removed during an
//! editing session is never handed out again in practice.

pub const PREFIX_FORM: &str = "frm";
pub const PREFIX_FIELD: &str = "fld";
pub const PREFIX_OPTION: &str = "opt";

/// Generate a fresh prefixed id.
///
/// Falls back to the current timestamp's nanoseconds if the OS random source
/// is unavailable.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let mut bytes = [0u8; 4];
    if getrandom::fill(&mut bytes).is_err() {
        let nanos = chrono::Utc::now().timestamp_subsec_nanos();
        bytes = nanos.to_le_bytes();
    }
    let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{prefix}-{suffix}")
}
