//! Request construction for the normalization service.

/// System role for the normalization agent.
pub const SYSTEM_PREAMBLE: &str = "You are a data preprocessing specialist.";

/// Field under which the service returns each normalized answer.
pub const PROCESSED_FIELD: &str = "answer_processed";

/// Builds the user prompt for one chunk: the normalization rules followed by
/// the chunk's items serialized as a JSON array.
#[must_use]
pub fn build_user_prompt(items: &[String]) -> String {
    // Serializing a slice of strings cannot fail.
    let payload = serde_json::to_string(items).unwrap_or_else(|_| String::from("[]"));
    format!(
        "Preprocess the following list of survey answers for data analysis.\n\
         Rules:\n\
         1. Translate generic English vocabulary into natural Korean (e.g. complicated -> 복잡한).\n\
         2. Keep technical terms, abbreviations, brand names, product names, and UI/UX vocabulary as-is.\n\
         3. Remove meaningless interjections ('um', 'uh', '...') and duplicated or redundant phrasing.\n\
         4. Simplify each sentence down to its core meaning.\n\
         5. Remove runs of whitespace and special characters.\n\
         6. Output each answer as a single-line string for the answer_processed CSV column.\n\
         7. Never return an input verbatim.\n\
         8. The output must be a standard JSON array (JSON RFC), using double quotes only.\n\
         9. Return the pure JSON array with no extra commentary and no single quotes.\n\n\
         Input list: {payload}"
    )
}
