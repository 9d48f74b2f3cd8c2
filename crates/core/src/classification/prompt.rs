//! Prompt construction and answer parsing for product classification.

use serde::Deserialize;

use super::ProductListing;
use super::error::ClassifierError;

/// Shape of the expected answer.
#[derive(Debug, Deserialize)]
struct CategoryAnswer {
    #[serde(rename = "categoryName")]
    category_name: String,
}

/// Builds the instruction sent alongside the product image.
#[must_use]
pub fn build_prompt(listing: &ProductListing, candidates: &[String]) -> String {
    let description = listing
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("No description provided");

    format!(
        "You are an expert e-commerce product classifier. Your task is to determine the most \
         appropriate category for a product based on its title, description, and image.\n\
         You must choose only ONE category from the following available list: [{categories}].\n\n\
         Product Data:\n\
         - Title: {title}\n\
         - Description: {description}\n\n\
         Analyze the data and the provided image, then return your answer ONLY as a JSON object, \
         with no extra text, in this format:\n\
         {{ \"categoryName\": \"The category name you chose from the list\" }}",
        categories = candidates.join(", "),
        title = listing.title.trim(),
    )
}

/// Extracts the chosen category from a model answer.
///
/// Markdown code fences are ignored. The answer must name one of `candidates`
/// (trimmed, ASCII case-insensitive); the candidate's own spelling is returned.
pub fn parse_category_response(
    text: &str,
    candidates: &[String],
) -> Result<String, ClassifierError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let answer: CategoryAnswer = serde_json::from_str(cleaned.trim())
        .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

    let chosen = answer.category_name.trim();
    candidates
        .iter()
        .find(|c| c.trim() == chosen)
        .or_else(|| candidates.iter().find(|c| c.trim().eq_ignore_ascii_case(chosen)))
        .cloned()
        .ok_or_else(|| ClassifierError::UnknownCategory(chosen.to_string()))
}
