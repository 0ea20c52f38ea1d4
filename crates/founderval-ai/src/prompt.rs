//! Prompt templates for the analyst model.

use founderval_core::IdeaSubmission;

pub const SYSTEM_PROMPT: &str = "\
You are a senior Venture Capital Analyst and Startup Consultant.
Your goal is to validate startup ideas rigorously.
You must provide a realistic, critical, and data-backed analysis.
If the location involves Pakistan, specifically mention SECP, FBR, and local market nuances in the legal/market sections.
Output must be strictly valid JSON.";

/// Countries whose regulators the analyst should name, matched
/// case-insensitively against the submission's location.
const REGULATORS: &[(&str, &[&str])] = &[
    ("Pakistan", &["SECP", "FBR"]),
    ("India", &["MCA", "SEBI", "GST Council"]),
    ("United Kingdom", &["Companies House", "HMRC", "FCA"]),
    ("United States", &["SEC", "IRS", "the state Secretary of State"]),
];

/// Regulator instruction for a location, if it names a known country.
pub fn regulator_hint(location: &str) -> Option<String> {
    let location = location.to_lowercase();
    REGULATORS
        .iter()
        .find(|(country, _)| location.contains(&country.to_lowercase()))
        .map(|(country, bodies)| {
            format!(
                "The founder is operating in {country}: name {} explicitly in the legal steps.",
                bodies.join(", ")
            )
        })
}

pub fn build_user_prompt(idea: &IdeaSubmission) -> String {
    let mut prompt = format!(
        "Analyze the following startup idea:\n\
         Title: {title}\n\
         Industry: {industry}\n\
         Description: {description}\n\
         Target Market: {target_market}\n\
         Budget/Stage: {budget}\n\
         Target Location: {location}\n\
         \n\
         Provide a professional investor-grade analysis. Be critical.",
        title = idea.title,
        industry = idea.industry,
        description = idea.description,
        target_market = idea.target_market,
        budget = idea.budget,
        location = idea.location,
    );
    if let Some(hint) = regulator_hint(&idea.location) {
        prompt.push('\n');
        prompt.push_str(&hint);
    }
    prompt
}
