//! Declarative response schema sent with every request.
//!
//! Uses the Gemini OpenAPI subset: upper-case type names, `required` lists,
//! and `enum` for string enumerations.

use serde_json::{Value, json};

/// Top-level fields the model must return.
pub const REQUIRED_FIELDS: &[&str] = &[
    "executiveSummary",
    "scores",
    "financials",
    "marketAnalysis",
    "competitors",
    "legalSteps",
    "risks",
    "investmentVerdict",
    "recommendedStack",
    "hiringPlan",
];

pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "executiveSummary": {
                "type": "STRING",
                "description": "A 2-3 sentence high-level summary suitable for investors."
            },
            "scores": {
                "type": "OBJECT",
                "properties": {
                    "market": { "type": "INTEGER", "description": "Score 0-100 based on market size/demand." },
                    "feasibility": { "type": "INTEGER", "description": "Score 0-100 based on technical/operational ease." },
                    "financial": { "type": "INTEGER", "description": "Score 0-100 based on profit potential." },
                    "uniqueness": { "type": "INTEGER", "description": "Score 0-100 based on competitive moat." },
                    "teamRequirement": { "type": "INTEGER", "description": "Score 0-100 regarding how complex the team needs to be (higher = harder)." }
                },
                "required": ["market", "feasibility", "financial", "uniqueness", "teamRequirement"]
            },
            "financials": {
                "type": "ARRAY",
                "description": "3-year projection. Numbers in USD (or converted equivalent).",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "year": { "type": "STRING" },
                        "revenue": { "type": "NUMBER" },
                        "cost": { "type": "NUMBER" },
                        "profit": { "type": "NUMBER" }
                    },
                    "required": ["year", "revenue", "cost", "profit"]
                }
            },
            "marketAnalysis": {
                "type": "STRING",
                "description": "Deep dive into TAM/SAM/SOM and market trends."
            },
            "competitors": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 3-5 potential competitors."
            },
            "legalSteps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["title", "description"]
                },
                "description": "Key legal registration steps specific to the target country (e.g. SECP for Pakistan)."
            },
            "risks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "risk": { "type": "STRING" },
                        "mitigation": { "type": "STRING" },
                        "severity": { "type": "STRING", "enum": ["Low", "Medium", "High"] }
                    },
                    "required": ["risk", "mitigation", "severity"]
                }
            },
            "investmentVerdict": {
                "type": "STRING",
                "description": "Final verdict: Invest, Pivot, or Kill?"
            },
            "recommendedStack": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Tech stack recommendations."
            },
            "hiringPlan": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "First 3 key hires."
            }
        },
        "required": REQUIRED_FIELDS
    })
}
