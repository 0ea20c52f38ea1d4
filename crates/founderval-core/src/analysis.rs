//! Investor-report content produced by the analyst model for one submission.
//!
//! Field names serialize in camelCase so the persisted form is the same JSON
//! the model returns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest and highest value a score may take.
pub const SCORE_RANGE: (i64, i64) = (0, 100);

/// Number of projection years the report expects.
pub const PROJECTION_YEARS: usize = 3;

/// Five 0–100 scores. `team_requirement` is inverted: higher means harder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupScores {
    pub market: i64,
    pub feasibility: i64,
    pub financial: i64,
    pub uniqueness: i64,
    pub team_requirement: i64,
}

impl StartupScores {
    /// Scores paired with their report labels, in chart order.
    pub fn labelled(&self) -> [(&'static str, i64); 5] {
        [
            ("Market", self.market),
            ("Feasibility", self.feasibility),
            ("Finance", self.financial),
            ("Uniqueness", self.uniqueness),
            ("Team Effort", self.team_requirement),
        ]
    }

    /// Plain mean of the five scores, as shown on the dashboard.
    pub fn average(&self) -> f64 {
        let total: i64 = self.labelled().iter().map(|(_, v)| v).sum();
        total as f64 / 5.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialYear {
    pub year: String,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalStep {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub risk: String,
    pub mitigation: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub executive_summary: String,
    pub scores: StartupScores,
    pub financials: Vec<FinancialYear>,
    pub market_analysis: String,
    pub competitors: Vec<String>,
    pub legal_steps: Vec<LegalStep>,
    pub risks: Vec<Risk>,
    /// Free text, expected to contain "Invest", "Pivot" or "Kill".
    pub investment_verdict: String,
    pub recommended_stack: Vec<String>,
    pub hiring_plan: Vec<String>,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::classify(&self.investment_verdict)
    }
}

/// Coarse reading of the free-text investment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Invest,
    Pivot,
    Kill,
}

impl Verdict {
    /// "Invest" wins over "Pivot"; anything else reads as Kill.
    pub fn classify(text: &str) -> Self {
        if text.contains("Invest") {
            Self::Invest
        } else if text.contains("Pivot") {
            Self::Pivot
        } else {
            Self::Kill
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invest => "Invest",
            Self::Pivot => "Pivot",
            Self::Kill => "Kill",
        }
    }
}

/// A way in which a parsed analysis departs from the response schema's
/// stated contract. Violations are advisory; the analysis is still usable.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractViolation {
    ScoreOutOfRange { field: &'static str, value: i64 },
    FinancialYearCount { expected: usize, actual: usize },
    FinancialYearsNotAscending { previous: String, next: String },
    EmptyText { field: &'static str },
    EmptyList { field: &'static str },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoreOutOfRange { field, value } => {
                write!(f, "score {field} = {value} is outside 0..=100")
            }
            Self::FinancialYearCount { expected, actual } => {
                write!(f, "expected {expected} financial years, got {actual}")
            }
            Self::FinancialYearsNotAscending { previous, next } => {
                write!(f, "financial year {next:?} does not follow {previous:?}")
            }
            Self::EmptyText { field } => write!(f, "{field} is empty"),
            Self::EmptyList { field } => write!(f, "{field} has no entries"),
        }
    }
}

/// Check an analysis against the contract the response schema asserts.
///
/// Returns every violation found; an empty vector means the analysis
/// conforms. Nothing here panics on out-of-contract input.
pub fn validate_analysis(analysis: &AnalysisResult) -> Vec<ContractViolation> {
    let mut violations = Vec::new();
    let s = &analysis.scores;
    let scores = [
        ("market", s.market),
        ("feasibility", s.feasibility),
        ("financial", s.financial),
        ("uniqueness", s.uniqueness),
        ("teamRequirement", s.team_requirement),
    ];
    for (field, value) in scores {
        if !(SCORE_RANGE.0..=SCORE_RANGE.1).contains(&value) {
            violations.push(ContractViolation::ScoreOutOfRange { field, value });
        }
    }

    if analysis.financials.len() != PROJECTION_YEARS {
        violations.push(ContractViolation::FinancialYearCount {
            expected: PROJECTION_YEARS,
            actual: analysis.financials.len(),
        });
    }
    for pair in analysis.financials.windows(2) {
        if year_key(&pair[0].year) >= year_key(&pair[1].year) {
            violations.push(ContractViolation::FinancialYearsNotAscending {
                previous: pair[0].year.clone(),
                next: pair[1].year.clone(),
            });
        }
    }

    let texts = [
        ("executiveSummary", &analysis.executive_summary),
        ("marketAnalysis", &analysis.market_analysis),
        ("investmentVerdict", &analysis.investment_verdict),
    ];
    for (field, value) in texts {
        if value.trim().is_empty() {
            violations.push(ContractViolation::EmptyText { field });
        }
    }

    if analysis.competitors.is_empty() {
        violations.push(ContractViolation::EmptyList {
            field: "competitors",
        });
    }
    if analysis.risks.is_empty() {
        violations.push(ContractViolation::EmptyList { field: "risks" });
    }

    violations
}

/// Ordering key for a year label.
///
/// Labels are free text ("2025", "Year 1", "Y2"), so compare the first run of
/// digits numerically and fall back to the raw string.
fn year_key(label: &str) -> (Option<u64>, &str) {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (digits.parse().ok(), label)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            executive_summary: "Drone spraying cuts pesticide cost by a third.".into(),
            scores: StartupScores {
                market: 78,
                feasibility: 64,
                financial: 70,
                uniqueness: 55,
                team_requirement: 60,
            },
            financials: vec![
                FinancialYear {
                    year: "Year 1".into(),
                    revenue: 40_000.0,
                    cost: 65_000.0,
                    profit: -25_000.0,
                },
                FinancialYear {
                    year: "Year 2".into(),
                    revenue: 120_000.0,
                    cost: 90_000.0,
                    profit: 30_000.0,
                },
                FinancialYear {
                    year: "Year 3".into(),
                    revenue: 310_000.0,
                    cost: 180_000.0,
                    profit: 130_000.0,
                },
            ],
            market_analysis: "TAM of 12M acres under cultivation.".into(),
            competitors: vec!["AgriDrone PK".into(), "DJI Agras dealers".into()],
            legal_steps: vec![LegalStep {
                title: "Register with SECP".into(),
                description: "Incorporate as a private limited company.".into(),
            }],
            risks: vec![Risk {
                risk: "Aviation authority restrictions".into(),
                mitigation: "Early engagement with the CAA.".into(),
                severity: Severity::High,
            }],
            investment_verdict: "Invest with caution".into(),
            recommended_stack: vec!["Rust".into(), "PostgreSQL".into()],
            hiring_plan: vec!["Drone pilot".into(), "Agronomist".into(), "Sales lead".into()],
        }
    }

    #[test]
    fn conforming_analysis_has_no_violations() {
        assert!(validate_analysis(&sample_analysis()).is_empty());
    }

    #[test]
    fn out_of_range_scores_reported() {
        let mut a = sample_analysis();
        a.scores.market = 140;
        a.scores.team_requirement = -3;
        let v = validate_analysis(&a);
        assert_eq!(
            v,
            vec![
                ContractViolation::ScoreOutOfRange {
                    field: "market",
                    value: 140
                },
                ContractViolation::ScoreOutOfRange {
                    field: "teamRequirement",
                    value: -3
                },
            ]
        );
    }

    #[test]
    fn wrong_year_count_reported() {
        let mut a = sample_analysis();
        a.financials.pop();
        assert_eq!(
            validate_analysis(&a),
            vec![ContractViolation::FinancialYearCount {
                expected: 3,
                actual: 2
            }]
        );
    }

    #[test]
    fn descending_years_reported() {
        let mut a = sample_analysis();
        a.financials.swap(0, 2);
        let v = validate_analysis(&a);
        assert!(v.iter().any(|x| matches!(
            x,
            ContractViolation::FinancialYearsNotAscending { .. }
        )));
    }

    #[test]
    fn numeric_years_compare_numerically() {
        let mut a = sample_analysis();
        a.financials[0].year = "2025".into();
        a.financials[1].year = "2026".into();
        a.financials[2].year = "2027".into();
        assert!(validate_analysis(&a).is_empty());

        a.financials[0].year = "9".into();
        a.financials[1].year = "10".into();
        a.financials[2].year = "11".into();
        assert!(validate_analysis(&a).is_empty());
    }

    #[test]
    fn empty_financials_tolerated() {
        let mut a = sample_analysis();
        a.financials.clear();
        let v = validate_analysis(&a);
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn blank_summary_reported() {
        let mut a = sample_analysis();
        a.executive_summary = " ".into();
        assert_eq!(
            validate_analysis(&a),
            vec![ContractViolation::EmptyText {
                field: "executiveSummary"
            }]
        );
    }

    #[test]
    fn verdict_classification() {
        assert_eq!(Verdict::classify("Invest"), Verdict::Invest);
        assert_eq!(Verdict::classify("Pivot before investing? Invest later"), Verdict::Invest);
        assert_eq!(Verdict::classify("Pivot to B2B"), Verdict::Pivot);
        assert_eq!(Verdict::classify("Kill"), Verdict::Kill);
        assert_eq!(Verdict::classify("Unclear"), Verdict::Kill);
    }

    #[test]
    fn average_score() {
        let a = sample_analysis();
        assert!((a.scores.average() - 65.4).abs() < 1e-9);
    }

    #[test]
    fn parses_model_json() {
        let json = r#"{
            "executiveSummary": "s",
            "scores": {"market": 1, "feasibility": 2, "financial": 3, "uniqueness": 4, "teamRequirement": 5},
            "financials": [{"year": "2025", "revenue": 1.5, "cost": 1, "profit": 0.5}],
            "marketAnalysis": "m",
            "competitors": ["c"],
            "legalSteps": [{"title": "t", "description": "d"}],
            "risks": [{"risk": "r", "mitigation": "m", "severity": "Medium"}],
            "investmentVerdict": "Pivot",
            "recommendedStack": [],
            "hiringPlan": []
        }"#;
        let parsed: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.scores.team_requirement, 5);
        assert_eq!(parsed.risks[0].severity, Severity::Medium);
        assert_eq!(parsed.financials[0].cost, 1.0);
    }

    #[test]
    fn unknown_severity_rejected() {
        let json = r#"{"risk": "r", "mitigation": "m", "severity": "Critical"}"#;
        assert!(serde_json::from_str::<Risk>(json).is_err());
    }
}
