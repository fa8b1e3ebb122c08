//! Maturity level table for the 1-5 Likert scale.

use serde::Serialize;

/// One rung of the maturity ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikertLevel {
    pub value: u8,
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub characteristics: &'static str,
    pub itil_interpretation: &'static str,
}

/// The five maturity levels, ordered from 1 to 5.
pub const LIKERT_LEVELS: [LikertLevel; 5] = [
    LikertLevel {
        value: 1,
        name: "Initial",
        label: "Ad hoc / Reactive",
        description: "The company relies on isolated efforts. Technology exists but is neither \
                      planned nor aligned with the business strategy. Management is reactive.",
        characteristics: "Manual processes, little digitalization, reactive management.",
        itil_interpretation: "Ad hoc usage with no clear link to value management (SVS).",
    },
    LikertLevel {
        value: 2,
        name: "Basic",
        label: "Standardized / Organized",
        description: "The company starts adopting basic digital tools and standardizing \
                      processes. Isolated operations are digitalized without cross-cutting integration.",
        characteristics: "Initial digitalization, isolated tools, basic standardization.",
        itil_interpretation: "Minimal practices, first steps towards standardization.",
    },
    LikertLevel {
        value: 3,
        name: "Intermediate",
        label: "Integrated / Optimized",
        description: "Systems and processes are integrated across the organization. Data becomes \
                      valuable information, with performance indicators guiding decisions.",
        characteristics: "Cross-cutting integration, centralized data, KPI-driven decisions.",
        itil_interpretation: "Initial optimization aligned with ITIL v4 Continual Improvement.",
    },
    LikertLevel {
        value: 4,
        name: "Advanced",
        label: "Intelligent / Strategic",
        description: "Technology becomes a strategic asset. Real-time big data, advanced BI and \
                      predictive AI are in use. Infrastructure is resilient and automated.",
        characteristics: "Strategic big data, advanced BI, predictive AI, resilient infrastructure.",
        itil_interpretation: "Consolidated, strategic practices aligned with the Service Value System.",
    },
    LikertLevel {
        value: 5,
        name: "Innovative",
        label: "Transformative",
        description: "Technology drives innovation and differentiation. Value co-creation, \
                      business model disruption and continuous innovation appear.",
        characteristics: "Business transformation through disruptive technology and continuous innovation.",
        itil_interpretation: "Transformative practices and continuous innovation focused on value creation.",
    },
];

/// Looks up a level by its 1-5 value.
pub fn level(value: u8) -> Option<&'static LikertLevel> {
    LIKERT_LEVELS.iter().find(|l| l.value == value)
}
