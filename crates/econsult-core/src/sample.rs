//! Built-in sample consultation: ten comments on a draft data protection bill.
//!
//! Used as the default data set for the CLI and as a fixed fixture in tests.
//! Four comments are negative and flagged, five positive, one neutral.

use chrono::NaiveDate;

use crate::comment::{Comment, CommentId, Sentiment, StakeholderType};

struct Seed {
    id: &'static str,
    stakeholder: &'static str,
    stakeholder_type: StakeholderType,
    provision: &'static str,
    text: &'static str,
    sentiment: Sentiment,
    confidence: f64,
    summary: &'static str,
    keywords: &'static [&'static str],
    day: u32,
    flagged: bool,
    notes: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        stakeholder: "Citizens for Privacy Rights",
        stakeholder_type: StakeholderType::Ngo,
        provision: "Section 4.2 - Data Collection",
        text: "We strongly support the proposed limitations on data collection by government agencies. This provision strikes the right balance between security needs and privacy rights. The requirement for judicial oversight is particularly commendable and will help prevent overreach.",
        sentiment: Sentiment::Positive,
        confidence: 0.89,
        summary: "Strong support for data collection limitations and judicial oversight requirements.",
        keywords: &["privacy", "judicial oversight", "data collection", "balance"],
        day: 15,
        flagged: false,
        notes: "",
    },
    Seed {
        id: "2",
        stakeholder: "Tech Industry Association",
        stakeholder_type: StakeholderType::Organization,
        provision: "Section 7.1 - Compliance Requirements",
        text: "The proposed compliance framework is overly burdensome and will stifle innovation. Small startups cannot afford the extensive auditing requirements outlined in this section. We recommend a tiered approach based on company size and data volume.",
        sentiment: Sentiment::Negative,
        confidence: 0.92,
        summary: "Objects to compliance framework as burdensome, suggests tiered approach.",
        keywords: &["compliance", "burdensome", "innovation", "startups", "tiered approach"],
        day: 14,
        flagged: true,
        notes: "Industry concern - consider economic impact",
    },
    Seed {
        id: "3",
        stakeholder: "Dr. Sarah Mitchell",
        stakeholder_type: StakeholderType::Individual,
        provision: "Section 3.5 - Consent Mechanisms",
        text: "The consent mechanisms described are adequate but could be clearer for average users. Consider adding visual examples or simplified language to help citizens understand what they are agreeing to.",
        sentiment: Sentiment::Neutral,
        confidence: 0.76,
        summary: "Suggests improvements to consent mechanism clarity for users.",
        keywords: &["consent", "clarity", "visual examples", "simplified language"],
        day: 13,
        flagged: false,
        notes: "",
    },
    Seed {
        id: "4",
        stakeholder: "Digital Rights Foundation",
        stakeholder_type: StakeholderType::Ngo,
        provision: "Section 2.3 - Enforcement Powers",
        text: "We are deeply concerned about the broad enforcement powers granted to regulatory agencies. The lack of clear appeals process and the potential for arbitrary enforcement actions pose serious risks to civil liberties.",
        sentiment: Sentiment::Negative,
        confidence: 0.94,
        summary: "Concerned about broad enforcement powers and lack of appeals process.",
        keywords: &["enforcement", "regulatory agencies", "appeals process", "civil liberties"],
        day: 12,
        flagged: true,
        notes: "Civil liberties concern - high priority",
    },
    Seed {
        id: "5",
        stakeholder: "Municipal Government Coalition",
        stakeholder_type: StakeholderType::Government,
        provision: "Section 6.4 - Implementation Timeline",
        text: "The 18-month implementation timeline is realistic and provides adequate time for local governments to adapt their systems. We appreciate the phased rollout approach and the technical support provisions.",
        sentiment: Sentiment::Positive,
        confidence: 0.87,
        summary: "Supports 18-month timeline and phased rollout approach.",
        keywords: &["implementation", "timeline", "phased rollout", "technical support"],
        day: 11,
        flagged: false,
        notes: "",
    },
    Seed {
        id: "6",
        stakeholder: "Consumer Protection Alliance",
        stakeholder_type: StakeholderType::Ngo,
        provision: "Section 5.1 - User Rights",
        text: "The user rights section is comprehensive and well-structured. The right to data portability and the right to be forgotten are particularly important. However, we suggest adding clearer timelines for response to user requests.",
        sentiment: Sentiment::Positive,
        confidence: 0.83,
        summary: "Praises user rights section, suggests adding response timelines.",
        keywords: &["user rights", "data portability", "right to be forgotten", "response timelines"],
        day: 10,
        flagged: false,
        notes: "",
    },
    Seed {
        id: "7",
        stakeholder: "Small Business Federation",
        stakeholder_type: StakeholderType::Organization,
        provision: "Section 8.2 - Penalty Structure",
        text: "The penalty structure is disproportionately harsh for small businesses. A $50,000 fine could bankrupt a small company for a minor compliance error. We urge reconsideration of the penalty amounts for businesses under 50 employees.",
        sentiment: Sentiment::Negative,
        confidence: 0.91,
        summary: "Objects to harsh penalties for small businesses, requests reconsideration.",
        keywords: &["penalties", "small businesses", "disproportionate", "compliance error"],
        day: 9,
        flagged: true,
        notes: "Economic impact concern",
    },
    Seed {
        id: "8",
        stakeholder: "Prof. Michael Chen",
        stakeholder_type: StakeholderType::Individual,
        provision: "Section 1.2 - Definitions",
        text: "The definitions section provides good clarity on key terms. The distinction between personal data and sensitive personal data is well articulated and aligns with international standards.",
        sentiment: Sentiment::Positive,
        confidence: 0.79,
        summary: "Commends clarity of definitions and alignment with international standards.",
        keywords: &["definitions", "personal data", "sensitive data", "international standards"],
        day: 8,
        flagged: false,
        notes: "",
    },
    Seed {
        id: "9",
        stakeholder: "Healthcare Data Consortium",
        stakeholder_type: StakeholderType::Organization,
        provision: "Section 9.3 - Special Categories",
        text: "The special provisions for healthcare data are insufficient. Medical research requires more flexibility in data use than currently proposed. The current framework could significantly impede medical advancement and patient care.",
        sentiment: Sentiment::Negative,
        confidence: 0.88,
        summary: "Criticizes healthcare data provisions as insufficient for medical research.",
        keywords: &["healthcare data", "medical research", "flexibility", "patient care"],
        day: 7,
        flagged: true,
        notes: "Healthcare sector concern",
    },
    Seed {
        id: "10",
        stakeholder: "Privacy Advocacy Group",
        stakeholder_type: StakeholderType::Ngo,
        provision: "Section 4.1 - Data Minimization",
        text: "The data minimization principle is well-implemented throughout the legislation. The requirement to justify data collection purposes and regularly review data retention policies demonstrates a commitment to privacy-by-design.",
        sentiment: Sentiment::Positive,
        confidence: 0.86,
        summary: "Praises data minimization implementation and privacy-by-design approach.",
        keywords: &["data minimization", "privacy-by-design", "data retention", "justification"],
        day: 6,
        flagged: false,
        notes: "",
    },
];

/// The ten sample comments, newest first (2024-01-15 down to 2024-01-06).
pub fn consultation_comments() -> Vec<Comment> {
    SEEDS.iter().map(Seed::to_comment).collect()
}

impl Seed {
    fn to_comment(&self) -> Comment {
        Comment {
            id: CommentId::new(self.id),
            stakeholder: self.stakeholder.to_string(),
            stakeholder_type: self.stakeholder_type,
            provision: self.provision.to_string(),
            text: self.text.to_string(),
            sentiment: self.sentiment,
            confidence: self.confidence,
            summary: self.summary.to_string(),
            keywords: self.keywords.iter().map(|k| k.to_string()).collect(),
            date: NaiveDate::from_ymd_opt(2024, 1, self.day).expect("sample dates are valid"),
            flagged: self.flagged,
            notes: self.notes.to_string(),
            include_in_report: true,
        }
    }
}
