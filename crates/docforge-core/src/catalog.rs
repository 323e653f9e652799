//! Document type catalog
//!
//! Every document docforge can produce is listed here with its template
//! file, the special fields it carries and the kind of team details the
//! request provides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The document types docforge can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    AutomationProposal,
    AutomationProposalCustomPrice,
    InternshipOfferLetter,
}

/// What a request of a given document type provides beyond the basics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamCategory {
    /// Proposal with a team roster
    HvtAi,
    /// Proposal with a team roster and an itemized price
    HvtAiCustomPrice,
    /// Offer letter for a single candidate
    OfferLetter,
}

impl TeamCategory {
    pub fn includes_team_roster(self) -> bool {
        matches!(self, TeamCategory::HvtAi | TeamCategory::HvtAiCustomPrice)
    }

    pub fn includes_custom_pricing(self) -> bool {
        matches!(self, TeamCategory::HvtAiCustomPrice)
    }
}

/// A field whose token is filled from a date the request supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialField {
    /// Field name inside the delimiters
    pub name: &'static str,
    /// Opening delimiter; the closing one mirrors it
    pub delimiter: &'static str,
}

impl SpecialField {
    /// Full token, e.g. `<<VDate>>`
    pub fn token(&self) -> String {
        let closing: String = self
            .delimiter
            .chars()
            .rev()
            .map(|c| match c {
                '<' => '>',
                '(' => ')',
                '[' => ']',
                '{' => '}',
                other => other,
            })
            .collect();
        format!("{}{}{}", self.delimiter, self.name, closing)
    }
}

/// Validation date of a proposal
pub const VALIDATION_DATE: SpecialField = SpecialField {
    name: "VDate",
    delimiter: "<<",
};

/// Catalog entry for one document type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTypeSpec {
    pub kind: DocumentKind,
    /// Human-readable name; also the base of generated file names
    pub label: &'static str,
    /// Template file name inside the template directory
    pub template: &'static str,
    pub special_fields: &'static [SpecialField],
    pub team: TeamCategory,
}

static CATALOG: [DocumentTypeSpec; 3] = [
    DocumentTypeSpec {
        kind: DocumentKind::AutomationProposal,
        label: "Manychats + CRM Automation - 550 USD",
        template: "HVT Proposal - AI Automations.docx",
        special_fields: &[VALIDATION_DATE],
        team: TeamCategory::HvtAi,
    },
    DocumentTypeSpec {
        kind: DocumentKind::AutomationProposalCustomPrice,
        label: "Manychats + CRM Automation - Custom Price",
        template: "HVT Proposal - AI Automations - Custom Price.docx",
        special_fields: &[VALIDATION_DATE],
        team: TeamCategory::HvtAiCustomPrice,
    },
    DocumentTypeSpec {
        kind: DocumentKind::InternshipOfferLetter,
        label: "Internship Offer Letter",
        template: "Offer Letter.docx",
        special_fields: &[],
        team: TeamCategory::OfferLetter,
    },
];

impl DocumentKind {
    /// All document types in catalog order
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::AutomationProposal,
        DocumentKind::AutomationProposalCustomPrice,
        DocumentKind::InternshipOfferLetter,
    ];

    /// Catalog entry for this type
    pub fn spec(self) -> &'static DocumentTypeSpec {
        match self {
            DocumentKind::AutomationProposal => &CATALOG[0],
            DocumentKind::AutomationProposalCustomPrice => &CATALOG[1],
            DocumentKind::InternshipOfferLetter => &CATALOG[2],
        }
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn template(self) -> &'static str {
        self.spec().template
    }

    pub fn team(self) -> TeamCategory {
        self.spec().team
    }

    /// Stable identifier used in request files and on the command line
    pub fn slug(self) -> &'static str {
        match self {
            DocumentKind::AutomationProposal => "automation-proposal",
            DocumentKind::AutomationProposalCustomPrice => "automation-proposal-custom-price",
            DocumentKind::InternshipOfferLetter => "internship-offer-letter",
        }
    }

    /// Find a type by slug or by its exact label
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == name || kind.label() == name)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| CoreError::UnknownDocumentType(s.to_string()))
    }
}
