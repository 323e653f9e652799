//! Generation requests and their placeholder fields
//!
//! A request is read from TOML. The `kind` key selects the document type
//! and the remaining tables carry the values for its placeholders:
//!
//! ```toml
//! kind = "automation-proposal-custom-price"
//!
//! [client]
//! name = "Acme Corp"
//! email = "ops@acme.test"
//! phone = "+14155550100"
//! country = "USA"
//!
//! [dates]
//! proposal = "2026-10-16"
//! validation = "2026-11-15"
//!
//! [team]
//! project_manager = 1
//! ai_ml_developers = 2
//!
//! [pricing]
//! manychats_setup = 400
//! make_automations = 600
//! annual_maintenance = 250
//! ```

use chrono::NaiveDate;
use docforge_ooxml::PlaceholderMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{DocumentKind, VALIDATION_DATE};
use crate::error::{CoreError, Result};
use crate::validate::PhoneRules;

/// Date format used in running text (`16 October, 2026`)
pub const LONG_DATE_FORMAT: &str = "%d %B, %Y";

/// Date format of the proposal validation date (`16-10-2026`)
pub const SHORT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Job roles an offer letter can be issued for
pub const JOB_ROLES: [&str; 4] = ["UI UX", "AI Automations", "Software Developer", "Sales"];

/// A role on the proposal team and its placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamRole {
    pub label: &'static str,
    pub placeholder: &'static str,
}

const fn role(label: &'static str, placeholder: &'static str) -> TeamRole {
    TeamRole { label, placeholder }
}

/// Team roles in template order
pub const TEAM_ROLES: [TeamRole; 8] = [
    role("Project Manager", "<<P1>>"),
    role("Frontend Developers", "<<F1>>"),
    role("UI/UX Members", "<<U1>>"),
    role("AI/ML Developers", "<<A1>>"),
    role("Business Analyst", "<<B1>>"),
    role("AWS Developer", "<<AD1>>"),
    role("Backend Developers", "<<BD1>>"),
    role("System Architect", "<<S1>>"),
];

/// A request to generate one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DocumentRequest {
    AutomationProposal(ProposalRequest),
    AutomationProposalCustomPrice(ProposalRequest),
    InternshipOfferLetter(OfferLetterRequest),
}

/// Client proposal details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalRequest {
    #[serde(default)]
    pub client: ClientDetails,
    #[serde(default)]
    pub dates: ProposalDates,
    #[serde(default)]
    pub team: TeamComposition,
    #[serde(default)]
    pub pricing: Pricing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
}

/// Proposal dates; missing dates mean today
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalDates {
    pub proposal: Option<NaiveDate>,
    pub validation: Option<NaiveDate>,
}

/// Head count per team role
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamComposition {
    pub project_manager: u32,
    pub frontend_developers: u32,
    pub ui_ux_members: u32,
    pub ai_ml_developers: u32,
    pub business_analyst: u32,
    pub aws_developer: u32,
    pub backend_developers: u32,
    pub system_architect: u32,
}

impl TeamComposition {
    /// Counts paired with their role, in [`TEAM_ROLES`] order
    pub fn counts(&self) -> [(TeamRole, u32); 8] {
        let counts = [
            self.project_manager,
            self.frontend_developers,
            self.ui_ux_members,
            self.ai_ml_developers,
            self.business_analyst,
            self.aws_developer,
            self.backend_developers,
            self.system_architect,
        ];
        std::array::from_fn(|i| (TEAM_ROLES[i], counts[i]))
    }
}

/// Itemized price in USD
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    pub manychats_setup: u64,
    pub make_automations: u64,
    pub annual_maintenance: u64,
}

impl Pricing {
    pub fn total(&self) -> u64 {
        self.manychats_setup + self.make_automations + self.annual_maintenance
    }
}

/// Internship offer letter details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferLetterRequest {
    pub candidate: CandidateDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDetails {
    pub name: String,
    /// One of [`JOB_ROLES`]
    pub job: String,
    pub start_date: NaiveDate,
    /// Monthly stipend
    #[serde(default)]
    pub stipend: u64,
    /// Internship duration
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_months() -> u32 {
    1
}

impl DocumentRequest {
    /// Parse a request from TOML
    ///
    /// An unknown `kind` is reported as [`CoreError::UnknownDocumentType`];
    /// any other problem as [`CoreError::InvalidRequest`].
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(toml_str).map_err(CoreError::InvalidRequest)?;
        // Labels are accepted as well as slugs
        let kind = match table.get("kind").and_then(|v| v.as_str()) {
            Some(name) => Some(name.parse::<DocumentKind>()?),
            None => None,
        };
        if let Some(kind) = kind {
            table.insert("kind".to_string(), toml::Value::String(kind.slug().to_string()));
        }
        toml::Value::Table(table)
            .try_into()
            .map_err(CoreError::InvalidRequest)
    }

    /// Read a request file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentRequest::AutomationProposal(_) => DocumentKind::AutomationProposal,
            DocumentRequest::AutomationProposalCustomPrice(_) => {
                DocumentKind::AutomationProposalCustomPrice
            }
            DocumentRequest::InternshipOfferLetter(_) => DocumentKind::InternshipOfferLetter,
        }
    }

    /// Check the request before anything is generated
    ///
    /// Proposals need a phone number matching the client's country. Offer
    /// letters need a known job role and a duration of at least one month.
    pub fn validate(&self, phone_rules: &PhoneRules) -> Result<()> {
        match self {
            DocumentRequest::AutomationProposal(proposal)
            | DocumentRequest::AutomationProposalCustomPrice(proposal) => {
                let client = &proposal.client;
                if !phone_rules.validate(&client.country, &client.phone) {
                    return Err(CoreError::ValidationFailed(format!(
                        "Invalid phone number format for selected country: {} numbers must start with {}",
                        display_country(&client.country),
                        phone_rules.prefix_for(&client.country)
                    )));
                }
                Ok(())
            }
            DocumentRequest::InternshipOfferLetter(letter) => {
                let candidate = &letter.candidate;
                if !JOB_ROLES.contains(&candidate.job.as_str()) {
                    return Err(CoreError::ValidationFailed(format!(
                        "Unknown job role '{}'; expected one of: {}",
                        candidate.job,
                        JOB_ROLES.join(", ")
                    )));
                }
                if candidate.months < 1 {
                    return Err(CoreError::ValidationFailed(
                        "Internship duration must be at least one month".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Build the placeholder map, using `today` for dates not given
    pub fn placeholders(&self, today: NaiveDate) -> PlaceholderMap {
        let mut map = PlaceholderMap::new();
        match self {
            DocumentRequest::InternshipOfferLetter(letter) => {
                let candidate = &letter.candidate;
                map.insert("<<E-Name>>", &candidate.name);
                map.insert("<<Job>>", &candidate.job);
                map.insert("<<S-Date>>", candidate.start_date.format(LONG_DATE_FORMAT));
                map.insert("<<Stipend>>", group_thousands(candidate.stipend));
                map.insert("<<Months>>", candidate.months);
                map.insert("<<Date>>", today.format(LONG_DATE_FORMAT));
            }
            DocumentRequest::AutomationProposal(proposal)
            | DocumentRequest::AutomationProposalCustomPrice(proposal) => {
                let client = &proposal.client;
                let proposal_date = proposal.dates.proposal.unwrap_or(today);
                let validation_date = proposal.dates.validation.unwrap_or(today);

                map.insert("<<Client Name>>", &client.name);
                map.insert("<<Client Email>>", &client.email);
                map.insert("<<Client Number>>", &client.phone);
                map.insert("<<Country>>", &client.country);
                map.insert("<<Date>>", proposal_date.format(LONG_DATE_FORMAT));
                map.insert("<<D-Date>>", proposal_date.format(LONG_DATE_FORMAT));
                for field in self.kind().spec().special_fields {
                    if *field == VALIDATION_DATE {
                        map.insert(field.token(), validation_date.format(SHORT_DATE_FORMAT));
                    }
                }

                let team = self.kind().team();
                if team.includes_team_roster() {
                    for (role, count) in proposal.team.counts() {
                        map.insert(role.placeholder, count);
                    }
                }
                if team.includes_custom_pricing() {
                    let pricing = &proposal.pricing;
                    map.insert("<<P01>>", pricing.manychats_setup);
                    map.insert("<<P02>>", pricing.make_automations);
                    map.insert("<<A-Price>>", pricing.annual_maintenance);
                    map.insert("<<T-Price>>", group_thousands(pricing.total()));
                }
            }
        }
        map
    }
}

fn display_country(country: &str) -> &str {
    if country.trim().is_empty() {
        "(no country)"
    } else {
        country.trim()
    }
}

/// Format an integer with comma thousands separators (`1250` → `1,250`)
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn offer_letter(job: &str, months: u32) -> DocumentRequest {
        DocumentRequest::InternshipOfferLetter(OfferLetterRequest {
            candidate: CandidateDetails {
                name: "Asha Rao".to_string(),
                job: job.to_string(),
                start_date: date(2026, 11, 2),
                stipend: 15000,
                months,
            },
        })
    }

    fn proposal(country: &str, phone: &str) -> ProposalRequest {
        ProposalRequest {
            client: ClientDetails {
                name: "Acme Corp".to_string(),
                email: "ops@acme.test".to_string(),
                phone: phone.to_string(),
                country: country.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1250), "1,250");
        assert_eq!(group_thousands(15000), "15,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_offer_letter_placeholders() {
        let map = offer_letter("AI Automations", 3).placeholders(date(2026, 10, 16));

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(
            entries,
            [
                ("<<E-Name>>", "Asha Rao"),
                ("<<Job>>", "AI Automations"),
                ("<<S-Date>>", "02 November, 2026"),
                ("<<Stipend>>", "15,000"),
                ("<<Months>>", "3"),
                ("<<Date>>", "16 October, 2026"),
            ]
        );
    }

    #[test]
    fn test_proposal_placeholders_default_dates() {
        let request = DocumentRequest::AutomationProposal(proposal("India", "+919999999999"));
        let map = request.placeholders(date(2026, 10, 16));

        assert_eq!(map.get("<<Date>>"), Some("16 October, 2026"));
        assert_eq!(map.get("<<D-Date>>"), Some("16 October, 2026"));
        assert_eq!(map.get("<<VDate>>"), Some("16-10-2026"));
        assert_eq!(map.get("<<P1>>"), Some("0"));
        assert_eq!(map.get("<<S1>>"), Some("0"));
        assert_eq!(map.get("<<T-Price>>"), None);
        assert_eq!(map.len(), 7 + 8);
    }

    #[test]
    fn test_custom_price_placeholders() {
        let mut details = proposal("USA", "+14155550100");
        details.dates.validation = Some(date(2026, 12, 1));
        details.team.ai_ml_developers = 2;
        details.pricing = Pricing {
            manychats_setup: 400,
            make_automations: 600,
            annual_maintenance: 250,
        };
        let map = DocumentRequest::AutomationProposalCustomPrice(details)
            .placeholders(date(2026, 10, 16));

        assert_eq!(map.get("<<VDate>>"), Some("01-12-2026"));
        assert_eq!(map.get("<<A1>>"), Some("2"));
        assert_eq!(map.get("<<P01>>"), Some("400"));
        assert_eq!(map.get("<<P02>>"), Some("600"));
        assert_eq!(map.get("<<A-Price>>"), Some("250"));
        assert_eq!(map.get("<<T-Price>>"), Some("1,250"));

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys.last(), Some(&"<<T-Price>>"));
    }

    #[test]
    fn test_phone_validation() {
        let rules = PhoneRules::default();
        let valid = DocumentRequest::AutomationProposal(proposal("India", "+919812345678"));
        assert!(valid.validate(&rules).is_ok());

        let empty = DocumentRequest::AutomationProposal(proposal("India", ""));
        assert!(empty.validate(&rules).is_ok());

        let invalid =
            DocumentRequest::AutomationProposalCustomPrice(proposal("India", "919812345678"));
        let err = invalid.validate(&rules).unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed(ref msg) if msg.contains("+91")));
    }

    #[test]
    fn test_offer_letter_validation() {
        let rules = PhoneRules::default();
        assert!(offer_letter("Sales", 1).validate(&rules).is_ok());
        assert!(matches!(
            offer_letter("Marketing", 3).validate(&rules),
            Err(CoreError::ValidationFailed(_))
        ));
        assert!(matches!(
            offer_letter("UI UX", 0).validate(&rules),
            Err(CoreError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_parse_offer_letter_request() {
        let toml = r#"
kind = "internship-offer-letter"

[candidate]
name = "Asha Rao"
job = "Software Developer"
start_date = "2026-11-02"
stipend = 12000
"#;
        let request = DocumentRequest::from_toml_str(toml).unwrap();
        assert_eq!(request.kind(), DocumentKind::InternshipOfferLetter);
        match request {
            DocumentRequest::InternshipOfferLetter(letter) => {
                assert_eq!(letter.candidate.start_date, date(2026, 11, 2));
                assert_eq!(letter.candidate.months, 1);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_parse_proposal_request() {
        let toml = r#"
kind = "automation-proposal"

[client]
name = "Acme Corp"
country = "India"
phone = "+919812345678"

[dates]
validation = "2026-11-15"

[team]
project_manager = 1
backend_developers = 3
"#;
        let request = DocumentRequest::from_toml_str(toml).unwrap();
        let DocumentRequest::AutomationProposal(proposal) = &request else {
            panic!("unexpected request {:?}", request);
        };
        assert_eq!(proposal.client.email, "");
        assert_eq!(proposal.dates.proposal, None);
        assert_eq!(proposal.dates.validation, Some(date(2026, 11, 15)));
        assert_eq!(proposal.team.backend_developers, 3);
        assert_eq!(proposal.pricing, Pricing::default());
    }

    #[test]
    fn test_parse_request_by_label() {
        let toml = "kind = \"Manychats + CRM Automation - Custom Price\"\n[client]\nname = \"Acme\"\n";
        let request = DocumentRequest::from_toml_str(toml).unwrap();
        assert_eq!(request.kind(), DocumentKind::AutomationProposalCustomPrice);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = DocumentRequest::from_toml_str("kind = \"nda\"").unwrap_err();
        assert!(matches!(err, CoreError::UnknownDocumentType(ref k) if k == "nda"));
    }

    #[test]
    fn test_parse_invalid_request() {
        assert!(matches!(
            DocumentRequest::from_toml_str("kind = \"internship-offer-letter\""),
            Err(CoreError::InvalidRequest(_))
        ));
        assert!(matches!(
            DocumentRequest::from_toml_str("[client]\nname = \"x\""),
            Err(CoreError::InvalidRequest(_))
        ));
    }
}
