//! docforge-core - Business documents from DOCX templates
//!
//! Catalog of document types, request parsing and validation, and the
//! pipeline that fills a template and renders it to PDF.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use docforge_core::{DocumentKind, DocumentRequest, PhoneRules};
//!
//! let request = DocumentRequest::from_toml_str(r#"
//! kind = "internship-offer-letter"
//!
//! [candidate]
//! name = "Asha Rao"
//! job = "Sales"
//! start_date = "2026-11-02"
//! stipend = 12000
//! months = 2
//! "#)?;
//!
//! assert_eq!(request.kind(), DocumentKind::InternshipOfferLetter);
//! request.validate(&PhoneRules::default())?;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
//! let placeholders = request.placeholders(today);
//! assert_eq!(placeholders.get("<<Stipend>>"), Some("12,000"));
//! # Ok::<(), docforge_core::CoreError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod request;
pub mod validate;

pub use catalog::{DocumentKind, DocumentTypeSpec, SpecialField, TeamCategory, VALIDATION_DATE};
pub use config::{RendererSettings, Settings, TemplateSettings, ValidationSettings, CONFIG_FILE};
pub use error::{CoreError, Result};
pub use generator::{GeneratedDocuments, Generator};
pub use request::{
    group_thousands, CandidateDetails, ClientDetails, DocumentRequest, OfferLetterRequest,
    Pricing, ProposalDates, ProposalRequest, TeamComposition, TeamRole, JOB_ROLES, TEAM_ROLES,
};
pub use validate::{validate_phone_number, PhoneRule, PhoneRules};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
