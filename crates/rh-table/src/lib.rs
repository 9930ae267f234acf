//! Session state for RngHelper.
//!
//! The [`Table`] service owns everything that outlives a single command: the
//! per-scope attribute store, the moderator role map and pending check
//! offers. A messaging layer holds one `Table`, turns incoming text into the
//! request types in [`request`], and renders the returned results.

pub mod attributes;
pub mod config;
pub mod error;
pub mod offer;
pub mod request;
pub mod roles;
pub mod segment;
pub mod table;

pub use attributes::{
    Attribute, AttributeChange, AttributeSet, AttributeStore, Removal, Value, format_columns,
    normalize_label,
};
pub use config::TableConfig;
pub use error::{TableError, TableResult};
pub use offer::{CheckDisposition, OfferKind, OfferResolution, PendingCheck};
pub use request::{
    AttributeRemoveRequest, AttributeSetRequest, CheckRequest, EvaluateRequest, EvaluateResult,
    GenerateCharacterRequest, GeneratedCharacter,
};
pub use roles::{ClaimOutcome, RoleState};
pub use segment::{parse_segment, parse_segments};
pub use table::{AttributeCheck, GrowthReport, SanityReport, Table};
