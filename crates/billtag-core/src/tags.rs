//! Tag definition types.
//!
//! A tag definition is either one of the built-in [`ControlTagType`]s or a
//! user-defined record held in the database. Both share the same read-only
//! view (`name`, `description`, `is_control_tag`).

use serde::{Deserialize, Serialize};

/// Maximum length of a user-defined tag definition name.
pub const MAX_NAME_LENGTH: usize = 20;

/// Maximum length of a user-defined tag definition description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

// =============================================================================
// CONTROL TAGS
// =============================================================================

/// Built-in control tags. These are compiled in and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlTagType {
    AutoPayOff,
    AutoInvoicingOff,
    OverdueEnforcementOff,
    WrittenOff,
}

impl ControlTagType {
    /// All control tags, in declaration order.
    pub const ALL: [ControlTagType; 4] = [
        ControlTagType::AutoPayOff,
        ControlTagType::AutoInvoicingOff,
        ControlTagType::OverdueEnforcementOff,
        ControlTagType::WrittenOff,
    ];

    /// The identifier under which the control tag is exposed as a definition name.
    pub fn name(&self) -> &'static str {
        match self {
            ControlTagType::AutoPayOff => "AUTO_PAY_OFF",
            ControlTagType::AutoInvoicingOff => "AUTO_INVOICING_OFF",
            ControlTagType::OverdueEnforcementOff => "OVERDUE_ENFORCEMENT_OFF",
            ControlTagType::WrittenOff => "WRITTEN_OFF",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ControlTagType::AutoPayOff => "Suspends payments until removed.",
            ControlTagType::AutoInvoicingOff => "Suspends invoicing until removed.",
            ControlTagType::OverdueEnforcementOff => {
                "Suspends overdue enforcement behaviour until removed."
            }
            ControlTagType::WrittenOff => {
                "Indicated that an invoice is written off. No billing or payment effect."
            }
        }
    }

    /// Whether an account carrying this tag has automatic payments suspended.
    pub fn auto_payment_off(&self) -> bool {
        matches!(self, ControlTagType::AutoPayOff)
    }

    /// Whether an account carrying this tag has invoicing suspended.
    pub fn auto_invoicing_off(&self) -> bool {
        matches!(self, ControlTagType::AutoInvoicingOff)
    }

    /// Exact, case-sensitive lookup by identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// Returns true if `name` is reserved by a control tag.
    pub fn is_control_tag_name(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    /// Materialize this control tag as a tag definition.
    pub fn to_definition(self) -> TagDefinition {
        TagDefinition::Control(self)
    }
}

impl std::fmt::Display for ControlTagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ControlTagType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Invalid control tag: {}", s))
    }
}

// =============================================================================
// TAG DEFINITIONS
// =============================================================================

/// A tag definition created by a user and stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTagDefinition {
    pub name: String,
    pub description: String,
}

impl UserTagDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A tag definition: either a built-in control tag or a user-defined record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TagDefinitionRecord", try_from = "TagDefinitionRecord")]
pub enum TagDefinition {
    Control(ControlTagType),
    UserDefined(UserTagDefinition),
}

impl TagDefinition {
    /// Build a user-defined definition.
    pub fn user_defined(name: impl Into<String>, description: impl Into<String>) -> Self {
        TagDefinition::UserDefined(UserTagDefinition::new(name, description))
    }

    pub fn name(&self) -> &str {
        match self {
            TagDefinition::Control(tag) => tag.name(),
            TagDefinition::UserDefined(def) => &def.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            TagDefinition::Control(tag) => tag.description(),
            TagDefinition::UserDefined(def) => &def.description,
        }
    }

    pub fn is_control_tag(&self) -> bool {
        matches!(self, TagDefinition::Control(_))
    }

    pub fn control_tag_type(&self) -> Option<ControlTagType> {
        match self {
            TagDefinition::Control(tag) => Some(*tag),
            TagDefinition::UserDefined(_) => None,
        }
    }
}

impl From<ControlTagType> for TagDefinition {
    fn from(tag: ControlTagType) -> Self {
        TagDefinition::Control(tag)
    }
}

impl From<UserTagDefinition> for TagDefinition {
    fn from(def: UserTagDefinition) -> Self {
        TagDefinition::UserDefined(def)
    }
}

/// Flat wire shape of a [`TagDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDefinitionRecord {
    pub name: String,
    pub description: String,
    pub is_control_tag: bool,
}

impl From<TagDefinition> for TagDefinitionRecord {
    fn from(def: TagDefinition) -> Self {
        Self {
            name: def.name().to_string(),
            description: def.description().to_string(),
            is_control_tag: def.is_control_tag(),
        }
    }
}

impl TryFrom<TagDefinitionRecord> for TagDefinition {
    type Error = String;

    fn try_from(record: TagDefinitionRecord) -> std::result::Result<Self, Self::Error> {
        if record.is_control_tag {
            ControlTagType::from_name(&record.name)
                .map(TagDefinition::Control)
                .ok_or_else(|| format!("Invalid control tag: {}", record.name))
        } else {
            Ok(TagDefinition::user_defined(record.name, record.description))
        }
    }
}

/// Check a user-defined name and description against the column limits.
///
/// Returns Ok(()) if valid, Err with message if invalid.
pub fn validate_tag_definition(name: &str, description: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Tag definition name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Tag definition name must be {} characters or less",
            MAX_NAME_LENGTH
        ));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Tag definition description must be {} characters or less",
            MAX_DESCRIPTION_LENGTH
        ));
    }
    Ok(())
}
