//! Wire field definitions shared by the thing query signals.

use twinproto_types::{JsonFieldDefinition, SchemaVersion};

/// Fields every signal object carries before its own fields.
pub mod envelope {
    use super::*;

    /// The discriminator, e.g. `things.commands.retrieveThing`.
    pub const TYPE: JsonFieldDefinition = JsonFieldDefinition::string("type", SchemaVersion::ALL);
    /// The command name; V1 objects repeat it next to the discriminator.
    pub const COMMAND: JsonFieldDefinition =
        JsonFieldDefinition::string("command", SchemaVersion::V1_ONLY);
    /// The response name; V1 objects repeat it next to the discriminator.
    pub const RESPONSE: JsonFieldDefinition =
        JsonFieldDefinition::string("response", SchemaVersion::V1_ONLY);
    /// The HTTP status of a response.
    pub const STATUS: JsonFieldDefinition = JsonFieldDefinition::number("status", SchemaVersion::ALL);
}

pub const THING_ID: JsonFieldDefinition = JsonFieldDefinition::string("thingId", SchemaVersion::ALL);
pub const THING_IDS: JsonFieldDefinition = JsonFieldDefinition::array("thingIds", SchemaVersion::ALL);
pub const NAMESPACE: JsonFieldDefinition = JsonFieldDefinition::string("namespace", SchemaVersion::ALL);
pub const SELECTED_FIELDS: JsonFieldDefinition =
    JsonFieldDefinition::string("selectedFields", SchemaVersion::ALL);
pub const SNAPSHOT_REVISION: JsonFieldDefinition =
    JsonFieldDefinition::number("snapshotRevision", SchemaVersion::ALL);
pub const FEATURE_ID: JsonFieldDefinition = JsonFieldDefinition::string("featureId", SchemaVersion::ALL);
pub const ATTRIBUTE: JsonFieldDefinition = JsonFieldDefinition::string("attribute", SchemaVersion::ALL);
pub const PROPERTY: JsonFieldDefinition = JsonFieldDefinition::string("property", SchemaVersion::ALL);

pub const THING: JsonFieldDefinition = JsonFieldDefinition::object("thing", SchemaVersion::ALL);
pub const THINGS: JsonFieldDefinition = JsonFieldDefinition::array("things", SchemaVersion::ALL);
pub const ATTRIBUTES: JsonFieldDefinition = JsonFieldDefinition::object("attributes", SchemaVersion::ALL);
pub const FEATURES: JsonFieldDefinition = JsonFieldDefinition::object("features", SchemaVersion::ALL);
pub const FEATURE: JsonFieldDefinition = JsonFieldDefinition::object("feature", SchemaVersion::ALL);
pub const PROPERTIES: JsonFieldDefinition = JsonFieldDefinition::object("properties", SchemaVersion::ALL);
pub const VALUE: JsonFieldDefinition = JsonFieldDefinition::any("value", SchemaVersion::ALL);
pub const POLICY_ID: JsonFieldDefinition = JsonFieldDefinition::string("policyId", SchemaVersion::V2_ONLY);
pub const ACL: JsonFieldDefinition = JsonFieldDefinition::object("acl", SchemaVersion::V1_ONLY);
