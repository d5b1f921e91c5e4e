// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoded message view.

use std::sync::Arc;

use serde_json::json;

use crate::schema::{DefinitionRegistry, FieldType, MessageDefinition};

use super::error::{BagError, Result};
use super::time::RosTime;
use super::value::{DecodedValue, FieldMap};

/// A decoded message together with its type and record metadata.
///
/// Holds a handle to the registry so nested fields can be re-viewed as
/// messages of their own type.
#[derive(Debug, Clone)]
pub struct RosMessage {
    definition: Arc<MessageDefinition>,
    registry: Arc<DefinitionRegistry>,
    time: RosTime,
    connection_id: i32,
    fields: FieldMap,
}

impl RosMessage {
    /// Create a message view from decoded fields.
    pub fn new(
        definition: Arc<MessageDefinition>,
        registry: Arc<DefinitionRegistry>,
        time: RosTime,
        connection_id: i32,
        fields: FieldMap,
    ) -> Self {
        Self {
            definition,
            registry,
            time,
            connection_id,
            fields,
        }
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Result<&DecodedValue> {
        self.fields
            .get(name)
            .ok_or_else(|| BagError::unknown_field(name))
    }

    /// View a nested message field as a message of its declared type.
    ///
    /// The sub-message shares this message's time and connection.
    pub fn get_field_as_submessage(&self, name: &str) -> Result<RosMessage> {
        let value = self.get_field(name)?;
        let fields = value
            .as_message()
            .ok_or_else(|| BagError::wrong_variant(name, "message", value.type_name()))?;

        let type_name = match self.definition.field(name).map(|f| &f.field_type) {
            Some(FieldType::Named(type_name)) => type_name,
            _ => return Err(BagError::wrong_variant(name, "message", value.type_name())),
        };
        let definition = self.registry.resolve_or_err(type_name)?;

        Ok(RosMessage {
            definition,
            registry: Arc::clone(&self.registry),
            time: self.time,
            connection_id: self.connection_id,
            fields: fields.clone(),
        })
    }

    /// View every element of a message array field as a message.
    pub fn get_array_as_submessages(&self, name: &str) -> Result<Vec<RosMessage>> {
        let value = self.get_field(name)?;
        let items = value
            .as_array()
            .ok_or_else(|| BagError::wrong_variant(name, "array", value.type_name()))?;

        let type_name = match self.definition.field(name).map(|f| &f.field_type) {
            Some(FieldType::Array { element, .. }) => match element.as_ref() {
                FieldType::Named(type_name) => type_name,
                _ => return Err(BagError::wrong_variant(name, "message array", "array")),
            },
            _ => return Err(BagError::wrong_variant(name, "array", value.type_name())),
        };
        let definition = self.registry.resolve_or_err(type_name)?;

        items
            .iter()
            .map(|item| {
                let fields = item
                    .as_message()
                    .ok_or_else(|| BagError::wrong_variant(name, "message", item.type_name()))?;
                Ok(RosMessage {
                    definition: Arc::clone(&definition),
                    registry: Arc::clone(&self.registry),
                    time: self.time,
                    connection_id: self.connection_id,
                    fields: fields.clone(),
                })
            })
            .collect()
    }

    /// Field names in declared order.
    pub fn field_names(&self) -> Vec<&str> {
        self.definition.field_names()
    }

    /// Registered type name.
    pub fn type_name(&self) -> &str {
        &self.definition.type_name
    }

    /// The message type definition.
    pub fn definition(&self) -> &Arc<MessageDefinition> {
        &self.definition
    }

    /// Record time from the bag.
    pub fn time(&self) -> RosTime {
        self.time
    }

    /// Id of the connection the message was recorded on.
    pub fn connection_id(&self) -> i32 {
        self.connection_id
    }

    /// Decoded fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Consume the view, keeping the fields.
    pub fn into_fields(self) -> FieldMap {
        self.fields
    }

    /// JSON object with the record metadata and the decoded fields.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "type": self.type_name(),
            "connection": self.connection_id,
            "time": self.time.to_string(),
            "fields": self.fields,
        })
    }
}
