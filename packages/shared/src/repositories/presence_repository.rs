use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

use crate::models::presence::{Presence, PresenceStats};
use crate::models::session::Mode;
use crate::repositories::errors::PersistenceError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    async fn upsert_presence(&self, presence: &Presence) -> Result<(), PersistenceError>;
    async fn mark_offline(
        &self,
        connection_id: &str,
        last_seen: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;
    async fn count_online(&self) -> Result<usize, PersistenceError>;
    async fn aggregate_online(&self) -> Result<PresenceStats, PersistenceError>;
}

pub struct DynamoDbPresenceRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbPresenceRepository {
    pub fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct OnlineProjection {
    #[serde(default)]
    language: String,
    #[serde(default)]
    mode: Mode,
}

#[async_trait]
impl PresenceRepository for DynamoDbPresenceRepository {
    async fn upsert_presence(&self, presence: &Presence) -> Result<(), PersistenceError> {
        let item =
            to_item(presence).map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| PersistenceError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn mark_offline(
        &self,
        connection_id: &str,
        last_seen: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(
                "connection_id",
                AttributeValue::S(connection_id.to_string()),
            )
            .update_expression("SET is_online = :offline, last_seen = :last_seen")
            .condition_expression("attribute_exists(connection_id)")
            .expression_attribute_values(":offline", AttributeValue::Bool(false))
            .expression_attribute_values(
                ":last_seen",
                to_attribute_value(last_seen)
                    .map_err(|e| PersistenceError::Serialization(e.to_string()))?,
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let service_error = e.into_service_error();
                // Never went online in the store, nothing to mark.
                if service_error.is_conditional_check_failed_exception() {
                    Ok(())
                } else {
                    Err(PersistenceError::DynamoDb(service_error.to_string()))
                }
            }
        }
    }

    async fn count_online(&self) -> Result<usize, PersistenceError> {
        let mut total = 0usize;
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("is_online = :online")
                .expression_attribute_values(":online", AttributeValue::Bool(true))
                .select(Select::Count)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| PersistenceError::DynamoDb(e.to_string()))?;

            total += output.count.max(0) as usize;
            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(total)
    }

    async fn aggregate_online(&self) -> Result<PresenceStats, PersistenceError> {
        let mut stats = PresenceStats::default();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("is_online = :online")
                .projection_expression("#lang, #mode")
                .expression_attribute_names("#lang", "language")
                .expression_attribute_names("#mode", "mode")
                .expression_attribute_values(":online", AttributeValue::Bool(true))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| PersistenceError::DynamoDb(e.to_string()))?;

            for item in output.items.unwrap_or_default() {
                let row: OnlineProjection =
                    from_item(item).map_err(|e| PersistenceError::Serialization(e.to_string()))?;
                stats.record(&row.language, row.mode);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(stats)
    }
}
