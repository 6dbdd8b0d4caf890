use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_item};

#[cfg(test)]
use mockall::automock;

use crate::models::chat::ChatMessage;
use crate::repositories::errors::PersistenceError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Stores a transcript entry and returns it as recorded.
    async fn create_message(&self, message: &ChatMessage) -> Result<ChatMessage, PersistenceError>;

    /// The newest `limit` messages of a room, oldest first.
    async fn find_recent_messages(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, PersistenceError>;
}

pub struct DynamoDbChatRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbChatRepository {
    pub fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl ChatRepository for DynamoDbChatRepository {
    async fn create_message(&self, message: &ChatMessage) -> Result<ChatMessage, PersistenceError> {
        let item = to_item(message).map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#seq)")
            .expression_attribute_names("#seq", "sequence")
            .send()
            .await
            .map_err(|e| PersistenceError::DynamoDb(e.to_string()))?;

        Ok(message.clone())
    }

    async fn find_recent_messages(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, PersistenceError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("room_id = :room_id")
            .expression_attribute_values(":room_id", AttributeValue::S(room_id.to_string()))
            .scan_index_forward(false)
            .limit(limit.min(i32::MAX as usize) as i32)
            .send()
            .await
            .map_err(|e| PersistenceError::DynamoDb(e.to_string()))?;

        let items = output.items.unwrap_or_default();
        let mut messages = Vec::with_capacity(items.len());
        for item in items {
            let message: ChatMessage =
                from_item(item).map_err(|e| PersistenceError::Serialization(e.to_string()))?;
            messages.push(message);
        }

        messages.reverse();
        Ok(messages)
    }
}
