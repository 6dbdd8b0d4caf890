use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::to_item;

#[cfg(test)]
use mockall::automock;

use crate::models::report::Report;
use crate::repositories::errors::PersistenceError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create_report(&self, report: &Report) -> Result<(), PersistenceError>;
}

pub struct DynamoDbReportRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbReportRepository {
    pub fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl ReportRepository for DynamoDbReportRepository {
    async fn create_report(&self, report: &Report) -> Result<(), PersistenceError> {
        let item = to_item(report).map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(report_id)")
            .send()
            .await
            .map_err(|e| PersistenceError::DynamoDb(e.to_string()))?;

        Ok(())
    }
}
