//! The natural-language-to-SQL pipeline.
//!
//! One request runs the stages in a fixed order, each stage feeding the next:
//! fetch and structure the live schema, one chat-completion round-trip with
//! the schema embedded in the system prompt, extract and execute the
//! generated statement, return the normalized result JSON. There is no
//! retry, no tool-call loop, and no state carried between requests.

use crate::{Agent, AgentTool};
use anyhow::Context;
use async_trait::async_trait;
use querypilot_llm::client::LlmClient;
use querypilot_llm::types::{CompletionRequest, ContentBlock, Message};
use querypilot_tools::types::{
    GetSchemaContextRequest, RunSqlQueryRequest, SchemaContextResponse, ToolRequest, ToolResponse,
};
use querypilot_tools::ToolExecutor;
use std::sync::Arc;

pub struct SqlGenerationAgent {
    client: Arc<dyn LlmClient>,
    tools: Arc<ToolExecutor>,
}

impl SqlGenerationAgent {
    pub fn new(client: Arc<dyn LlmClient>, tools: Arc<ToolExecutor>) -> Self {
        Self { client, tools }
    }

    /// Fetch the schema context for the configured default schema. Rebuilt
    /// from the database on every call.
    async fn fetch_schema_context(&self) -> anyhow::Result<SchemaContextResponse> {
        let request = ToolRequest::GetSchemaContext(GetSchemaContextRequest::default());
        let response = self
            .tools
            .execute(request)
            .await
            .context("Schema introspection failed")?;

        match response {
            ToolResponse::SchemaContext(r) => Ok(r),
            other => anyhow::bail!(
                "Unexpected tool response for get_schema_context: {}",
                crate::format_tool_response(&other)
            ),
        }
    }

    /// One chat-completion round-trip: schema in, SQL (as free text) out.
    async fn generate_sql(&self, schema_json: &str, user_query: &str) -> anyhow::Result<String> {
        let request = CompletionRequest {
            messages: vec![Message::user(user_query)],
            max_tokens: 4000,
            model: self.client.model_name().to_string(),
            system: Some(build_system_prompt(schema_json)),
            temperature: Some(0.7),
            top_p: Some(1.0),
            stop_sequences: None,
        };

        let response = self
            .client
            .complete(request)
            .await
            .context("Model invocation failed")?;

        let text = extract_text_from_content(&response.content);
        if text.trim().is_empty() {
            anyhow::bail!("Model returned an empty response");
        }

        Ok(text)
    }

    async fn run_generated_sql(&self, model_response: String) -> anyhow::Result<String> {
        let request = ToolRequest::RunSqlQuery(RunSqlQueryRequest {
            query: model_response,
        });
        let response = self
            .tools
            .execute(request)
            .await
            .context("Query execution failed")?;

        match response {
            ToolResponse::SqlQuery(r) => {
                tracing::info!(sql = %r.query, "Executed generated statement");
                Ok(r.result_json)
            }
            other => anyhow::bail!(
                "Unexpected tool response for run_sql_query: {}",
                crate::format_tool_response(&other)
            ),
        }
    }
}

#[async_trait]
impl Agent for SqlGenerationAgent {
    fn objective(&self) -> &str {
        "Translate natural-language requests into SQL and execute them"
    }

    fn system_prompt(&self) -> String {
        // The live schema context is embedded per request inside execute();
        // outside a request the prompt carries an empty context.
        build_system_prompt("[]")
    }

    fn tools(&self) -> Vec<AgentTool> {
        vec![AgentTool::GetSchemaContext, AgentTool::RunSqlQuery]
    }

    async fn execute(&self, user_prompt: &str) -> anyhow::Result<String> {
        let schema = self.fetch_schema_context().await?;
        tracing::debug!(
            schema = %schema.schema_name,
            tables = schema.tables.len(),
            "Fetched schema context"
        );

        let model_response = self.generate_sql(&schema.schema_json, user_prompt).await?;

        self.run_generated_sql(model_response).await
    }
}

/// System prompt with the serialized schema context embedded verbatim.
fn build_system_prompt(schema_json: &str) -> String {
    format!(
        "You are an expert PostgreSQL assistant. \
         Use the following schema metadata to generate SQL:\n\n\
         {}\n\n\
         Use fully qualified names like 'schema.table'. Respond with a single \
         ```sql fenced block containing exactly one statement, with no \
         comments or extra text.",
        schema_json
    )
}

fn extract_text_from_content(content: &[ContentBlock]) -> String {
    content
        .iter()
        .map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests;
