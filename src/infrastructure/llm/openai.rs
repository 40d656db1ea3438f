use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::{CompletionModel, ToolDefinition};
use rig::message::{AssistantContent, Message as RigMessage};
use rig::providers::openai;

use crate::domain::{
    ports::LlmService, Completion, DomainError, Message, MessageRole, ToolCall, ToolSpec,
};
use crate::infrastructure::config::LlmConfig;

pub struct OpenAiLlm {
    client: openai::Client,
    model: String,
    temperature: Option<f64>,
}

impl OpenAiLlm {
    /// Reads `OPENAI_API_KEY` from the environment.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: openai::Client::from_env(),
            model: model.into(),
            temperature: None,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.model).with_temperature(config.temperature)
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Splits domain messages into a preamble, prior history and the prompt.
fn to_rig_messages(
    messages: &[Message],
) -> Result<(String, Vec<RigMessage>, RigMessage), DomainError> {
    let mut preamble = Vec::new();
    let mut history = Vec::new();
    for message in messages {
        match message.role {
            MessageRole::System => preamble.push(message.content.as_str()),
            MessageRole::User => history.push(RigMessage::user(message.content.clone())),
            MessageRole::Assistant => {
                history.push(RigMessage::assistant(message.content.clone()))
            }
        }
    }

    let prompt = history
        .pop()
        .ok_or_else(|| DomainError::validation("completion needs at least one message"))?;
    Ok((preamble.join("\n\n"), history, prompt))
}

fn to_tool_definition(spec: &ToolSpec) -> ToolDefinition {
    ToolDefinition {
        name: spec.name.clone(),
        description: spec.description.clone(),
        parameters: spec.parameters.clone(),
    }
}

#[async_trait]
impl LlmService for OpenAiLlm {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<Completion, DomainError> {
        let (preamble, history, prompt) = to_rig_messages(messages)?;
        let model = self.client.completion_model(&self.model);

        let mut request = model
            .completion_request(prompt)
            .preamble(preamble)
            .messages(history)
            .tools(tools.iter().map(to_tool_definition).collect());
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::external(format!("completion failed: {e}")))?;

        let mut completion = Completion::default();
        let mut texts = Vec::new();
        for content in response.choice.iter() {
            match content {
                AssistantContent::Text(text) => texts.push(text.text.clone()),
                AssistantContent::ToolCall(call) => completion.tool_calls.push(ToolCall::new(
                    call.function.name.clone(),
                    call.function.arguments.clone(),
                )),
                _ => {}
            }
        }
        completion.content = texts.join("\n");

        Ok(completion)
    }
}
