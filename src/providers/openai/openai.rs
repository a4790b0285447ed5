use async_trait::async_trait;
use crate::config::AppConfig;
use crate::providers::traits::{CompletionProvider, ProviderError};
use async_openai::{
    error::OpenAIError,
    types::{
        CreateChatCompletionRequestArgs,
        ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent,
    },
    Client,
    config::OpenAIConfig,
};

#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    chat_model: String,
    temperature: Option<f32>,
}

impl OpenAIProvider {
    pub fn new(api_key: String, chat_model: String) -> Self {
        Self::with_config(OpenAIConfig::new().with_api_key(api_key), chat_model)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key.clone());
        if let Some(api_url) = &config.api_url {
            openai_config = openai_config.with_api_base(api_url.clone());
        }

        let mut provider = Self::with_config(openai_config, config.chat_model.clone());
        provider.temperature = config.temperature;
        provider
    }

    fn with_config(config: OpenAIConfig, chat_model: String) -> Self {
        Self {
            client: Client::with_config(config),
            chat_model,
            temperature: None,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String, ProviderError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()
            .map_err(map_openai_error)?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Text(prompt.to_string()))
            .build()
            .map_err(map_openai_error)?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.chat_model).messages(vec![
            ChatCompletionRequestMessage::System(system),
            ChatCompletionRequestMessage::User(user),
        ]);
        if let Some(temperature) = self.temperature {
            args.temperature(temperature);
        }
        let request = args.build().map_err(map_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        response.choices.first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ProviderError::InvalidResponse("No response content".to_string()))
    }

    fn get_model_info(&self) -> String {
        self.chat_model.clone()
    }
}

fn map_openai_error(err: OpenAIError) -> ProviderError {
    match err {
        OpenAIError::Reqwest(e) => ProviderError::Network(e.to_string()),
        OpenAIError::ApiError(api) => match api.r#type.as_deref() {
            Some("rate_limit_exceeded") | Some("requests") | Some("tokens") => {
                ProviderError::RateLimited(api.message)
            }
            Some("server_error") => ProviderError::Upstream(api.message),
            _ => ProviderError::Api(api.message),
        },
        OpenAIError::JSONDeserialize(e) => ProviderError::InvalidResponse(e.to_string()),
        other => ProviderError::Api(other.to_string()),
    }
}
