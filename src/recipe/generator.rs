//! Recipe generation: request in, recipe JSON out.
//!
//! [`RecipeGenerator::generate`] validates the request, renders the prompt pair,
//! makes a single logical call to the completion API and relays the model's JSON
//! unmodified. The call races the caller's [`CancelToken`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::cancel::CancelToken;
use crate::config::UpstreamConfig;
use crate::error::RecipeError;
use crate::recipe::prompt::PromptPair;
use crate::recipe::request::RecipeRequest;
use crate::upstream::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, CompletionClient,
    HttpCompletionClient, ResponseFormat, UpstreamError,
};

/// Builds the prompt pair, calls the completion API once and relays the recipe.
pub struct RecipeGenerator {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl RecipeGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build a generator backed by the HTTP completion client.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = HttpCompletionClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The two-message conversation sent upstream, constrained to a JSON object.
    pub fn build_request(&self, request: &RecipeRequest) -> ChatCompletionRequest {
        let prompts = PromptPair::for_request(request);
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts.system),
                ChatMessage::user(prompts.user),
            ],
            response_format: Some(ResponseFormat::json_object()),
        }
    }

    pub async fn generate(
        &self,
        request: &RecipeRequest,
        cancel: &CancelToken,
    ) -> Result<Value, RecipeError> {
        request.validate()?;

        info!(
            ingredients = ?request.ingredients,
            cooking_time = request.cooking_time,
            meal_type = request.meal_type,
            dietary_preferences = ?request.dietary_preferences,
            "Generating recipe"
        );

        let completion = self.build_request(request);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RecipeError::Cancelled),
            result = self.client.complete(&completion) => result?,
        };

        if let Some(usage) = &response.usage {
            debug!(
                id = ?response.id,
                model = ?response.model,
                finish_reason = ?response.choices.first().and_then(|c| c.finish_reason.as_deref()),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion usage"
            );
        }

        let recipe = extract_recipe(&response)?;
        info!("Recipe generated successfully");
        Ok(recipe)
    }
}

/// Pull the first choice's content and parse it as JSON.
///
/// Shape is not checked beyond that: any valid JSON value, including an object
/// missing recipe fields or an array, is returned as-is.
pub fn extract_recipe(response: &ChatCompletionResponse) -> Result<Value, RecipeError> {
    let content = response.first_content().ok_or_else(|| {
        error!(choices = response.choices.len(), "Completion has no message content");
        RecipeError::Parse("completion has no message content".to_string())
    })?;

    let value: Value = serde_json::from_str(content).map_err(|e| {
        error!(error = %e, content, "Completion content is not valid JSON");
        RecipeError::Parse(e.to_string())
    })?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every request and replies with a canned result.
    struct ScriptedClient {
        calls: Mutex<Vec<ChatCompletionRequest>>,
        reply: fn() -> Result<ChatCompletionResponse, UpstreamError>,
        delay: Duration,
    }

    impl ScriptedClient {
        fn new(reply: fn() -> Result<ChatCompletionResponse, UpstreamError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply,
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(
            &self,
            request: &ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse, UpstreamError> {
            self.calls.lock().unwrap().push(request.clone());
            tokio::time::sleep(self.delay).await;
            (self.reply)()
        }
    }

    fn completion(content: &str) -> ChatCompletionResponse {
        serde_json::from_value(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        }))
        .unwrap()
    }

    fn request() -> RecipeRequest {
        RecipeRequest {
            ingredients: vec!["egg".to_string(), "rice".to_string()],
            cooking_time: "30 minutes".to_string(),
            meal_type: "Dinner".to_string(),
            dietary_preferences: vec![],
        }
    }

    #[test]
    fn test_build_request_shape() {
        let generator = RecipeGenerator::new(Arc::new(ScriptedClient::new(|| unreachable!())), "m1");
        let req = generator.build_request(&request());

        assert_eq!(req.model, "m1");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].role, "user");
        assert_eq!(req.response_format, Some(ResponseFormat::json_object()));
        for needle in ["egg", "rice", "30 minutes", "Dinner", "None"] {
            assert!(req.messages[1].content.contains(needle));
        }
    }

    #[tokio::test]
    async fn test_generate_issues_exactly_one_call() {
        let client = Arc::new(ScriptedClient::new(|| {
            Ok(completion(r#"{"title":"Egg Fried Rice","servings":2}"#))
        }));
        let generator = RecipeGenerator::new(client.clone(), "m1");

        let recipe = generator.generate(&request(), &CancelToken::new()).await.unwrap();
        assert_eq!(recipe, json!({ "title": "Egg Fried Rice", "servings": 2 }));
        assert_eq!(client.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_never_calls_upstream() {
        let client = Arc::new(ScriptedClient::new(|| unreachable!()));
        let generator = RecipeGenerator::new(client.clone(), "m1");

        let mut req = request();
        req.ingredients.clear();
        let err = generator.generate(&req, &CancelToken::new()).await.unwrap_err();
        assert!(matches!(err, RecipeError::InvalidRequest(_)));
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_is_relayed() {
        let generator = RecipeGenerator::new(
            Arc::new(ScriptedClient::new(|| Err(UpstreamError::RateLimited))),
            "m1",
        );
        let err = generator.generate(&request(), &CancelToken::new()).await.unwrap_err();
        assert!(matches!(err, RecipeError::Upstream(UpstreamError::RateLimited)));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_in_flight_call() {
        let mut client = ScriptedClient::new(|| Ok(completion("{}")));
        client.delay = Duration::from_secs(30);
        let generator = RecipeGenerator::new(Arc::new(client), "m1");

        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = tokio::time::timeout(Duration::from_secs(5), generator.generate(&request(), &cancel))
            .await
            .expect("cancellation should end the call")
            .unwrap_err();
        assert!(matches!(err, RecipeError::Cancelled));
    }

    #[test]
    fn test_extract_recipe_passes_object_through() {
        let content = r#"{"title":"Soup","extra":{"nested":[1,2]}}"#;
        let value = extract_recipe(&completion(content)).unwrap();
        assert_eq!(value, json!({ "title": "Soup", "extra": { "nested": [1, 2] } }));
    }

    #[test]
    fn test_extract_recipe_passes_non_object_values_through() {
        let list = extract_recipe(&completion(r#"[{"title":"A"},{"title":"B"}]"#)).unwrap();
        assert_eq!(list, json!([{ "title": "A" }, { "title": "B" }]));

        assert_eq!(extract_recipe(&completion("null")).unwrap(), Value::Null);
        assert_eq!(
            extract_recipe(&completion(r#""just text""#)).unwrap(),
            json!("just text")
        );
    }

    #[test]
    fn test_extract_recipe_keeps_key_order() {
        let content = r#"{"title":"Soup","description":"d","cookingTime":"5","servings":2}"#;
        let value = extract_recipe(&completion(content)).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), content);
    }

    #[test]
    fn test_extract_recipe_rejects_invalid_content() {
        assert!(matches!(
            extract_recipe(&completion("not json")),
            Err(RecipeError::Parse(_))
        ));
        assert!(matches!(
            extract_recipe(&completion("{\"title\": ")),
            Err(RecipeError::Parse(_))
        ));

        let empty: ChatCompletionResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(extract_recipe(&empty), Err(RecipeError::Parse(_))));
    }
}
