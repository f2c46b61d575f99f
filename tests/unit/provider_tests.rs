/*!
 * Tests for the provider request/response types
 */

use yaet::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use yaet::providers::Provider;

#[test]
fn test_openAIRequest_withModel_shouldSerializeModelField() {
    let request = OpenAIRequest::new("my-deployed-model").add_message("user", "Hello");
    let json = serde_json::to_value(&request).expect("request should serialize");

    assert_eq!(json["model"], "my-deployed-model");
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["messages"][0]["content"], "Hello");
}

#[test]
fn test_openAIRequest_withoutSamplingParams_shouldOmitThem() {
    let request = OpenAIRequest::new("gpt-4").add_message("user", "Hi");
    let json = serde_json::to_value(&request).expect("request should serialize");

    assert!(json.get("temperature").is_none());
    assert!(json.get("top_p").is_none());

    let tuned = OpenAIRequest::new("gpt-4")
        .add_message("user", "Hi")
        .temperature(0.5)
        .top_p(1.0);
    let json = serde_json::to_value(&tuned).expect("request should serialize");
    assert_eq!(json["temperature"], 0.5);
    assert_eq!(json["top_p"], 1.0);
}

#[test]
fn test_extractText_withChoices_shouldReturnFirstMessage() {
    let response: OpenAIResponse = serde_json::from_str(
        r#"{"choices":[{"message":{"role":"assistant","content":"translated"}}],
            "usage":{"prompt_tokens":3,"completion_tokens":5,"total_tokens":8}}"#,
    )
    .expect("response should deserialize");

    assert_eq!(OpenAI::extract_text(&response), "translated");
    let usage = response.usage.expect("usage should be present");
    assert_eq!(usage.total_tokens, 8);
}

#[test]
fn test_extractText_withNoChoices_shouldReturnEmpty() {
    let response: OpenAIResponse =
        serde_json::from_str(r#"{"choices":[]}"#).expect("response should deserialize");

    assert_eq!(OpenAI::extract_text(&response), "");
    assert!(response.usage.is_none());
}
