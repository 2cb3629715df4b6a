//! Client for an OpenAI-compatible language model API.
//!
//! Request bodies are built and responses parsed by plain functions, so that
//! they can be tested without a network; the functions doing the actual calls
//! are thin wrappers around them.

use super::errors::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::Read;
use std::time::Duration;
use super::{numbers, writing};
use super::writing::Topic;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-2025-04-14";
pub const DEFAULT_SPEECH_MODEL: &str = "gpt-4o-mini-tts";
pub const SPEECH_INSTRUCTIONS: &str = "Pronounce the text in Spanish naturally.";

const ARTICLE_PROMPT: &str = "You are a Spanish teacher. Your task is to answer, what grammatical \
    gender have the provided nouns. Answer only the single word \"el\", \"la\" or \"no\" if the \
    provided word is not a noun.";

const SUGGESTIONS_PROMPT: &str = "You are a Spanish teacher. Your task is provide translation \
    suggestions from Spanish to English. Provide up to 5 suggestions for a passed word. Examples \
    should contain Spanish example only, the translation of English is not required.";

const WRITING_PROMPT: &str = "You are a Spanish teacher. Your task is to generate 10 sentences in \
    English. The learner's task will be to compose translation for the sentences in Spanish. The \
    sentences should use the provided grammar topic. Each sentence should contain one word from \
    the provided list so that the user practice the specific words on top of the grammar topics.";

const NUMBER_PROMPT: &str = "You are a Spanish teacher. Your task is to write out a given number \
    as a Spanish word. Answer only the single Spanish text for the number, nothing else.";

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub base_url: String,
    pub model: String,
    pub speech_model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub translation: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingTaskItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingTask {
    #[serde(default)]
    pub items: Vec<WritingTaskItem>,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

fn object_schema(name: &str, fields: &[&str], items_of: Option<(&str, &[&str])>) -> Value {
    let mut properties = serde_json::Map::new();
    for field in fields {
        properties.insert(field.to_string(), json!({ "type": "string" }));
    }
    if let Some((array_field, item_fields)) = items_of {
        properties.insert(array_field.to_string(), json!({
            "type": "array",
            "items": object_schema("", item_fields, None)["schema"].clone(),
        }));
    }
    let required: Vec<&String> = properties.keys().collect();
    json!({
        "name": name,
        "strict": true,
        "schema": {
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        },
    })
}

pub fn suggestions_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": object_schema("suggestions", &[], Some(("suggestions", &["translation", "example"]))),
    })
}

pub fn writing_task_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": object_schema("task", &[], Some(("items", &["question", "answer"]))),
    })
}

pub fn chat_body(model: &str, developer_prompt: &str, user_content: &str, response_format: Option<Value>) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [
            { "role": "developer", "content": developer_prompt },
            { "role": "user", "content": user_content },
        ],
    });
    if let Some(format) = response_format {
        body["response_format"] = format;
    }
    body
}

pub fn speech_body(model: &str, voice: &str, input: &str) -> Value {
    json!({
        "model": model,
        "voice": voice,
        "input": input,
        "instructions": SPEECH_INSTRUCTIONS,
    })
}

/// The content of the first choice, if the model sent any.
pub fn parse_chat_content(response: &str) -> Result<Option<String>> {
    let completion: ChatCompletion = serde_json::from_str(response)
        .chain_err(|| ErrorKind::LlmBadResponse("not a chat completion"))?;
    let choice = completion.choices.into_iter().next()
        .ok_or(ErrorKind::LlmBadResponse("no choices in the completion"))?;
    Ok(choice.message.content)
}

/// Structured output, with a missing content treated as an empty object.
pub fn parse_structured<T>(response: &str) -> Result<T>
    where T: serde::de::DeserializeOwned
{
    let content = parse_chat_content(response)?.unwrap_or_else(|| "{}".to_string());
    Ok(serde_json::from_str(&content)
        .chain_err(|| ErrorKind::LlmBadResponse("content doesn't match the schema"))?)
}

pub fn parse_article(response: &str) -> Result<String> {
    let content = parse_chat_content(response)?
        .ok_or(ErrorKind::LlmBadResponse("empty answer"))?;
    Ok(content.trim().trim_end_matches('.').to_lowercase())
}

fn post(config: &LlmConfig, path: &str, body: &Value) -> Result<ureq::Response> {
    let url = format!("{}/{}", config.base_url.trim_end_matches('/'), path);
    let mut req = ureq::post(&url);
    req.set("Authorization", &format!("Bearer {}", config.api_key))
        .set("Content-Type", "application/json")
        .timeout(config.timeout);
    if let Some(ref org) = config.organization {
        req.set("OpenAI-Organization", org);
    }
    if let Some(ref project) = config.project {
        req.set("OpenAI-Project", project);
    }

    debug!("POST {}", url);
    let resp = req.send_string(&serde_json::to_string(body)?);

    if let Some(err) = resp.synthetic_error() {
        error!("Request to {} failed: {}", url, err);
        bail!(ErrorKind::LlmRequestFailed(resp.status(), err.to_string()));
    }
    if !resp.ok() {
        let status = resp.status();
        let body = resp.into_string().unwrap_or_default();
        error!("{} answered with {}: {}", url, status, body);
        bail!(ErrorKind::LlmRequestFailed(status, body));
    }
    Ok(resp)
}

fn chat(config: &LlmConfig, body: &Value) -> Result<String> {
    let resp = post(config, "chat/completions", body)?;
    Ok(resp.into_string()?)
}

pub fn article(config: &LlmConfig, word: &str) -> Result<String> {
    let body = chat_body(&config.model, ARTICLE_PROMPT, word, None);
    parse_article(&chat(config, &body)?)
}

pub fn translation_suggestions(config: &LlmConfig, word: &str) -> Result<Suggestions> {
    let body = chat_body(&config.model, SUGGESTIONS_PROMPT, word, Some(suggestions_format()));
    parse_structured(&chat(config, &body)?)
}

pub fn writing_task(config: &LlmConfig, topics: &[Topic], words: &[String]) -> Result<WritingTask> {
    let prompt = writing::task_prompt(topics, words);
    let body = chat_body(&config.model, WRITING_PROMPT, &prompt, Some(writing_task_format()));
    parse_structured(&chat(config, &body)?)
}

/// The number spelled out in Spanish, or its digits if the model is silent.
pub fn spell_number(config: &LlmConfig, number: i32) -> Result<String> {
    let body = chat_body(&config.model, NUMBER_PROMPT, &number.to_string(), None);
    Ok(parse_chat_content(&chat(config, &body)?)?
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| number.to_string()))
}

pub fn speech(config: &LlmConfig, voice: &str, input: &str) -> Result<Vec<u8>> {
    let resp = post(config, "audio/speech", &speech_body(&config.speech_model, voice, input))?;
    let mut audio = Vec::new();
    resp.into_reader().read_to_end(&mut audio)?;
    if audio.is_empty() {
        bail!(ErrorKind::LlmBadResponse("empty audio"));
    }
    Ok(audio)
}

pub fn number_audio(config: &LlmConfig, number: i32) -> Result<Vec<u8>> {
    let text = spell_number(config, number)?;
    let voice = numbers::random_voice();
    debug!("Number {} is {:?}, voiced by {}.", number, text, voice);
    speech(config, voice, &text)
}


#[cfg(test)]
fn completion_fixture(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop",
        }],
    }).to_string()
}

#[test]
fn test_chat_body() {
    let body = chat_body("model-x", "be a teacher", "casa", None);
    assert_eq!(body["model"], "model-x");
    assert_eq!(body["messages"][0]["role"], "developer");
    assert_eq!(body["messages"][0]["content"], "be a teacher");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "casa");
    assert!(body.get("response_format").is_none());
}

#[test]
fn test_structured_formats() {
    let format = suggestions_format();
    assert_eq!(format["type"], "json_schema");
    assert_eq!(format["json_schema"]["name"], "suggestions");
    assert_eq!(format["json_schema"]["strict"], true);
    let items = &format["json_schema"]["schema"]["properties"]["suggestions"]["items"];
    assert_eq!(items["properties"]["translation"]["type"], "string");
    let required = items["required"].as_array().unwrap();
    assert_eq!(required.len(), 2);
    assert!(required.contains(&json!("translation")) && required.contains(&json!("example")));
    assert_eq!(items["additionalProperties"], false);

    let format = writing_task_format();
    assert_eq!(format["json_schema"]["name"], "task");
    assert_eq!(format["json_schema"]["schema"]["required"], json!(["items"]));
}

#[test]
fn test_speech_body() {
    let body = speech_body(DEFAULT_SPEECH_MODEL, "nova", "mil doscientos");
    assert_eq!(body["model"], "gpt-4o-mini-tts");
    assert_eq!(body["voice"], "nova");
    assert_eq!(body["input"], "mil doscientos");
    assert_eq!(body["instructions"], SPEECH_INSTRUCTIONS);
}

#[test]
fn test_parse_article() {
    assert_eq!(parse_article(&completion_fixture("la")).unwrap(), "la");
    assert_eq!(parse_article(&completion_fixture(" El.\n")).unwrap(), "el");
    assert!(parse_article(r#"{"choices": []}"#).is_err());
    assert!(parse_article("<html>").is_err());
}

#[test]
fn test_parse_suggestions() {
    let content = r#"{"suggestions":[{"translation":"house","example":"Mi casa es tu casa."},
                                     {"translation":"home","example":"Voy a casa."}]}"#;
    let suggestions: Suggestions = parse_structured(&completion_fixture(content)).unwrap();
    assert_eq!(suggestions.suggestions.len(), 2);
    assert_eq!(suggestions.suggestions[1],
               Suggestion { translation: "home".into(), example: "Voy a casa.".into() });

    let no_content = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
    let suggestions: Suggestions = parse_structured(no_content).unwrap();
    assert!(suggestions.suggestions.is_empty());
}

#[test]
fn test_parse_writing_task() {
    let content = r#"{"items":[{"question":"I take the bus.","answer":"Tomo el autobús."}]}"#;
    let task: WritingTask = parse_structured(&completion_fixture(content)).unwrap();
    assert_eq!(task.items[0].answer, "Tomo el autobús.");

    match parse_structured::<WritingTask>(&completion_fixture("not json")) {
        Err(Error(ErrorKind::LlmBadResponse(_), _)) => (),
        other => panic!("Expected LlmBadResponse, got {:?}", other),
    }
}
