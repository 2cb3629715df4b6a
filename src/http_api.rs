use super::*;
use chrono::offset::Utc;
use data_encoding::BASE64;
use pencil::jsonify;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tarjeta_backend::{card, llm, numbers, writing};
use tarjeta_backend::card::CardText;
use tarjeta_backend::numbers::NumberRange;
use tarjeta_backend::time_it;

#[derive(Deserialize)]
struct CardBody {
    word: Option<String>,
    translation: Option<String>,
    example: Option<String>,
}

impl CardBody {
    fn into_text(self) -> Option<CardText> {
        let word = self.word?;
        let translation = self.translation?;
        CardText::new(&word, &translation, self.example.as_ref().map(String::as_str)).ok()
    }
}

#[derive(Deserialize)]
struct LevelBody {
    id: Option<i32>,
    level: Option<i32>,
}

impl LevelBody {
    /// Both the card id and its current level are required to level up.
    fn level_up_args(&self) -> Option<(i32, i32)> {
        Some((self.id?, self.level?))
    }

    fn level_down_id(&self) -> Option<i32> {
        self.id
    }
}

#[derive(Deserialize)]
struct WritingBody {
    topics: Option<Vec<String>>,
}

#[derive(Serialize)]
struct Success {
    success: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardSaved {
    success: bool,
    card_id: i32,
}

#[derive(Serialize)]
struct CardUpdated {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct Article {
    article: String,
}

#[derive(Serialize)]
struct NumberAudio {
    number: i32,
    audio: String,
}

#[derive(Serialize)]
struct WritingExercise {
    success: bool,
    items: Vec<llm::WritingTaskItem>,
}

fn card_id(req: &Request) -> Option<i32> {
    req.view_args.get("id").and_then(|id| id.parse().ok())
}

fn word_param(req: &mut Request) -> Option<String> {
    req.args().get::<str>("word").map(str::trim).filter(|w| !w.is_empty()).map(str::to_string)
}

pub fn get_cards(req: &mut Request) -> PencilResult {
    let (conn, user) = auth_user(req)?;

    let cards = try_500!(card::get_all(&conn, user.id), "Failed to retrieve cards");
    jsonify(&cards)
}

pub fn add_card(req: &mut Request) -> PencilResult {
    let (conn, user) = auth_user(req)?;

    let body: CardBody = read_json!(req, "Missing required fields");
    let text = err_400!(body.into_text(), "Missing required fields");

    let saved = try_500!(card::add(&conn, user.id, &text, Utc::now()), "Failed to save card");
    jsonify(&CardSaved { success: true, card_id: saved.id })
}

pub fn update_card(req: &mut Request) -> PencilResult {
    let (conn, user) = auth_user(req)?;

    let id = err_400!(card_id(req), "Invalid card id");
    let body: CardBody = read_json!(req, "Missing required fields");
    let text = err_400!(body.into_text(), "Missing required fields");

    match try_500!(card::update(&conn, user.id, id, &text), "Failed to update card") {
        Some(_) => jsonify(&CardUpdated { success: true, message: "Card updated successfully" }),
        None => json_error(404, "Card not found"),
    }
}

pub fn reset_all(req: &mut Request) -> PencilResult {
    let (conn, user) = auth_user(req)?;

    try_500!(card::reset_all_for_user(&conn, user.id, Utc::now()), "Failed to reset cards");
    jsonify(&Success { success: true })
}

pub fn get_article(req: &mut Request) -> PencilResult {
    let word = err_400!(word_param(req), "Missing word parameter");

    let article = time_it!("get_article", llm::article(&*LLM_CONFIG, &word)).err_500()?;
    jsonify(&Article { article })
}

pub fn get_translation_suggestions(req: &mut Request) -> PencilResult {
    let word = err_400!(word_param(req), "Missing word parameter");

    let suggestions = time_it!("get_translation_suggestions",
                               llm::translation_suggestions(&*LLM_CONFIG, &word)).err_500()?;
    jsonify(&suggestions)
}

pub fn get_training(req: &mut Request) -> PencilResult {
    let (conn, user) = auth_user(req)?;

    let due = try_500!(card::get_due(&conn, user.id, Utc::now()), "Failed to create training");
    jsonify(&due)
}

pub fn card_levelup(req: &mut Request) -> PencilResult {
    let (conn, user) = auth_user(req)?;

    let body: LevelBody = read_json!(req, "Missing required fields");
    let (id, level) = err_400!(body.level_up_args(), "Missing required fields");

    match try_500!(card::level_up(&conn, user.id, id, level), "Failed to upgrade the card") {
        Some(_) => jsonify(&true),
        None => json_error(404, "Card not found"),
    }
}

pub fn card_leveldown(req: &mut Request) -> PencilResult {
    let (conn, user) = auth_user(req)?;

    let body: LevelBody = read_json!(req, "Missing required fields");
    let id = err_400!(body.level_down_id(), "Missing required fields");

    match try_500!(card::level_down(&conn, user.id, id), "Failed to downgrade the card") {
        Some(_) => jsonify(&Success { success: true }),
        None => json_error(404, "Card not found"),
    }
}

pub fn get_number(req: &mut Request) -> PencilResult {
    let _ = auth_user(req)?;

    let range = NumberRange::parse(req.args().get("Range").map(String::as_str));
    let number = numbers::random_number(range);

    let audio = try_500!(time_it!("number_audio", llm::number_audio(&*LLM_CONFIG, number)),
                         "Failed to generate number audio");
    jsonify(&NumberAudio { number, audio: BASE64.encode(&audio) })
}

pub fn post_writing(req: &mut Request) -> PencilResult {
    let (conn, user) = auth_user(req)?;

    let mut text = String::new();
    req.read_to_string(&mut text).err_500()?;
    let topics = serde_json::from_str::<WritingBody>(&text).ok()
        .and_then(|body| body.topics)
        .and_then(|topics| writing::parse_topics(&topics).ok());
    let topics = try_or!(topics,
        else return json_error(400, "Topics array is required and must not be empty"));

    let words = try_500!(card::random_translations(&conn, user.id, writing::MAX_WORDS),
                         "Failed to create writing exercise");
    let task = try_500!(time_it!("writing_task", llm::writing_task(&*LLM_CONFIG, &topics, &words)),
                        "Failed to create writing exercise");

    jsonify(&WritingExercise { success: true, items: task.items })
}

pub fn get_writing_config(_: &mut Request) -> PencilResult {
    jsonify(&writing::config())
}


#[cfg(test)]
fn level_body(json: &str) -> LevelBody {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_level_up_args() {
    assert_eq!(level_body(r#"{"id": 7, "level": 2}"#).level_up_args(), Some((7, 2)));
    assert_eq!(level_body(r#"{"id": 7, "level": 0}"#).level_up_args(), Some((7, 0)));
}

#[test]
fn test_level_up_args_missing_fields() {
    assert_eq!(level_body(r#"{"level": 2}"#).level_up_args(), None);
    assert_eq!(level_body(r#"{"id": 7}"#).level_up_args(), None);
    assert_eq!(level_body(r#"{"id": 7, "level": null}"#).level_up_args(), None);
    assert_eq!(level_body("{}").level_up_args(), None);
}

#[test]
fn test_level_down_id() {
    assert_eq!(level_body(r#"{"id": 7}"#).level_down_id(), Some(7));
    assert_eq!(level_body(r#"{"id": 7, "level": 3}"#).level_down_id(), Some(7));
    assert_eq!(level_body(r#"{"level": 3}"#).level_down_id(), None);
}
