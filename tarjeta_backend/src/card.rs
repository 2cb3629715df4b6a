use super::*;
use chrono::{DateTime, offset::Utc};
use super::training::Transition;
use unicode_normalization::UnicodeNormalization;

/// Word, translation and example as typed by the user, cleaned up for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CardText {
    pub word: String,
    pub translation: String,
    pub example: Option<String>,
}

fn clean(text: &str) -> String {
    text.trim().nfc().collect()
}

impl CardText {
    /// Both `word` and `translation` must be non-empty.
    /// An empty example is the same as no example at all.
    pub fn new(word: &str, translation: &str, example: Option<&str>) -> Result<Self> {
        let word = clean(word);
        let translation = clean(translation);
        if word.is_empty() || translation.is_empty() {
            bail!(ErrorKind::InvalidInput);
        }
        let example = example.map(clean).filter(|e| !e.is_empty());
        Ok(CardText { word, translation, example })
    }
}

pub fn add(conn: &PgConnection, user_id: i32, text: &CardText, now: DateTime<Utc>) -> Result<Card> {
    use schema::cards;

    let new_card = NewCard {
        user_id,
        word: &text.word,
        translation: &text.translation,
        example: text.example.as_ref().map(String::as_str),
        level: 0,
        next_repeat: now,
    };

    let card: Card = diesel::insert_into(cards::table)
        .values(&new_card)
        .get_result(conn)
        .chain_err(|| "Couldn't create a new card!")?;

    debug!("User {} added card {}: {:?}", user_id, card.id, text);
    Ok(card)
}

pub fn update(conn: &PgConnection, user_id: i32, id: i32, text: &CardText) -> Result<Option<Card>> {
    use schema::cards;

    let changes = UpdateCard {
        word: &text.word,
        translation: &text.translation,
        example: text.example.as_ref().map(String::as_str),
    };

    Ok(diesel::update(cards::table
            .filter(cards::id.eq(id))
            .filter(cards::user_id.eq(user_id)))
        .set(&changes)
        .get_result(conn)
        .optional()?)
}

pub fn get(conn: &PgConnection, user_id: i32, id: i32) -> Result<Option<Card>> {
    use schema::cards;

    Ok(cards::table
        .filter(cards::id.eq(id))
        .filter(cards::user_id.eq(user_id))
        .get_result(conn)
        .optional()?)
}

/// Newest first.
pub fn get_all(conn: &PgConnection, user_id: i32) -> Result<Vec<Card>> {
    use schema::cards;

    Ok(cards::table
        .filter(cards::user_id.eq(user_id))
        .order((cards::created_at.desc(), cards::id.desc()))
        .get_results(conn)?)
}

/// Cards whose review date has passed, the most overdue first.
pub fn get_due(conn: &PgConnection, user_id: i32, now: DateTime<Utc>) -> Result<Vec<Card>> {
    use schema::cards;

    Ok(cards::table
        .filter(cards::user_id.eq(user_id))
        .filter(cards::next_repeat.lt(now))
        .order((cards::next_repeat.asc(), cards::id.asc()))
        .get_results(conn)?)
}

pub fn count(conn: &PgConnection, user_id: i32, now: DateTime<Utc>) -> Result<(i64, i64)> {
    use schema::cards;

    let total: i64 = cards::table
        .filter(cards::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    let due: i64 = cards::table
        .filter(cards::user_id.eq(user_id))
        .filter(cards::next_repeat.lt(now))
        .count()
        .get_result(conn)?;

    Ok((total, due))
}

/// Returns `None` if there's no such card, or if it belongs to somebody else.
pub fn apply_transition(conn: &PgConnection,
                        user_id: i32,
                        id: i32,
                        transition: Transition)
                        -> Result<Option<Card>> {
    use schema::cards;

    let card: Option<Card> = diesel::update(cards::table
            .filter(cards::id.eq(id))
            .filter(cards::user_id.eq(user_id)))
        .set((cards::level.eq(transition.level),
              cards::next_repeat.eq(transition.next_repeat)))
        .get_result(conn)
        .optional()?;

    if card.is_some() {
        debug!("Card {} of user {} is now at level {}, due {}.",
               id, user_id, transition.level, transition.next_repeat);
    }
    Ok(card)
}

/// `level` is the level the client saw when the card was reviewed.
pub fn level_up(conn: &PgConnection, user_id: i32, id: i32, level: i32) -> Result<Option<Card>> {
    apply_transition(conn, user_id, id, training::advance(level))
}

pub fn level_down(conn: &PgConnection, user_id: i32, id: i32) -> Result<Option<Card>> {
    apply_transition(conn, user_id, id, training::regress())
}

pub fn reset_all_for_user(conn: &PgConnection, user_id: i32, now: DateTime<Utc>) -> Result<usize> {
    use schema::cards;

    let count = diesel::update(cards::table.filter(cards::user_id.eq(user_id)))
        .set((cards::level.eq(0), cards::next_repeat.eq(now)))
        .execute(conn)?;

    info!("Reset {} cards of user {}.", count, user_id);
    Ok(count)
}

pub fn reset_all(conn: &PgConnection, now: DateTime<Utc>) -> Result<usize> {
    use schema::cards;

    let count = diesel::update(cards::table)
        .set((cards::level.eq(0), cards::next_repeat.eq(now)))
        .execute(conn)?;

    info!("Reset all {} cards.", count);
    Ok(count)
}

/// Up to `max` translations picked at random from the user's cards.
pub fn random_translations(conn: &PgConnection, user_id: i32, max: usize) -> Result<Vec<String>> {
    use schema::cards;
    use rand::seq::SliceRandom;

    let mut translations: Vec<String> = cards::table
        .filter(cards::user_id.eq(user_id))
        .select(cards::translation)
        .get_results(conn)?;

    let mut rng = rand::thread_rng();
    translations.shuffle(&mut rng);
    translations.truncate(max);
    Ok(translations)
}


#[test]
fn test_card_text_trims_and_normalizes() {
    // "cañón" with combining tildes and a combining acute accent
    let text = CardText::new("  can\u{303}o\u{301}n ", " canyon\t", Some("  ")).unwrap();
    assert_eq!(text.word, "cañón");
    assert_eq!(text.translation, "canyon");
    assert_eq!(text.example, None);
}

#[test]
fn test_card_text_keeps_example() {
    let text = CardText::new("tomar", "to take", Some(" Voy a tomar un café. ")).unwrap();
    assert_eq!(text.example.as_ref().map(String::as_str), Some("Voy a tomar un café."));
}

#[test]
fn test_card_text_requires_word_and_translation() {
    assert!(CardText::new("", "to take", None).is_err());
    assert!(CardText::new("tomar", "   ", None).is_err());
    match CardText::new(" ", " ", Some("ejemplo")) {
        Err(Error(ErrorKind::InvalidInput, _)) => (),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}
