use super::errors::*;
use std::collections::BTreeMap;

/// How many of the user's words are handed to the exercise generator.
pub const MAX_WORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Presente,
    PretIndef,
    PretImperf,
    Perf,
    Imperativo,
}

pub const TOPICS: [Topic; 5] = [Topic::Presente,
                                Topic::PretIndef,
                                Topic::PretImperf,
                                Topic::Perf,
                                Topic::Imperativo];

impl Topic {
    pub fn slug(self) -> &'static str {
        match self {
            Topic::Presente => "presente",
            Topic::PretIndef => "pret-indef",
            Topic::PretImperf => "pret-imperf",
            Topic::Perf => "perf",
            Topic::Imperativo => "imperativo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Topic::Presente => "Presente",
            Topic::PretIndef => "Pret. Indefinido",
            Topic::PretImperf => "Pret. Imperfecto",
            Topic::Perf => "Pret. Perfecto",
            Topic::Imperativo => "Imperativo",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Topic> {
        TOPICS.iter().cloned().find(|t| t.slug() == slug)
    }
}

pub fn config() -> BTreeMap<&'static str, &'static str> {
    TOPICS.iter().map(|t| (t.slug(), t.label())).collect()
}

pub fn parse_topics(slugs: &[String]) -> Result<Vec<Topic>> {
    if slugs.is_empty() {
        bail!(ErrorKind::InvalidInput);
    }
    slugs.iter()
        .map(|s| Topic::from_slug(s.trim()).ok_or_else(|| ErrorKind::InvalidInput.into()))
        .collect()
}

/// The user message of the exercise request.
pub fn task_prompt(topics: &[Topic], words: &[String]) -> String {
    let topics = topics.iter().map(|t| t.label()).collect::<Vec<_>>().join(", ");
    let words = words.join(", ");
    format!("Topics: {}. Words to use: {}", topics.to_lowercase(), words.to_lowercase())
}


#[test]
fn test_config_labels() {
    let config = config();
    assert_eq!(config.len(), 5);
    assert_eq!(config["presente"], "Presente");
    assert_eq!(config["pret-indef"], "Pret. Indefinido");
    assert_eq!(config["pret-imperf"], "Pret. Imperfecto");
    assert_eq!(config["perf"], "Pret. Perfecto");
    assert_eq!(config["imperativo"], "Imperativo");
}

#[test]
fn test_parse_topics() {
    let topics = parse_topics(&["perf".to_string(), " presente ".to_string()]).unwrap();
    assert_eq!(topics, vec![Topic::Perf, Topic::Presente]);

    match parse_topics(&[]) {
        Err(Error(ErrorKind::InvalidInput, _)) => (),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
    assert!(parse_topics(&["futuro".to_string()]).is_err());
}

#[test]
fn test_task_prompt() {
    let prompt = task_prompt(&[Topic::Presente, Topic::PretIndef],
                             &["To Take".to_string(), "house".to_string()]);
    assert_eq!(prompt, "Topics: presente, pret. indefinido. Words to use: to take, house");
}
