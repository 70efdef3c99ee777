use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static SAMPLE_DIR: Dir = include_dir!("src/samples");

/// Difficulty tier of the sample text pools.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_pool(&self) -> SamplePool {
        SamplePool::new(self.to_string().to_lowercase())
    }

    /// Parse the lowercase tier name used in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        <Difficulty as ValueEnum>::from_str(name, true).ok()
    }
}

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct SamplePool {
    pub name: String,
    pub size: u32,
    pub samples: Vec<String>,
}

impl SamplePool {
    pub fn new(file_name: String) -> Self {
        read_pool_from_file(format!("{file_name}.json")).unwrap()
    }

    /// Pick one reference text at random from the pool.
    pub fn pick(&self) -> String {
        let mut rng = rand::thread_rng();
        self.samples
            .choose(&mut rng)
            .cloned()
            .expect("sample pool is empty")
    }
}

/// Return a random non-empty reference text for the requested tier.
pub fn get_sample(difficulty: Difficulty) -> String {
    difficulty.as_pool().pick()
}

fn read_pool_from_file(file_name: String) -> Result<SamplePool, Box<dyn Error>> {
    let file = SAMPLE_DIR
        .get_file(file_name)
        .expect("Sample pool file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let pool = from_str(file_as_str).expect("Unable to deserialize sample pool json");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_easy() {
        let pool = Difficulty::Easy.as_pool();

        assert_eq!(pool.name, "easy");
        assert!(!pool.samples.is_empty());
        assert_eq!(pool.size as usize, pool.samples.len());
    }

    #[test]
    fn test_pool_medium() {
        let pool = Difficulty::Medium.as_pool();

        assert_eq!(pool.name, "medium");
        assert!(!pool.samples.is_empty());
    }

    #[test]
    fn test_pool_hard() {
        let pool = Difficulty::Hard.as_pool();

        assert_eq!(pool.name, "hard");
        assert!(!pool.samples.is_empty());
    }

    #[test]
    fn test_pick_returns_pool_member() {
        let pool = Difficulty::Easy.as_pool();

        for _ in 0..20 {
            let text = pool.pick();
            assert!(pool.samples.contains(&text));
        }
    }

    #[test]
    fn test_get_sample_is_non_empty_for_every_tier() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert!(!get_sample(difficulty).is_empty());
        }
    }

    #[test]
    fn test_from_name_roundtrip() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let name = difficulty.to_string().to_lowercase();
            assert_eq!(Difficulty::from_name(&name), Some(difficulty));
        }
        assert_eq!(Difficulty::from_name("impossible"), None);
    }

    #[test]
    fn test_pool_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 2,
            "samples": ["hello world", "typing test"]
        }
        "#;

        let pool: SamplePool = from_str(json_data).expect("Failed to deserialize test pool");

        assert_eq!(pool.name, "test");
        assert_eq!(pool.size, 2);
        assert_eq!(pool.samples.len(), 2);
    }

    #[test]
    #[should_panic(expected = "Sample pool file not found")]
    fn test_read_nonexistent_pool_file() {
        let _result = read_pool_from_file("nonexistent.json".to_string());
    }
}
