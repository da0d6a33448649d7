use anyhow::{Context, Result};
use platform_db::DatabaseSettings;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub default_actor: String,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database = DatabaseSettings::from_env();
        database
            .database_url()
            .context("DATABASE_URL is set but empty")?;

        let default_actor = std::env::var("HR_DEFAULT_ACTOR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| products_hr::DEFAULT_ACTOR.to_string());

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.into()),
        );

        Ok(Self {
            database,
            default_actor,
            cors_allowed_origins,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database: DatabaseSettings::default(),
            default_actor: products_hr::DEFAULT_ACTOR.to_string(),
            cors_allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" https://hr.example.test , ,http://localhost:5173"),
            vec!["https://hr.example.test", "http://localhost:5173"]
        );
        assert!(parse_origins("").is_empty());
    }
}
