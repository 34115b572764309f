use std::env;
use std::path::PathBuf;

use folio_core::{AppError, AppResult};
use folio_domain::EditabilitySettings;

#[derive(Debug, Clone)]
pub struct AccessctlConfig {
    pub seed_file: PathBuf,
    pub editability: EditabilitySettings,
}

impl AccessctlConfig {
    pub fn load() -> AppResult<Self> {
        let seed_file = PathBuf::from(required_env("FOLIO_SEED_FILE")?);
        let auto_lock_on_edit = parse_env_bool("FOLIO_AUTO_LOCK_ON_EDIT", false)?;
        let temp_file_project_override =
            parse_env_bool("FOLIO_TEMP_FILE_PROJECT_OVERRIDE", false)?;

        Ok(Self {
            seed_file,
            editability: EditabilitySettings::new(auto_lock_on_edit, temp_file_project_override),
        })
    }
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_env_bool(name: &str, default: bool) -> AppResult<bool> {
    match env::var(name) {
        Ok(value) => parse_bool(name, value.as_str()),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "invalid {name} value '{value}': expected true or false"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use folio_core::AppError;

    use super::parse_bool;

    #[test]
    fn booleans_accept_common_spellings() {
        assert!(matches!(parse_bool("FLAG", "TRUE"), Ok(true)));
        assert!(matches!(parse_bool("FLAG", " 1 "), Ok(true)));
        assert!(matches!(parse_bool("FLAG", "no"), Ok(false)));
    }

    #[test]
    fn invalid_boolean_names_the_variable() {
        let result = parse_bool("FOLIO_AUTO_LOCK_ON_EDIT", "maybe");
        assert!(matches!(
            result,
            Err(AppError::Validation(message)) if message.contains("FOLIO_AUTO_LOCK_ON_EDIT")
        ));
    }
}
