use crate::commands::{CmdMessage, CmdResult};
use crate::config::JotConfig;
use crate::error::{JotError, Result};
use crate::store::StorageBackend;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run<S: StorageBackend>(backend: &S, action: ConfigAction) -> Result<CmdResult> {
    let mut config = JotConfig::load(backend)?;
    match action {
        ConfigAction::ShowAll => Ok(CmdResult::default().with_config(config)),
        ConfigAction::ShowKey(key) => {
            let value = config
                .get(&key)
                .ok_or_else(|| JotError::Api(format!("Unknown config key: {}", key)))?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(value));
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value).map_err(JotError::Api)?;
            config.save(backend)?;
            let display = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display)));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemBackend;

    #[test]
    fn shows_defaults() {
        let result = run(&MemBackend::new(), ConfigAction::ShowAll).unwrap();
        let config = result.config.unwrap();
        assert_eq!(config.book, "general");
        assert_eq!(config.editor, "vi");
    }

    #[test]
    fn set_persists_and_show_key_reads_back() {
        let backend = MemBackend::new();
        run(&backend, ConfigAction::Set("editor".into(), "hx".into())).unwrap();

        let result = run(&backend, ConfigAction::ShowKey("editor".into())).unwrap();
        assert_eq!(result.messages[0].content, "hx");
        assert_eq!(JotConfig::load(&backend).unwrap().editor, "hx");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let backend = MemBackend::new();
        assert!(run(&backend, ConfigAction::ShowKey("nope".into())).is_err());
        assert!(run(&backend, ConfigAction::Set("nope".into(), "x".into())).is_err());
        assert_eq!(backend.commit_count(), 0);
    }
}
