use crate::commands::{CmdMessage, CmdResult};
use crate::config::LaunchConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Show or change `config.json` in `config_dir`. Bad keys and values come
/// back as error messages; only I/O and parse failures are `Err`.
pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = LaunchConfig::load(config_dir)?;
    let message = match action {
        ConfigAction::ShowAll => return Ok(CmdResult::default().with_config(config)),
        ConfigAction::ShowKey(key) => config
            .get(&key)
            .map(CmdMessage::info)
            .unwrap_or_else(|| CmdMessage::error(format!("No such setting: {key}"))),
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                CmdMessage::error(e)
            } else {
                config.save(config_dir)?;
                let stored = config.get(&key).unwrap_or(value);
                let mut result = CmdResult::default().with_config(config);
                result.add_message(CmdMessage::success(format!("{key} is now {stored}")));
                return Ok(result);
            }
        }
    };

    let mut result = CmdResult::default();
    result.add_message(message);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::table::ReorderDiscipline;

    #[test]
    fn set_persists_and_show_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let set = run(
            dir.path(),
            ConfigAction::Set("discipline".into(), "swap".into()),
        )
        .unwrap();
        assert_eq!(set.messages[0].level, MessageLevel::Success);
        assert_eq!(
            LaunchConfig::load(dir.path()).unwrap().discipline,
            ReorderDiscipline::Swap
        );

        let shown = run(dir.path(), ConfigAction::ShowKey("discipline".into())).unwrap();
        assert_eq!(shown.messages[0].content, "swap");
    }

    #[test]
    fn unknown_key_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let shown = run(dir.path(), ConfigAction::ShowKey("colour".into())).unwrap();
        assert_eq!(shown.messages[0].level, MessageLevel::Error);
        assert!(shown.config.is_none());
    }

    #[test]
    fn invalid_set_reports_error_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("columns".into(), "many".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());
    }
}
