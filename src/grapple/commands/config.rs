use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Config;

/// Effective settings and the keys of every known project.
pub fn run(config: &Config, active_key: &str) -> Result<CmdResult> {
    let mut result = CmdResult {
        settings: Some(config.global_settings.clone()),
        projects: config.projects.keys().cloned().collect(),
        ..Default::default()
    };
    result.add_message(CmdMessage::info(format!("Active project: {}", active_key)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;

    #[test]
    fn shows_settings_and_sorted_projects() {
        let mut config = Config::default();
        config.global_settings.save_on_toggle = true;
        config.projects.insert("/b".into(), Project::default());
        config.projects.insert("/a".into(), Project::default());

        let result = run(&config, "/a").unwrap();
        assert!(result.settings.unwrap().save_on_toggle);
        assert_eq!(result.projects, vec!["/a", "/b"]);
        assert_eq!(result.messages[0].content, "Active project: /a");
    }
}
