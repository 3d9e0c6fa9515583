// Configuration: a TOML file with one section per SeedDMS installation.
// Sections are kept in file order so the server menu matches what the
// user wrote.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, UploadError};
use crate::ui::Prompter;

/// A folder reference as written in the config: either the numeric id or a
/// name the service can look up.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FolderId {
    Id(i64),
    Name(String),
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderId::Id(id) => write!(f, "{}", id),
            FolderId::Name(name) => f.write_str(name),
        }
    }
}

impl FolderId {
    fn is_blank(&self) -> bool {
        matches!(self, FolderId::Name(name) if name.trim().is_empty())
    }
}

/// Validated connection parameters of one config section.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerProfile {
    pub name: String,
    pub base_url: String,
    pub username: String,
    /// `None` when the section leaves the password out or empty.
    pub password: Option<String>,
    /// Never empty.
    pub target_folders: Vec<FolderId>,
}

#[derive(Deserialize, Debug)]
struct RawSection {
    #[serde(default)]
    baseurl: String,
    #[serde(default)]
    username: String,
    password: Option<String>,
    targetfolder: Option<RawTarget>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawTarget {
    One(FolderId),
    Many(Vec<FolderId>),
}

/// The parsed config file.
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    sections: Vec<(String, toml::Table)>,
}

/// Default location, `~/.seeddms-upload.conf`.
pub fn default_config_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(".seeddms-upload.conf")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| UploadError::ConfigNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse config text; `path` is only used in error messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let table: toml::Table = text.parse().map_err(|source| UploadError::ConfigInvalid {
            path: path.to_path_buf(),
            source,
        })?;
        let sections = table
            .into_iter()
            .filter_map(|(name, value)| match value {
                toml::Value::Table(t) => Some((name, t)),
                _ => None,
            })
            .collect();
        Ok(Config {
            path: path.to_path_buf(),
            sections,
        })
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Pick the section to use. A file with a single section always uses it,
    /// whatever was requested on the command line.
    pub fn select_section<P: Prompter + ?Sized>(
        &self,
        requested: Option<&str>,
        prompter: &mut P,
    ) -> Result<&str> {
        let names = self.section_names();
        let chosen = match (names.as_slice(), requested) {
            ([], _) => {
                return Err(UploadError::EmptyConfig {
                    path: self.path.clone(),
                })
            }
            ([only], _) => *only,
            (_, Some(wanted)) => names
                .iter()
                .copied()
                .find(|name| *name == wanted)
                .ok_or_else(|| UploadError::UnknownSection(wanted.to_string()))?,
            (_, None) => {
                let labels: Vec<String> = names.iter().map(|n| n.to_string()).collect();
                let idx = prompter
                    .select("Select server", &labels)?
                    .ok_or(UploadError::NoSelection)?;
                names[idx]
            }
        };
        info!(section = chosen, "using config section");
        Ok(chosen)
    }

    /// Extract and validate the profile of a named section.
    pub fn profile(&self, name: &str) -> Result<ServerProfile> {
        let table = self
            .sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.clone())
            .ok_or_else(|| UploadError::UnknownSection(name.to_string()))?;
        let raw: RawSection =
            toml::Value::Table(table)
                .try_into()
                .map_err(|source| UploadError::InvalidSection {
                    name: name.to_string(),
                    source,
                })?;

        let base_url = raw.baseurl.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(UploadError::MissingBaseUrl);
        }

        let target_folders = match raw.targetfolder {
            None => Vec::new(),
            Some(RawTarget::One(id)) => vec![id],
            Some(RawTarget::Many(ids)) => ids,
        };
        if target_folders.is_empty() || target_folders.iter().any(FolderId::is_blank) {
            return Err(UploadError::MissingTargetFolder);
        }

        let password = raw.password.filter(|p| !p.is_empty());
        debug!(
            section = name,
            folders = target_folders.len(),
            has_password = password.is_some(),
            "validated profile"
        );
        Ok(ServerProfile {
            name: name.to_string(),
            base_url,
            username: raw.username,
            password,
            target_folders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::ScriptedPrompter;

    const TWO_SERVERS: &str = r#"
[work]
baseurl = "https://dms.example.com/restapi/index.php/"
username = "alice"
password = "secret"
targetfolder = [12, 14]

[home]
baseurl = "http://localhost/restapi/index.php"
username = "bob"
targetfolder = 1
"#;

    fn parse(text: &str) -> Config {
        Config::parse(Path::new("test.conf"), text).unwrap()
    }

    #[test]
    fn single_section_ignores_requested_name() {
        let config = parse("[only]\nbaseurl = \"http://x\"\ntargetfolder = 3\n");
        let mut prompter = ScriptedPrompter::default();
        let chosen = config
            .select_section(Some("something-else"), &mut prompter)
            .unwrap();
        assert_eq!(chosen, "only");
        assert_eq!(prompter.selects_shown, 0);
    }

    #[test]
    fn requested_section_is_used_without_prompt() {
        let config = parse(TWO_SERVERS);
        let mut prompter = ScriptedPrompter::default();
        assert_eq!(config.select_section(Some("home"), &mut prompter).unwrap(), "home");
        assert_eq!(prompter.selects_shown, 0);
    }

    #[test]
    fn unknown_section_fails() {
        let config = parse(TWO_SERVERS);
        let mut prompter = ScriptedPrompter::default();
        let err = config.select_section(Some("nope"), &mut prompter).unwrap_err();
        assert!(matches!(err, UploadError::UnknownSection(ref s) if s == "nope"));
    }

    #[test]
    fn menu_lists_sections_in_file_order() {
        let config = parse(TWO_SERVERS);
        let mut prompter = ScriptedPrompter::default().with_selects([Some(1)]);
        assert_eq!(config.select_section(None, &mut prompter).unwrap(), "home");
        assert_eq!(prompter.last_choices, vec!["work", "home"]);
    }

    #[test]
    fn cancelled_menu_is_no_selection() {
        let config = parse(TWO_SERVERS);
        let mut prompter = ScriptedPrompter::default().with_selects([None]);
        let err = config.select_section(None, &mut prompter).unwrap_err();
        assert!(matches!(err, UploadError::NoSelection));
    }

    #[test]
    fn empty_config_has_no_sections() {
        let config = parse("# nothing here\n");
        let mut prompter = ScriptedPrompter::default();
        let err = config.select_section(None, &mut prompter).unwrap_err();
        assert!(matches!(err, UploadError::EmptyConfig { .. }));
    }

    #[test]
    fn profile_normalizes_fields() {
        let config = parse(TWO_SERVERS);
        let work = config.profile("work").unwrap();
        assert_eq!(work.base_url, "https://dms.example.com/restapi/index.php");
        assert_eq!(work.password.as_deref(), Some("secret"));
        assert_eq!(work.target_folders, vec![FolderId::Id(12), FolderId::Id(14)]);

        let home = config.profile("home").unwrap();
        assert_eq!(home.password, None);
        assert_eq!(home.target_folders, vec![FolderId::Id(1)]);
    }

    #[test]
    fn mixed_folder_list_is_accepted() {
        let config = parse("[s]\nbaseurl = \"http://x\"\ntargetfolder = [5, \"Invoices\"]\n");
        let profile = config.profile("s").unwrap();
        assert_eq!(
            profile.target_folders,
            vec![FolderId::Id(5), FolderId::Name("Invoices".into())]
        );
    }

    #[test]
    fn empty_password_means_prompt() {
        let config = parse("[s]\nbaseurl = \"http://x\"\npassword = \"\"\ntargetfolder = 1\n");
        assert_eq!(config.profile("s").unwrap().password, None);
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let config = parse("[s]\nbaseurl = \"\"\ntargetfolder = 1\n");
        assert!(matches!(config.profile("s"), Err(UploadError::MissingBaseUrl)));
    }

    #[test]
    fn missing_target_folder_is_rejected() {
        for body in [
            "targetfolder = \"\"",
            "targetfolder = []",
            "targetfolder = [\"\"]",
            "targetfolder = [\"\", 3]",
            "",
        ] {
            let config = parse(&format!("[s]\nbaseurl = \"http://x\"\n{}\n", body));
            assert!(
                matches!(config.profile("s"), Err(UploadError::MissingTargetFolder)),
                "{body}"
            );
        }
    }

    #[test]
    fn wrongly_typed_section_is_invalid() {
        let config = parse("[s]\nbaseurl = 7\ntargetfolder = 1\n");
        assert!(matches!(config.profile("s"), Err(UploadError::InvalidSection { .. })));
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let err = Config::load(Path::new("/nonexistent/seeddms-upload.conf")).unwrap_err();
        assert!(matches!(err, UploadError::ConfigNotFound { .. }));
    }

    #[test]
    fn broken_toml_is_config_invalid() {
        let err = Config::parse(Path::new("x"), "[s\nbaseurl=").unwrap_err();
        assert!(matches!(err, UploadError::ConfigInvalid { .. }));
    }
}
