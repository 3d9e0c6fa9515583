// The upload run shared by both tools:
// config -> section -> login -> target folder -> upload(s).

use std::path::Path;
use tracing::{info, warn};

use crate::api::{ApiClient, FolderInfo, Session, UploadResult};
use crate::config::{Config, ServerProfile};
use crate::error::{Result, UploadError};
use crate::folder::resolve_target_folder;
use crate::payload::UploadPayload;
use crate::ui::Prompter;

/// Load the config file and pick the profile to use. Nothing is sent over
/// the network here.
pub fn load_profile<P: Prompter + ?Sized>(
    config_path: &Path,
    section: Option<&str>,
    prompter: &mut P,
) -> Result<ServerProfile> {
    let config = Config::load(config_path)?;
    let name = config.select_section(section, prompter)?;
    config.profile(name)
}

/// A logged in session together with the folder uploads go to.
pub struct Target {
    pub profile: ServerProfile,
    pub session: Session,
    pub folder: FolderInfo,
}

/// Log in with the profile's credentials, asking for the password if the
/// config has none, then resolve the target folder.
pub fn connect<P: Prompter + ?Sized>(profile: ServerProfile, prompter: &mut P) -> Result<Target> {
    let password = match &profile.password {
        Some(p) => p.clone(),
        None => prompter
            .password("Password")?
            .ok_or(UploadError::MissingPassword)?,
    };

    let spinner = prompter.spinner("Logging in...");
    let login = ApiClient::new(&profile.base_url)
        .and_then(|client| client.login(&profile.username, &password));
    spinner.finish_and_clear();
    let session = login?;

    let folder = resolve_target_folder(&session, &profile, prompter)?;
    Ok(Target {
        profile,
        session,
        folder,
    })
}

impl Target {
    /// Create one document. `label` names the input in failure messages.
    /// Returns the id of the new document.
    pub fn upload<P: Prompter + ?Sized>(
        &self,
        payload: &UploadPayload,
        label: &str,
        prompter: &mut P,
    ) -> Result<i64> {
        let spinner = prompter.spinner(&format!("Uploading {}...", label));
        let result = self.session.upload_document(self.folder.id, payload);
        spinner.finish_and_clear();

        match result? {
            UploadResult::Created { document_id, .. } => {
                info!(document = document_id, folder = self.folder.id, "uploaded");
                prompter.notice(&format!(
                    "File successfully uploaded with id={}",
                    document_id
                ));
                Ok(document_id)
            }
            UploadResult::Failed { message } => {
                warn!(%label, %message, "upload rejected");
                Err(UploadError::UploadFailed {
                    name: label.to_string(),
                    message,
                })
            }
        }
    }
}
