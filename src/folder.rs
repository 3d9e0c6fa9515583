// Target folder resolution: pick one of the configured folders and make
// sure the service knows it.

use tracing::{debug, info};

use crate::api::{FolderInfo, FolderResult, Session};
use crate::config::{FolderId, ServerProfile};
use crate::error::{Result, UploadError};
use crate::ui::Prompter;

/// A folder the user can choose from.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderChoice {
    pub id: FolderId,
    pub display_name: String,
}

/// Look up every candidate and keep the ones the service reports as
/// existing. Failed or malformed lookups are left out.
pub fn folder_choices(session: &Session, candidates: &[FolderId]) -> Result<Vec<FolderChoice>> {
    let mut choices = Vec::new();
    for id in candidates {
        match session.folder(id) {
            Ok(FolderResult::Found(info)) => choices.push(FolderChoice {
                id: id.clone(),
                display_name: info.name,
            }),
            Ok(FolderResult::NotFound { message }) => {
                debug!(folder = %id, %message, "skipping folder");
            }
            Err(UploadError::BadResponse { reason, .. }) => {
                debug!(folder = %id, %reason, "skipping folder");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(choices)
}

/// Decide which folder to upload into and confirm it exists.
///
/// A single configured folder is used as is. With several, the ones that
/// resolve are offered in a menu; if only one resolves it is taken without
/// asking.
pub fn resolve_target_folder<P: Prompter + ?Sized>(
    session: &Session,
    profile: &ServerProfile,
    prompter: &mut P,
) -> Result<FolderInfo> {
    let id = match profile.target_folders.as_slice() {
        [] => return Err(UploadError::MissingTargetFolder),
        [only] => only.clone(),
        many => {
            let mut choices = folder_choices(session, many)?;
            match choices.len() {
                0 => return Err(UploadError::NoFolderResolved),
                1 => choices.remove(0).id,
                _ => {
                    let labels: Vec<String> =
                        choices.iter().map(|c| c.display_name.clone()).collect();
                    let prompt = format!("Select folder from {}", profile.name);
                    let idx = prompter
                        .select(&prompt, &labels)?
                        .ok_or(UploadError::NoFolderSelected)?;
                    choices.swap_remove(idx).id
                }
            }
        }
    };

    match session.folder(&id)? {
        FolderResult::Found(info) => {
            info!(folder = info.id, name = %info.name, "target folder");
            Ok(info)
        }
        FolderResult::NotFound { message } => Err(UploadError::TargetFolderNotFound { id, message }),
    }
}
