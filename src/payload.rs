// Upload payloads: the bytes to store plus the document metadata derived
// from either an email's headers or a file name.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use mailparse::{MailHeaderMap, MailParseError};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, UploadError};
use crate::ui::Prompter;

/// Content and metadata of one document to create.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPayload {
    pub body: Vec<u8>,
    pub document_name: String,
    pub comment: Option<String>,
    pub original_filename: String,
}

/// The headers of an email that name the uploaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailHeaders {
    pub subject: String,
    pub from: Option<String>,
    pub message_id: Option<String>,
    pub date: NaiveDate,
}

/// Extract subject, sender, message id and date. `Date` and `Subject` are
/// required; anything without them is not treated as an email.
pub fn parse_email_headers(raw: &[u8]) -> Result<EmailHeaders> {
    let (headers, _) =
        mailparse::parse_headers(raw).map_err(|_: MailParseError| UploadError::NotAnEmail)?;

    let raw_date = headers.get_first_value("Date");
    let subject = headers.get_first_value("Subject");
    let (raw_date, subject) = match (raw_date, subject) {
        (Some(d), Some(s)) => (d, s),
        _ => return Err(UploadError::NotAnEmail),
    };

    let message_id = headers
        .get_first_header("Message-ID")
        .map(|h| String::from_utf8_lossy(h.get_value_raw()).trim().to_string())
        .filter(|id| !id.is_empty());
    let from = headers
        .get_first_value("From")
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    Ok(EmailHeaders {
        subject: subject.trim().to_string(),
        from,
        message_id,
        date: parse_date(&raw_date)?,
    })
}

/// Parse an email `Date` header into the sender's calendar day.
///
/// RFC 2822 (with obsolete zone names) keeps the sender's offset. ISO and
/// asctime layouts seen from broken mailers come next, then `mailparse`'s
/// lenient parser, which normalizes to UTC. A trailing zone name none of
/// them knows (`CEST`, `MEZ`, ...) is dropped and the wall-clock time is
/// taken as is.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = strip_comment(raw.trim());
    parse_date_with_zone(trimmed)
        .or_else(|| strip_zone_name(trimmed).and_then(parse_wall_clock))
        .ok_or_else(|| UploadError::BadDate(raw.to_string()))
}

fn parse_date_with_zone(date: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(date) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.date_naive());
    }
    parse_wall_clock(date).or_else(|| {
        mailparse::dateparse(date)
            .ok()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.date_naive())
    })
}

// Layouts without any zone.
fn parse_wall_clock(date: &str) -> Option<NaiveDate> {
    const LAYOUTS: [&str; 7] = [
        "%a, %d %b %Y %H:%M:%S",
        "%d %b %Y %H:%M:%S",
        "%a, %d %b %Y %H:%M",
        "%a %b %e %H:%M:%S %Y",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(date, layout).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
}

// "... 09:00:00 CEST" -> "... 09:00:00"
fn strip_zone_name(date: &str) -> Option<&str> {
    let (rest, zone) = date.rsplit_once(char::is_whitespace)?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(rest.trim_end())
}

// "... +0200 (CEST)" -> "... +0200"
fn strip_comment(date: &str) -> &str {
    match (date.ends_with(')'), date.rfind('(')) {
        (true, Some(open)) => date[..open].trim_end(),
        _ => date,
    }
}

impl UploadPayload {
    /// Build the payload for a complete email message. The body is the
    /// message exactly as read.
    pub fn from_email(raw: Vec<u8>) -> Result<Self> {
        let headers = parse_email_headers(&raw)?;
        let day = headers.date.format("%Y-%m-%d").to_string();
        let stem = headers
            .message_id
            .clone()
            .unwrap_or_else(|| headers.subject.clone());
        debug!(subject = %headers.subject, %day, "parsed email");
        Ok(UploadPayload {
            document_name: format!("{}-{}", headers.subject, day),
            comment: headers.from,
            original_filename: format!("{}-{}.eml", stem, day),
            body: raw,
        })
    }

    /// Payload for a file on disk, named after its base name.
    pub fn from_file(path: &Path) -> Result<Self> {
        let body = fs::read(path).map_err(|source| UploadError::FileReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(UploadPayload {
            body,
            document_name: name.clone(),
            comment: None,
            original_filename: name,
        })
    }

    /// Payload for content without a name of its own; `name` becomes both
    /// the document name and the original file name.
    pub fn named(body: Vec<u8>, name: &str) -> Self {
        UploadPayload {
            body,
            document_name: name.to_string(),
            comment: None,
            original_filename: name.to_string(),
        }
    }
}

/// Where a file argument's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Stdin,
    Path(PathBuf),
}

impl FileSource {
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            FileSource::Stdin
        } else {
            FileSource::Path(PathBuf::from(arg))
        }
    }

    /// Read the content. Standard input is read to the end and the user is
    /// asked for a name.
    pub fn load<R: Read, P: Prompter + ?Sized>(
        &self,
        stdin: &mut R,
        prompter: &mut P,
    ) -> Result<UploadPayload> {
        match self {
            FileSource::Path(path) => UploadPayload::from_file(path),
            FileSource::Stdin => {
                let mut body = Vec::new();
                stdin.read_to_end(&mut body).map_err(UploadError::Stdin)?;
                let name = prompter
                    .input("Filename")?
                    .ok_or(UploadError::MissingFilename)?;
                Ok(UploadPayload::named(body, &name))
            }
        }
    }
}

/// Turn the positional arguments into sources and make sure every named
/// file can be opened before anything is sent.
pub fn preflight(args: &[String]) -> Result<Vec<FileSource>> {
    if args.is_empty() {
        return Err(UploadError::NoFileGiven);
    }
    let sources: Vec<FileSource> = args.iter().map(|a| FileSource::from_arg(a)).collect();
    for source in &sources {
        if let FileSource::Path(path) = source {
            File::open(path).map_err(|source| UploadError::FileNotFound {
                path: path.clone(),
                source,
            })?;
        }
    }
    Ok(sources)
}
