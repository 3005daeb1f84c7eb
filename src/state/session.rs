/// The upload -> edit -> result state machine
///
/// `Session` owns the selected image, the prompt text and the request
/// status. It performs no I/O: `update` applies one `Event` and returns the
/// `Effect` the caller must run (read a file, submit an edit, abort an edit).
/// Completions come back as events tagged with the `Ticket` they were issued
/// under; anything the session is no longer waiting for is dropped.

use std::path::PathBuf;

use super::data::{ImagePayload, ImageSource, SessionImage, Ticket};
use crate::error::ValidationError;

/// Message stored when the user aborts an in-flight request
pub const CANCELLED_MESSAGE: &str = "Edit request cancelled.";

/// Request status. Exactly one is active; the error text only exists in `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Uploading { ticket: Ticket },
    Processing { ticket: Ticket },
    Complete,
    Error { message: String },
}

impl Status {
    pub fn is_processing(&self) -> bool {
        matches!(self, Status::Processing { .. })
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, Status::Uploading { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Status::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Everything the edit client needs for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditJob {
    pub ticket: Ticket,
    pub image: ImagePayload,
    pub instruction: String,
}

/// User intents and async completions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FileSelected(PathBuf),
    Ingested { ticket: Ticket, payload: ImagePayload },
    IngestFailed { ticket: Ticket },
    PromptChanged(String),
    PresetChosen(super::Preset),
    Generate,
    EditSucceeded { ticket: Ticket, image: ImageSource },
    EditFailed { ticket: Ticket, message: String },
    Cancel,
    Reset,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Ingest { ticket: Ticket, path: PathBuf },
    SubmitEdit(EditJob),
    CancelEdit(Ticket),
}

/// The single mutable session of the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    image: Option<SessionImage>,
    prompt: String,
    status: Status,
    /// Inline validation message; the status stays `Idle` while it is shown
    notice: Option<ValidationError>,
    /// Status to restore when an upload fails
    resume: Option<Status>,
    next_ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&SessionImage> {
        self.image.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn notice(&self) -> Option<&ValidationError> {
        self.notice.as_ref()
    }

    pub fn generated(&self) -> Option<&ImageSource> {
        self.image.as_ref().and_then(|image| image.generated.as_ref())
    }

    /// Whether a `Generate` event would start a request right now
    pub fn can_generate(&self) -> bool {
        self.image.is_some()
            && !self.prompt.trim().is_empty()
            && !self.status.is_processing()
            && !self.status.is_uploading()
    }

    /// True if an upload completion with this ticket would be applied
    pub fn awaits_upload(&self, ticket: Ticket) -> bool {
        self.status == Status::Uploading { ticket }
    }

    /// True if an edit completion with this ticket would be applied
    pub fn awaits_edit(&self, ticket: Ticket) -> bool {
        self.status == Status::Processing { ticket }
    }

    /// Same session with everything except the ticket counter cleared
    fn cleared(&self) -> Self {
        Self {
            next_ticket: self.next_ticket,
            ..Self::default()
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Apply one event and return the effect the caller has to run
    pub fn update(&mut self, event: Event) -> Effect {
        match event {
            Event::FileSelected(path) => {
                if self.status.is_processing() || self.status.is_uploading() {
                    tracing::debug!(path = %path.display(), "Ignoring file while busy");
                    return Effect::None;
                }
                let ticket = self.issue_ticket();
                self.resume = Some(std::mem::replace(&mut self.status, Status::Uploading { ticket }));
                Effect::Ingest { ticket, path }
            }

            Event::Ingested { ticket, payload } => {
                if !self.awaits_upload(ticket) {
                    tracing::debug!(?ticket, "Dropping stale upload");
                    return Effect::None;
                }
                tracing::info!(mime_type = %payload.mime_type, "Image attached to session");
                *self = Self {
                    image: Some(SessionImage::new(payload)),
                    ..self.cleared()
                };
                Effect::None
            }

            Event::IngestFailed { ticket } => {
                if self.awaits_upload(ticket) {
                    self.status = self.resume.take().unwrap_or_default();
                }
                Effect::None
            }

            Event::PromptChanged(text) => {
                self.prompt = text;
                self.notice = None;
                Effect::None
            }

            Event::PresetChosen(preset) => {
                self.prompt = preset.instruction().to_string();
                self.notice = None;
                Effect::None
            }

            Event::Generate => self.generate(),

            Event::EditSucceeded { ticket, image } => {
                if !self.awaits_edit(ticket) {
                    tracing::debug!(?ticket, "Dropping stale edit result");
                    return Effect::None;
                }
                if let Some(session_image) = self.image.as_mut() {
                    session_image.generated = Some(image);
                }
                self.status = Status::Complete;
                tracing::info!(?ticket, "Edit complete");
                Effect::None
            }

            Event::EditFailed { ticket, message } => {
                if !self.awaits_edit(ticket) {
                    tracing::debug!(?ticket, "Dropping stale edit failure");
                    return Effect::None;
                }
                tracing::warn!(?ticket, %message, "Edit failed");
                self.status = Status::Error { message };
                Effect::None
            }

            Event::Cancel => match self.status {
                Status::Processing { ticket } => {
                    tracing::info!(?ticket, "Edit cancelled by user");
                    self.status = Status::Error {
                        message: CANCELLED_MESSAGE.to_string(),
                    };
                    Effect::CancelEdit(ticket)
                }
                _ => Effect::None,
            },

            Event::Reset => {
                let in_flight = match self.status {
                    Status::Processing { ticket } => Some(ticket),
                    _ => None,
                };
                *self = self.cleared();
                in_flight.map_or(Effect::None, Effect::CancelEdit)
            }
        }
    }

    fn generate(&mut self) -> Effect {
        // At most one request in flight
        if self.status.is_processing() || self.status.is_uploading() {
            return Effect::None;
        }
        let Some(image) = self.image.as_ref() else {
            return Effect::None;
        };
        if self.prompt.trim().is_empty() {
            self.notice = Some(ValidationError::BlankInstruction);
            return Effect::None;
        }

        let job_image = image.original.clone();
        let instruction = self.prompt.trim().to_string();
        let ticket = self.issue_ticket();
        self.notice = None;
        self.status = Status::Processing { ticket };
        tracing::info!(?ticket, instruction_len = instruction.len(), "Submitting edit");

        Effect::SubmitEdit(EditJob {
            ticket,
            image: job_image,
            instruction,
        })
    }
}
