use iced::widget::{column, container, image, row, scrollable};
use iced::{event, window, Element, Event as IcedEvent, Length, Subscription, Task, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod media;
mod service;
mod state;
mod ui;

use error::Error;
use media::{download, IngestedImage};
use service::GeminiClient;
use state::{Effect, Event, ImageSource, Preset, Session, Ticket};

/// Main application state
struct StudioAi {
    /// The upload/edit/result state machine
    session: Session,
    /// Edit service client (None when no API key is configured)
    client: Option<Arc<GeminiClient>>,
    /// Decoded original for display
    original_preview: Option<image::Handle>,
    /// Decoded generated image for display
    result_preview: Option<image::Handle>,
    /// Edit whose result is being decoded for display
    pending_preview: Option<Ticket>,
    /// Why the generated image could not be shown
    preview_error: Option<String>,
    /// Edit that produced the generated image on screen
    result_ticket: Option<Ticket>,
    /// Abort handle of the in-flight edit request
    in_flight: Option<iced::task::Handle>,
    /// Failures outside the session (bad file, read error, save error)
    alert: Option<String>,
    /// Where the last download was written
    saved_to: Option<PathBuf>,
    /// A file is being dragged over the window
    hovering: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Browse files"
    BrowseRequested,
    /// File picker closed
    FileChosen(Option<PathBuf>),
    FileHovered,
    FileHoverLeft,
    FileDropped(PathBuf),
    /// Background file read finished
    Ingested(Ticket, Result<IngestedImage, Error>),
    PromptChanged(String),
    PresetChosen(Preset),
    Generate,
    Cancel,
    Reset,
    /// Edit request settled
    EditFinished(Ticket, Result<ImageSource, Error>),
    /// Generated image bytes resolved for display
    ResultPreviewReady(Ticket, Result<Vec<u8>, Error>),
    RetryPreview,
    DownloadRequested,
    DownloadFinished(Result<Option<PathBuf>, Error>),
    DismissAlert,
}

impl StudioAi {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // A missing key is not fatal: the app runs and edits fail with a clear message
        let client = match config::ServiceConfig::from_env().and_then(|config| GeminiClient::new(&config)) {
            Ok(client) => {
                tracing::info!(model = client.model(), "Edit service configured");
                Some(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Edit service not configured");
                None
            }
        };
        (
            StudioAi {
                session: Session::new(),
                client,
                original_preview: None,
                result_preview: None,
                pending_preview: None,
                preview_error: None,
                result_ticket: None,
                in_flight: None,
                alert: None,
                saved_to: None,
                hovering: false,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BrowseRequested => Task::perform(media::ingest::pick_image(), Message::FileChosen),
            Message::FileChosen(Some(path)) | Message::FileDropped(path) => {
                self.hovering = false;
                self.alert = None;
                self.dispatch(Event::FileSelected(path))
            }
            Message::FileChosen(None) => Task::none(),
            Message::FileHovered => {
                self.hovering = true;
                Task::none()
            }
            Message::FileHoverLeft => {
                self.hovering = false;
                Task::none()
            }
            Message::Ingested(ticket, result) => match result {
                Ok(image) => {
                    if self.session.awaits_upload(ticket) {
                        self.original_preview = Some(image::Handle::from_bytes(image.bytes));
                        self.clear_result();
                    }
                    self.dispatch(Event::Ingested {
                        ticket,
                        payload: image.payload,
                    })
                }
                Err(err) => {
                    if self.session.awaits_upload(ticket) {
                        tracing::warn!(error = %err, "Upload rejected");
                        self.alert = Some(err.to_string());
                    }
                    self.dispatch(Event::IngestFailed { ticket })
                }
            },
            Message::PromptChanged(text) => self.dispatch(Event::PromptChanged(text)),
            Message::PresetChosen(preset) => self.dispatch(Event::PresetChosen(preset)),
            Message::Generate => self.dispatch(Event::Generate),
            Message::Cancel => self.dispatch(Event::Cancel),
            Message::Reset => {
                self.original_preview = None;
                self.clear_result();
                self.alert = None;
                self.dispatch(Event::Reset)
            }
            Message::EditFinished(ticket, result) => {
                if !self.session.awaits_edit(ticket) {
                    return Task::none();
                }
                self.in_flight = None;
                match result {
                    Ok(image) => {
                        let applied = self.dispatch(Event::EditSucceeded {
                            ticket,
                            image: image.clone(),
                        });
                        self.saved_to = None;
                        self.result_ticket = Some(ticket);
                        let preview = self.load_preview(ticket, image);
                        let reveal = scrollable::snap_to(body_scroll_id(), scrollable::RelativeOffset::END);
                        Task::batch([applied, preview, reveal])
                    }
                    Err(err) => self.dispatch(Event::EditFailed {
                        ticket,
                        message: err.to_string(),
                    }),
                }
            }
            Message::ResultPreviewReady(ticket, result) => {
                if self.pending_preview != Some(ticket) {
                    return Task::none();
                }
                self.pending_preview = None;
                match result {
                    Ok(bytes) => self.result_preview = Some(image::Handle::from_bytes(bytes)),
                    Err(err) => {
                        tracing::warn!(error = %err, "Could not load generated image");
                        self.preview_error = Some(format!("Could not display the generated image: {err}"));
                    }
                }
                Task::none()
            }
            Message::RetryPreview => match (self.result_ticket, self.session.generated().cloned()) {
                (Some(ticket), Some(image)) if self.pending_preview.is_none() => self.load_preview(ticket, image),
                _ => Task::none(),
            },
            Message::DownloadRequested => match self.session.generated() {
                Some(source) => Task::perform(
                    download::download(source.clone(), self.client.clone()),
                    Message::DownloadFinished,
                ),
                None => Task::none(),
            },
            Message::DownloadFinished(result) => {
                match result {
                    Ok(Some(path)) => self.saved_to = Some(path),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "Download failed");
                        self.alert = Some(err.to_string());
                    }
                }
                Task::none()
            }
            Message::DismissAlert => {
                self.alert = None;
                Task::none()
            }
        }
    }

    /// Feed one event to the session and run the effect it asks for
    fn dispatch(&mut self, event: Event) -> Task<Message> {
        match self.session.update(event) {
            Effect::None => Task::none(),
            Effect::Ingest { ticket, path } => Task::perform(media::ingest_file(path), move |result| {
                Message::Ingested(ticket, result)
            }),
            Effect::SubmitEdit(job) => {
                let ticket = job.ticket;
                let (task, handle) = Task::perform(service::run_edit(self.client.clone(), job), move |result| {
                    Message::EditFinished(ticket, result)
                })
                .abortable();
                self.in_flight = Some(handle);
                task
            }
            Effect::CancelEdit(ticket) => {
                if let Some(handle) = self.in_flight.take() {
                    handle.abort();
                    tracing::debug!(?ticket, "Aborted in-flight edit");
                }
                Task::none()
            }
        }
    }

    /// Resolve the generated image for display in the background
    fn load_preview(&mut self, ticket: Ticket, image: ImageSource) -> Task<Message> {
        self.result_preview = None;
        self.preview_error = None;
        self.pending_preview = Some(ticket);
        let client = self.client.clone();
        Task::perform(
            async move { download::resolve_bytes(&image, client.as_deref()).await },
            move |bytes| Message::ResultPreviewReady(ticket, bytes),
        )
    }

    fn clear_result(&mut self) {
        self.result_preview = None;
        self.pending_preview = None;
        self.preview_error = None;
        self.result_ticket = None;
        self.saved_to = None;
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let body: Element<Message> = if self.session.image().is_none() {
            container(ui::upload::view(self.hovering, self.session.status().is_uploading()))
                .center_x(Length::Fill)
                .into()
        } else {
            row![
                ui::editor::view(&self.session, self.original_preview.as_ref()),
                ui::result::view(
                    &self.session,
                    self.result_preview.as_ref(),
                    self.preview_error.as_deref(),
                    self.saved_to.as_deref(),
                ),
            ]
            .spacing(24)
            .into()
        };

        let content = column![ui::header(self.session.image().is_some())]
            .push_maybe(self.alert.as_deref().map(ui::alert))
            .push(scrollable(container(body).padding(24)).id(body_scroll_id()))
            .spacing(8);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window-level drag and drop
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            IcedEvent::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            IcedEvent::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            IcedEvent::Window(window::Event::FilesHoveredLeft) => Some(Message::FileHoverLeft),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn body_scroll_id() -> scrollable::Id {
    scrollable::Id::new("body")
}

fn main() -> iced::Result {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_ai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Studio AI");

    iced::application("Studio AI", StudioAi::update, StudioAi::view)
        .subscription(StudioAi::subscription)
        .theme(StudioAi::theme)
        .centered()
        .run_with(StudioAi::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ImagePayload;

    fn app() -> StudioAi {
        StudioAi {
            session: Session::new(),
            client: None,
            original_preview: None,
            result_preview: None,
            pending_preview: None,
            preview_error: None,
            result_ticket: None,
            in_flight: None,
            alert: None,
            saved_to: None,
            hovering: false,
        }
    }

    /// Upload a photo and start an edit; returns the edit's ticket
    fn start_edit(app: &mut StudioAi) -> Ticket {
        let _ = app.update(Message::FileDropped(PathBuf::from("photo.png")));
        assert!(app.session.awaits_upload(Ticket(1)));
        let _ = app.update(Message::Ingested(
            Ticket(1),
            Ok(IngestedImage {
                payload: ImagePayload {
                    data: "QUJD".into(),
                    mime_type: "image/png".into(),
                },
                bytes: b"ABC".to_vec(),
            }),
        ));
        let _ = app.update(Message::PromptChanged("Remove the background".into()));
        let _ = app.update(Message::Generate);
        assert!(app.session.awaits_edit(Ticket(2)));
        Ticket(2)
    }

    #[test]
    fn test_unresolvable_result_offers_retry_instead_of_spinner() {
        let mut app = app();
        let ticket = start_edit(&mut app);
        let remote = ImageSource::Remote("https://files.example.com/out.png".into());

        let _ = app.update(Message::EditFinished(ticket, Ok(remote.clone())));
        assert_eq!(app.session.generated(), Some(&remote));
        assert_eq!(app.pending_preview, Some(ticket));

        let _ = app.update(Message::ResultPreviewReady(
            ticket,
            Err(Error::service("Failed to fetch generated image: HTTP 403 Forbidden")),
        ));
        assert!(app.pending_preview.is_none());
        assert!(app.result_preview.is_none());
        assert!(app
            .preview_error
            .as_deref()
            .is_some_and(|message| message.contains("HTTP 403")));
        // The session result is untouched, so Download stays available
        assert_eq!(app.session.generated(), Some(&remote));

        let _ = app.update(Message::RetryPreview);
        assert_eq!(app.pending_preview, Some(ticket));
        assert!(app.preview_error.is_none());
    }

    #[test]
    fn test_stale_preview_is_ignored() {
        let mut app = app();
        let ticket = start_edit(&mut app);
        let _ = app.update(Message::EditFinished(
            ticket,
            Ok(ImageSource::Remote("https://files.example.com/out.png".into())),
        ));

        let _ = app.update(Message::ResultPreviewReady(Ticket(1), Err(Error::service("late"))));
        assert_eq!(app.pending_preview, Some(ticket));
        assert!(app.preview_error.is_none());
    }

    #[test]
    fn test_reset_clears_preview_failure() {
        let mut app = app();
        let ticket = start_edit(&mut app);
        let _ = app.update(Message::EditFinished(
            ticket,
            Ok(ImageSource::Remote("https://files.example.com/out.png".into())),
        ));
        let _ = app.update(Message::ResultPreviewReady(ticket, Err(Error::service("gone"))));

        let _ = app.update(Message::Reset);
        assert!(app.preview_error.is_none());
        assert!(app.result_ticket.is_none());

        // Nothing to retry once the session is cleared
        let _ = app.update(Message::RetryPreview);
        assert!(app.pending_preview.is_none());
    }
}
