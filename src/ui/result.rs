use std::path::Path;

use iced::widget::{button, column, container, horizontal_space, image, row, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::Session;
use crate::Message;

/// Result panel: processing notice, generated image or placeholder
pub fn view<'a>(
    session: &'a Session,
    preview: Option<&'a image::Handle>,
    preview_error: Option<&'a str>,
    saved_to: Option<&'a Path>,
) -> Element<'a, Message> {
    let content: Element<'a, Message> = if session.status().is_processing() {
        column![
            text("Generative AI is processing...").size(18),
            text("This may take up to 20 seconds").size(12),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .into()
    } else if let Some(handle) = preview {
        column![
            text("Generated Result").size(12),
            image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(440.0))
                .content_fit(ContentFit::Contain),
            row![
                horizontal_space(),
                button(text("Download")).on_press(Message::DownloadRequested),
            ],
        ]
        .push_maybe(saved_to.map(|path| text(format!("Saved to {}", path.display())).size(12)))
        .spacing(8)
        .into()
    } else if let (Some(message), Some(_)) = (preview_error, session.generated()) {
        // The image exists but could not be shown; it can still be saved
        column![
            text(message).style(text::danger),
            row![
                button(text("Retry")).on_press(Message::RetryPreview),
                button(text("Download")).on_press(Message::DownloadRequested),
            ]
            .spacing(8),
        ]
        .push_maybe(saved_to.map(|path| text(format!("Saved to {}", path.display())).size(12)))
        .spacing(8)
        .align_x(Alignment::Center)
        .into()
    } else if session.generated().is_some() {
        text("Loading result...").into()
    } else {
        text("Your result will appear here").size(18).into()
    };

    container(content)
        .padding(16)
        .style(container::rounded_box)
        .center_x(Length::FillPortion(1))
        .center_y(Length::Fixed(520.0))
        .into()
}
