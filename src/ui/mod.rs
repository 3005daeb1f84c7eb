/// Presentation shell
///
/// Pure functions from session state to widgets. Every user intent is
/// emitted as a `Message`; no decisions are made here.
///
/// - `upload.rs` - drop zone and file browser entry point
/// - `editor.rs` - original preview, instruction input, presets, generate
/// - `result.rs` - generated preview and download

pub mod editor;
pub mod result;
pub mod upload;

use iced::widget::{button, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length};

use crate::Message;

/// Top bar with the app name and, once an image is loaded, the reset action
pub fn header<'a>(has_image: bool) -> Element<'a, Message> {
    let mut bar = row![
        text("Studio AI").size(24),
        container(text("Powered by Gemini").size(11))
            .padding([2, 8])
            .style(container::rounded_box),
        horizontal_space(),
    ]
    .align_y(Alignment::Center)
    .spacing(12);

    if has_image {
        bar = bar.push(
            button(text("Back to Upload").size(14))
                .style(button::text)
                .on_press(Message::Reset),
        );
    }

    container(bar).width(Length::Fill).padding([12, 24]).into()
}

/// Dismissible banner for failures that are not part of the session
pub fn alert(message: &str) -> Element<'_, Message> {
    container(
        row![
            text(message).style(text::danger),
            horizontal_space(),
            button(text("Dismiss").size(13))
                .style(button::text)
                .on_press(Message::DismissAlert),
        ]
        .align_y(Alignment::Center)
        .spacing(12),
    )
    .style(container::rounded_box)
    .width(Length::Fill)
    .padding(12)
    .into()
}
