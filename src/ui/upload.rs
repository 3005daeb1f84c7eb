use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};

use crate::Message;

const DROP_ZONE_HEIGHT: f32 = 260.0;

/// Landing view shown while no image is attached to the session
pub fn view<'a>(hovering: bool, uploading: bool) -> Element<'a, Message> {
    let headline = if uploading {
        "Reading image..."
    } else if hovering {
        "Release to upload"
    } else {
        "Drop an image here"
    };

    let zone = container(
        column![
            text(headline).size(22),
            text("or").size(13),
            button(text("Browse files").size(15))
                .padding([8, 16])
                .on_press_maybe((!uploading).then_some(Message::BrowseRequested)),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .style(if hovering {
        container::bordered_box
    } else {
        container::rounded_box
    })
    .center_x(Length::Fill)
    .center_y(Length::Fixed(DROP_ZONE_HEIGHT));

    let hints = row![
        text("Try editing:").size(12),
        text("Product Shots").size(12),
        text("Portraits").size(12),
        text("Background Removal").size(12),
    ]
    .spacing(10);

    column![
        text("Transform photos with Words").size(40),
        text("Remove backgrounds, clean up products, or completely reimagine scenes just by typing what you want.")
            .size(16),
        zone,
        hints,
    ]
    .spacing(24)
    .max_width(720)
    .align_x(Alignment::Center)
    .into()
}
