use iced::widget::{button, column, container, image, row, text, text_input, Row};
use iced::{ContentFit, Element, Length};

use crate::state::{Preset, Session};
use crate::Message;

/// Original image, instruction input, presets and the generate controls
pub fn view<'a>(session: &'a Session, preview: Option<&'a image::Handle>) -> Element<'a, Message> {
    let processing = session.status().is_processing();

    let original: Element<'a, Message> = match preview {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(360.0))
            .content_fit(ContentFit::Contain)
            .into(),
        None => text("Preview unavailable").into(),
    };

    let presets = Row::with_children(Preset::ALL.iter().map(|&preset| {
        button(text(preset.label()).size(13))
            .style(button::secondary)
            .on_press(Message::PresetChosen(preset))
            .into()
    }))
    .spacing(8)
    .wrap();

    let generate_label = if processing { "Processing..." } else { "Generate Edit" };
    let mut actions = row![button(text(generate_label))
        .width(Length::Fill)
        .padding(12)
        .on_press_maybe(session.can_generate().then_some(Message::Generate))]
    .spacing(8);
    if processing {
        actions = actions.push(
            button(text("Cancel"))
                .style(button::danger)
                .padding(12)
                .on_press(Message::Cancel),
        );
    }

    let notice = session
        .notice()
        .map(|notice| text(notice.to_string()).style(text::danger));
    let error = session
        .status()
        .error_message()
        .map(|message| container(text(message).style(text::danger)).padding(12).style(container::rounded_box));

    column![
        container(column![text("Original").size(12), original].spacing(8))
            .padding(12)
            .style(container::rounded_box),
        text("Instructions").size(14),
        text_input("Describe how you want to change the image...", session.prompt())
            .on_input(Message::PromptChanged)
            .on_submit(Message::Generate)
            .padding(12),
        text("Quick Actions").size(12),
        presets,
        actions,
    ]
    .push_maybe(notice)
    .push_maybe(error)
    .spacing(12)
    .width(Length::FillPortion(1))
    .into()
}
