/// Add screen: the two-step capture and review wizard
///
/// Step one collects a photo of each face and sends both to the
/// identification service. Step two shows the editable result; nothing
/// reaches the collection until the user saves it.
use iced::widget::{
    button, checkbox, column, container, image, row, scrollable, text, text_input, Column,
};
use iced::{Alignment, Element, Length};

use crate::{CoinCatalog, Face, Message, PendingEntry, PendingField, PendingPhoto};

/// Preview edge length for the capture step
const PREVIEW_SIZE: f32 = 220.0;

/// Preview edge length for the review step
const REVIEW_PREVIEW_SIZE: f32 = 120.0;

pub fn view(app: &CoinCatalog) -> Element<'_, Message> {
    match &app.pending {
        Some(pending) if pending.identified => review_step(pending),
        Some(pending) => capture_step(pending),
        None => container(text("Press \"Add Coin\" to start cataloguing.").size(16))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding(40)
            .into(),
    }
}

fn capture_step(pending: &PendingEntry) -> Element<'_, Message> {
    let ready = pending.front.is_some() && pending.back.is_some();

    let identify: Element<Message> = if pending.identifying {
        text("🔍 Identifying... this can take a minute.").size(16).into()
    } else {
        button(text("Identify Coin").size(16))
            .padding(10)
            .on_press_maybe(ready.then_some(Message::Identify))
            .into()
    };

    let mut content = column![
        text("Photograph both faces of the coin").size(22),
        row![
            photo_slot("Front", Face::Front, pending.front.as_ref(), pending.identifying),
            photo_slot("Back", Face::Back, pending.back.as_ref(), pending.identifying),
        ]
        .spacing(20),
        identify,
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    if let Some(error) = &pending.error {
        content = content.push(text(format!("❌ {}", error)).size(14).style(text::danger));
    }

    container(content)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
}

fn photo_slot<'a>(
    label: &'a str,
    face: Face,
    photo: Option<&'a PendingPhoto>,
    busy: bool,
) -> Element<'a, Message> {
    let preview: Element<Message> = match photo {
        Some(photo) => image(photo.preview.clone())
            .width(Length::Fixed(PREVIEW_SIZE))
            .height(Length::Fixed(PREVIEW_SIZE))
            .into(),
        None => container(text("No photo yet").size(14))
            .width(Length::Fixed(PREVIEW_SIZE))
            .height(Length::Fixed(PREVIEW_SIZE))
            .center_x(Length::Fixed(PREVIEW_SIZE))
            .center_y(Length::Fixed(PREVIEW_SIZE))
            .style(container::rounded_box)
            .into(),
    };

    let pick_label = if photo.is_some() {
        "Choose Again"
    } else {
        "Choose Photo"
    };

    column![
        text(label).size(16),
        preview,
        button(pick_label).on_press_maybe((!busy).then_some(Message::PickPhoto(face))),
    ]
    .spacing(10)
    .align_x(Alignment::Center)
    .into()
}

fn review_step(pending: &PendingEntry) -> Element<'_, Message> {
    let fields = &pending.fields;

    let mut form = Column::new().spacing(10);
    form = form.push(field_row("Name", "Required", &fields.name, PendingField::Name));
    form = form.push(field_row("Country", "", &fields.country, PendingField::Country));
    form = form.push(field_row(
        "Year",
        "Leave empty if unknown",
        &fields.year,
        PendingField::Year,
    ));
    form = form.push(field_row(
        "Denomination",
        "",
        &fields.denomination,
        PendingField::Denomination,
    ));
    form = form.push(field_row("Value ($)", "0.00", &fields.value, PendingField::Value));
    form = form.push(field_row(
        "Composition",
        "e.g. Silver / Copper",
        &fields.composition,
        PendingField::Composition,
    ));
    form = form.push(field_row("Condition", "", &fields.condition, PendingField::Condition));
    form = form.push(field_row(
        "Description",
        "",
        &fields.description,
        PendingField::Description,
    ));
    form = form.push(checkbox("Rare coin", pending.is_rare).on_toggle(Message::PendingRareToggled));
    if pending.is_rare {
        form = form.push(field_row(
            "Rarity details",
            "",
            &fields.rarity_details,
            PendingField::RarityDetails,
        ));
    }

    if !pending.sources.is_empty() {
        let mut sources = Column::new().spacing(3);
        sources = sources.push(text("Sources").size(14));
        for source in &pending.sources {
            sources = sources.push(text(source.as_str()).size(12));
        }
        form = form.push(sources);
    }

    let faces = row![
        face_preview(pending.front.as_ref()),
        face_preview(pending.back.as_ref()),
    ]
    .spacing(15);

    let buttons = row![
        button(text("Save to Collection").size(16))
            .padding(10)
            .on_press(Message::SavePending),
        button(text("Retake Photos").size(16))
            .padding(10)
            .style(button::secondary)
            .on_press(Message::Retake),
    ]
    .spacing(15);

    let mut content = column![
        text("Review the identification").size(22),
        faces,
        form,
        buttons,
    ]
    .spacing(20);

    if let Some(error) = &pending.error {
        content = content.push(text(format!("❌ {}", error)).size(14).style(text::danger));
    }

    scrollable(content).height(Length::Fill).into()
}

fn face_preview(photo: Option<&PendingPhoto>) -> Element<'_, Message> {
    match photo {
        Some(photo) => image(photo.preview.clone())
            .width(Length::Fixed(REVIEW_PREVIEW_SIZE))
            .height(Length::Fixed(REVIEW_PREVIEW_SIZE))
            .into(),
        None => text("No photo").size(12).into(),
    }
}

fn field_row<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    field: PendingField,
) -> Element<'a, Message> {
    row![
        text(label).size(14).width(Length::Fixed(130.0)),
        text_input(placeholder, value).on_input(move |edited| Message::PendingEdited(field, edited)),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}
