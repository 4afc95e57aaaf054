/// Details screen: one coin, both faces, every field
use iced::widget::{button, column, container, image, row, scrollable, text, Column};
use iced::{Element, Length};

use crate::{CoinCatalog, Message};

/// Face image edge length
const FACE_SIZE: f32 = 240.0;

pub fn view(app: &CoinCatalog) -> Element<'_, Message> {
    let Some(coin) = app.selected.as_deref().and_then(|id| app.collection.get(id)) else {
        // The selection was invalidated, e.g. the record was deleted
        return container(text("Select a coin from the collection.").size(16))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding(40)
            .into();
    };

    let faces: Element<Message> = match app.photo_cache.get(&coin.id) {
        Some(photos) => row![
            labeled_face("Front", photos.front.clone()),
            labeled_face("Back", photos.back.clone()),
        ]
        .spacing(20)
        .into(),
        None => text("No photos stored for this coin.").size(14).into(),
    };

    let name = if coin.name.is_empty() {
        "Unnamed coin"
    } else {
        coin.name.as_str()
    };
    let title = if coin.is_rare {
        format!("{} ★", name)
    } else {
        name.to_string()
    };

    let mut facts = Column::new().spacing(8);
    facts = facts.push(fact("Country", or_unknown(&coin.country)));
    facts = facts.push(fact(
        "Year",
        coin.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
    ));
    facts = facts.push(fact("Denomination", or_unknown(&coin.denomination)));
    facts = facts.push(fact("Value", format!("${:.2}", coin.value)));
    facts = facts.push(fact("Composition", or_unknown(&coin.composition)));
    facts = facts.push(fact("Condition", or_unknown(&coin.condition)));
    facts = facts.push(fact("Added", format_date(coin.date_added)));
    if coin.is_rare {
        let details = if coin.rarity_details.is_empty() {
            "Yes".to_string()
        } else {
            coin.rarity_details.clone()
        };
        facts = facts.push(fact("Rare", details));
    }

    let mut content = column![text(title).size(26), faces, facts].spacing(20);

    if !coin.description.is_empty() {
        content = content.push(text(coin.description.as_str()).size(14));
    }

    if !coin.sources.is_empty() {
        let mut sources = Column::new().spacing(3);
        sources = sources.push(text("Sources").size(14));
        for source in &coin.sources {
            sources = sources.push(text(source.as_str()).size(12));
        }
        content = content.push(sources);
    }

    let buttons = row![
        button("Back to Collection").on_press(Message::CloseDetails),
        button("Delete Coin")
            .style(button::danger)
            .on_press(Message::DeleteCoin(coin.id.clone())),
    ]
    .spacing(15);
    content = content.push(buttons);

    scrollable(content).height(Length::Fill).into()
}

fn labeled_face(label: &str, handle: iced::widget::image::Handle) -> Element<'_, Message> {
    column![
        text(label).size(14),
        image(handle)
            .width(Length::Fixed(FACE_SIZE))
            .height(Length::Fixed(FACE_SIZE)),
    ]
    .spacing(5)
    .into()
}

fn fact(label: &str, value: String) -> Element<'_, Message> {
    row![
        text(label).size(14).width(Length::Fixed(130.0)),
        text(value).size(14),
    ]
    .spacing(10)
    .into()
}

fn or_unknown(value: &str) -> String {
    if value.trim().is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

fn format_date(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
