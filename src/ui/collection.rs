/// Collection screen: searchable, sortable grid of coin cards
use iced::widget::{
    button, column, container, image, pick_list, row, scrollable, text, text_input,
};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::state::coin::Coin;
use crate::state::derive::{filter, sort, SortKey, SortOrder};
use crate::{CoinCatalog, CoinPhotos, Message};

/// Card thumbnail edge length
const CARD_IMAGE_SIZE: f32 = 150.0;

pub fn view(app: &CoinCatalog) -> Element<'_, Message> {
    let mut coins = filter(app.collection.coins(), &app.query);
    sort(&mut coins, app.sort_key, app.sort_order);

    let controls = row![
        text_input("Search by name or country...", &app.query)
            .on_input(Message::QueryChanged)
            .width(Length::Fill),
        pick_list(&SortKey::ALL[..], Some(app.sort_key), Message::SortKeyChanged),
        pick_list(
            &SortOrder::ALL[..],
            Some(app.sort_order),
            Message::SortOrderChanged
        ),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let body: Element<Message> = if coins.is_empty() {
        let hint = if app.collection.is_empty() {
            "No coins yet. Use \"Add Coin\" to catalog your first one."
        } else {
            "No coins match the search."
        };
        container(text(hint).size(16))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding(40)
            .into()
    } else {
        let cards: Vec<Element<Message>> = coins
            .into_iter()
            .map(|coin| coin_card(coin, app.photo_cache.get(&coin.id)))
            .collect();

        scrollable(Wrap::with_elements(cards).spacing(15.0).line_spacing(15.0))
            .height(Length::Fill)
            .into()
    };

    column![controls, body].spacing(15).into()
}

fn coin_card<'a>(coin: &'a Coin, photos: Option<&'a CoinPhotos>) -> Element<'a, Message> {
    let face: Element<Message> = match photos {
        Some(photos) => image(photos.front.clone())
            .width(Length::Fixed(CARD_IMAGE_SIZE))
            .height(Length::Fixed(CARD_IMAGE_SIZE))
            .into(),
        None => container(text("No photo").size(14))
            .width(Length::Fixed(CARD_IMAGE_SIZE))
            .height(Length::Fixed(CARD_IMAGE_SIZE))
            .center_x(Length::Fixed(CARD_IMAGE_SIZE))
            .center_y(Length::Fixed(CARD_IMAGE_SIZE))
            .into(),
    };

    let name = if coin.name.is_empty() {
        "Unnamed coin"
    } else {
        coin.name.as_str()
    };

    let mut details = column![
        face,
        text(name).size(16),
        text(format!("${:.2}", coin.value)).size(14),
    ]
    .spacing(6)
    .align_x(Alignment::Center);

    if coin.is_rare {
        details = details.push(text("★ Rare").size(13));
    }

    button(details)
        .style(button::secondary)
        .padding(10)
        .on_press(Message::SelectCoin(coin.id.clone()))
        .into()
}
