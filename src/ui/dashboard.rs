/// Dashboard screen: the collection at a glance
use iced::widget::{button, canvas, column, container, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};

use crate::state::derive::{aggregate, Aggregates};
use crate::ui::chart::CountryChart;
use crate::{CoinCatalog, Message};

/// How many recent additions the dashboard lists
const RECENT_LIMIT: usize = 4;

/// Chart height per country row
const CHART_ROW_HEIGHT: f32 = 34.0;

pub fn view(app: &CoinCatalog) -> Element<'_, Message> {
    let stats = aggregate(app.collection.coins());

    let tiles = row![
        stat_tile("Coins", stats.coin_count.to_string()),
        stat_tile("Total value", format!("${:.2}", stats.total_value)),
        stat_tile("Rare coins", stats.rare_count.to_string()),
        stat_tile("Most valuable", most_valuable_label(&stats)),
    ]
    .spacing(15);

    let countries: Element<Message> = if stats.top_countries.is_empty() {
        text("Add coins to see where your collection comes from.")
            .size(14)
            .into()
    } else {
        let height = CHART_ROW_HEIGHT * stats.top_countries.len() as f32;
        canvas(CountryChart {
            slices: stats.top_countries.clone(),
        })
        .width(Length::Fill)
        .height(Length::Fixed(height))
        .into()
    };

    let content = column![
        tiles,
        section("Top countries", countries),
        section("Compositions", composition_list(&stats)),
        section("Recent additions", recent_list(app)),
    ]
    .spacing(25);

    scrollable(content).height(Length::Fill).into()
}

fn most_valuable_label(stats: &Aggregates) -> String {
    match &stats.highest {
        Some(coin) if !coin.name.is_empty() => format!("{} (${:.2})", coin.name, coin.value),
        Some(coin) => format!("${:.2}", coin.value),
        None => "None yet".to_string(),
    }
}

fn stat_tile<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    container(
        column![text(label).size(13), text(value).size(24)]
            .spacing(5)
            .align_x(Alignment::Center),
    )
    .padding(15)
    .style(container::rounded_box)
    .into()
}

fn section<'a>(title: &'a str, body: Element<'a, Message>) -> Element<'a, Message> {
    column![text(title).size(18), body].spacing(10).into()
}

fn composition_list(stats: &Aggregates) -> Element<'static, Message> {
    if stats.compositions.is_empty() {
        return text("No coins yet.").size(14).into();
    }

    let mut list = Column::new().spacing(5);
    for (material, count) in &stats.compositions {
        list = list.push(text(format!("{}: {}", material, count)).size(14));
    }
    list.into()
}

fn recent_list(app: &CoinCatalog) -> Element<'_, Message> {
    if app.collection.is_empty() {
        return text("Nothing here yet. Add your first coin!").size(14).into();
    }

    let mut list = Column::new().spacing(5);
    for coin in app.collection.coins().iter().take(RECENT_LIMIT) {
        let name = if coin.name.is_empty() {
            "Unnamed coin"
        } else {
            coin.name.as_str()
        };
        list = list.push(
            button(text(format!("{} (${:.2})", name, coin.value)).size(14))
                .style(button::text)
                .on_press(Message::SelectCoin(coin.id.clone())),
        );
    }
    list.into()
}
